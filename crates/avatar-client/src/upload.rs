//! Multipart upload of the committed photo to the profile API.

use std::future::Future;

use avatar_core::EncodedPhoto;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::FALLBACK_REJECTION_MESSAGE;
use crate::{ApiConfig, ClientError, SessionToken};

/// Multipart field the API reads the photo from.
pub const PHOTO_FIELD: &str = "profilePhoto";

/// Something that can store a committed photo for the signed-in user.
pub trait PhotoUploader {
    fn upload(
        &self,
        session: &SessionToken,
        photo: &EncodedPhoto,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// HTTP client for `POST {api_url}/users/profile-photo`.
#[derive(Debug, Clone)]
pub struct ProfileApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ProfileApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("avatar-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ApiConfig::from_env()?)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

impl PhotoUploader for ProfileApiClient {
    async fn upload(&self, session: &SessionToken, photo: &EncodedPhoto) -> Result<(), ClientError> {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name())
            .mime_str(photo.mime_type())?;
        let form = Form::new().part(PHOTO_FIELD, part);
        let url = self.config.upload_url();

        let response = self
            .http
            .post(&url)
            .bearer_auth(session.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "profile photo upload failed to send");
                ClientError::Transport(e)
            })?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), bytes = photo.len(), "profile photo stored");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = rejection_message(&body);
        warn!(status = status.as_u16(), message = %message, "profile photo rejected");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<ErrorMessage>,
}

/// Validation errors arrive as a list, everything else as a single string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Pull the `message` field out of an error response body.
pub fn rejection_message(body: &str) -> String {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(ErrorMessage::One(message)),
        }) => message,
        Ok(ErrorBody {
            message: Some(ErrorMessage::Many(messages)),
        }) => messages.join(", "),
        _ => String::new(),
    };

    if message.trim().is_empty() {
        FALLBACK_REJECTION_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn photo() -> EncodedPhoto {
        EncodedPhoto {
            bytes: vec![0xFF, 0xD8, 0x01, 0x02, 0xFF, 0xD9],
            width: 1,
            height: 1,
        }
    }

    fn token() -> SessionToken {
        SessionToken::new("tok-123").unwrap()
    }

    /// Accept one request, answer with `status` and `body`, return the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (ApiConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        let config = ApiConfig::new(format!("http://{addr}"), Duration::from_secs(5));
        (config, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            });
        match content_length {
            Some(len) => request.len() >= header_end + 4 + len,
            None => text.ends_with("--\r\n"),
        }
    }

    #[test]
    fn test_rejection_message_single() {
        assert_eq!(
            rejection_message(r#"{"statusCode":400,"message":"Invalid file type"}"#),
            "Invalid file type"
        );
    }

    #[test]
    fn test_rejection_message_list() {
        assert_eq!(
            rejection_message(r#"{"message":["file too large","bad type"]}"#),
            "file too large, bad type"
        );
    }

    #[test]
    fn test_rejection_message_fallback() {
        assert_eq!(rejection_message(""), FALLBACK_REJECTION_MESSAGE);
        assert_eq!(rejection_message("<html>502</html>"), FALLBACK_REJECTION_MESSAGE);
        assert_eq!(rejection_message(r#"{"error":"x"}"#), FALLBACK_REJECTION_MESSAGE);
        assert_eq!(rejection_message(r#"{"message":""}"#), FALLBACK_REJECTION_MESSAGE);
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_with_bearer() {
        let (config, server) = serve_once("200 OK", r#"{"ok":true}"#).await;
        let client = ProfileApiClient::new(config).unwrap();

        client.upload(&token(), &photo()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /users/profile-photo HTTP/1.1"));
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("authorization: bearer tok-123"));
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(request.contains("name=\"profilePhoto\"; filename=\"profile-photo.jpg\""));
        assert!(request.contains("Content-Type: image/jpeg"));
    }

    #[tokio::test]
    async fn test_upload_rejection_carries_server_message() {
        let (config, server) =
            serve_once("413 Payload Too Large", r#"{"message":"File too large"}"#).await;
        let client = ProfileApiClient::new(config).unwrap();

        let err = client.upload(&token(), &photo()).await.unwrap_err();
        server.await.unwrap();
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 413);
                assert_eq!(message, "File too large");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ApiConfig::new(format!("http://{addr}"), Duration::from_secs(2));
        let client = ProfileApiClient::new(config).unwrap();

        let err = client.upload(&token(), &photo()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.user_message(), "Connection error");
    }
}
