//! Avatar Client - upload side of the profile photo editor
//!
//! Sends committed crops to the profile API as a multipart upload and feeds
//! the outcome back into the crop controller.
//!
//! # Usage
//!
//! ```ignore
//! use avatar_client::{commit_and_upload, ProfileApiClient, SessionToken};
//!
//! let client = ProfileApiClient::from_env()?;
//! let session = SessionToken::require(request_cookie_header)?;
//! commit_and_upload(&mut controller, &client, &session).await?;
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod session;
pub mod upload;

pub use config::ApiConfig;
pub use driver::commit_and_upload;
pub use error::ClientError;
pub use session::SessionToken;
pub use upload::{rejection_message, PhotoUploader, ProfileApiClient, PHOTO_FIELD};
