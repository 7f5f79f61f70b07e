//! astro-api
//!
//! HTTP clients for the remote session directory and the launcher's release feed.

pub(crate) mod directory_client;
pub(crate) mod error;
pub(crate) mod release;
pub(crate) mod release_feed;
pub(crate) mod session;
pub(crate) mod session_directory;


pub use directory_client::DirectoryClient;
pub use error::{ApiError, Result as ApiResult};
pub use release::{Release, ReleaseAsset};
pub use release_feed::ReleaseFeed;
pub use session::Session;
pub use session_directory::SessionDirectory;
