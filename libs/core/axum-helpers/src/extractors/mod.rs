//! Extractors that reject with the uniform [`ErrorResponse`](crate::ErrorResponse) body.

pub mod account_id;
pub mod uuid_path;
pub mod validated_json;

pub use account_id::AccountIdHeader;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
