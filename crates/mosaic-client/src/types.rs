use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `Fragment` used across Mosaic components.
///
/// One piece of the target message: the raw identifier the service assigned,
/// the fragment's position in the final message, and its payload text. The
/// identifier and the sequence index are distinct concepts and are not
/// assumed equal.
pub struct Fragment {
    pub id: u64,
    pub index: u64,
    pub text: String,
}

#[derive(Debug, Error)]
/// Enumerates supported `ClientError` values.
pub enum ClientError {
    #[error("invalid base URL '{0}': expected an http:// or https:// origin")]
    InvalidBaseUrl(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
