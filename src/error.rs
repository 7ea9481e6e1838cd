use crate::keyword::Keyword;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A raiser built a payload without one of the mandatory keys.
    #[error("exception data must contain {key} key")]
    InvalidPayload { key: Keyword },

    #[error("invalid keyword: {input:?}")]
    InvalidKeyword { input: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
