use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplyDecodeError {
    #[error("response is missing a boolean `success` field")]
    MissingSuccessFlag,
    #[error("malformed response payload: {0}")]
    Payload(#[from] serde_json::Error),
}
