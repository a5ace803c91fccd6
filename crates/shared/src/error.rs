use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed server frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),
    #[error("unrecognized snapshot shape: {0}")]
    UnrecognizedSnapshot(#[source] serde_json::Error),
    #[error("failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),
}
