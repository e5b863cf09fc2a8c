use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("operation {operation_id} is not a crisis broadcast")]
    NotABroadcast { operation_id: String },
}
