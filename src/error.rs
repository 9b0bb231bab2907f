use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnotError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input table: {0}")]
    InvalidInputTable(String),

    #[error("Correlation between '{a}' and '{b}' is undefined (zero variance)")]
    UndefinedCorrelation { a: String, b: String },

    #[error("Endpoint '{0}' is not a member of the cycle")]
    EndpointNotInCycle(String),

    #[error("No simple path from '{input}' to '{output}' in the induced subgraph")]
    NoPathBetweenEndpoints { input: String, output: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KnotError>;
