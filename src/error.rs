#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing required field '{field}' in {entity} payload")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid database name: {0}")]
    InvalidDatabaseName(String),
}
