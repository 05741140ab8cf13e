use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not signed in: admin operations require an authenticated session")]
    Unauthorized,

    #[error("Api Error: {0}")]
    Api(String),
}

impl SiteError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        SiteError::DocumentNotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
