use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreshetError {
    #[error("Unknown adapter: {0}")]
    AdapterNotFound(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Readiness selector {selector:?} did not appear within {timeout_ms}ms")]
    ReadinessTimeout { selector: String, timeout_ms: u64 },

    #[error("Adapter {site_id} extracted no items and does not allow empty feeds")]
    EmptyResult { site_id: String },

    #[error("Description template failed: {0}")]
    TemplateRender(String),

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FreshetError>;
