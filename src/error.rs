use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormPressError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
