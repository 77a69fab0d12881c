use quick_xml::se::SeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] SeError),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
