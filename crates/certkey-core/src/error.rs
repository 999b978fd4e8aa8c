use thiserror::Error;

/// Errors that can occur while decoding or rendering a certificate
#[derive(Error, Debug)]
pub enum CertError {
    /// Key blob is not valid base64
    #[error("invalid base64 key blob: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Key blob could not be decoded or encoded
    #[error("invalid key data: {0}")]
    Key(#[from] ssh_key::Error),

    /// Length-prefixed field in the key blob could not be read
    #[error("invalid key blob encoding: {0}")]
    Encoding(#[from] ssh_encoding::Error),

    /// Line does not have the `ALGORITHM BASE64 [COMMENT]` shape
    #[error("malformed authorized key line: {0}")]
    MalformedLine(String),

    /// No line of the input decoded as a key
    #[error("no key found")]
    NoKeyFound,

    /// Input continues after the decoded key line
    #[error("unexpected data after key: {rest:?}")]
    TrailingData { rest: String },

    /// Decoded key is a bare public key rather than a certificate
    #[error("expected an SSH certificate, got {algorithm} public key")]
    NotCertificate { algorithm: String },

    /// JSON serialization failed
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for certificate operations
pub type CertResult<T> = Result<T, CertError>;

impl CertError {
    /// Create a malformed line error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedLine(message.into())
    }
}
