use serde::Serialize;
use ssh_key::{Certificate, public::KeyData};
use tracing::debug;

use crate::{
    authorized::{AuthorizedKey, DecodedKey, parse_authorized_key},
    error::{CertError, CertResult},
};

/// Whether a certificate authenticates a user or a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CertKind {
    User,
    Host,
}

/// Fields projected out of a decoded OpenSSH certificate.
#[derive(Debug, Clone)]
pub struct ParsedCertificate {
    /// Key the certificate was issued for
    pub public_key: KeyData,
    /// Key of the issuing certificate authority
    pub signing_key: KeyData,
    pub valid_principals: Vec<String>,
    /// Seconds since the epoch, exactly as stored in the certificate
    pub valid_after: u64,
    pub valid_before: u64,
    pub key_id: String,
    pub serial: u64,
    pub kind: CertKind,
    pub comment: String,
    pub options: Vec<String>,
}

impl ParsedCertificate {
    pub fn from_certificate(cert: &Certificate, comment: impl Into<String>, options: Vec<String>) -> Self {
        let kind = if cert.cert_type().is_host() { CertKind::Host } else { CertKind::User };
        Self {
            public_key: cert.public_key().clone(),
            signing_key: cert.signature_key().clone(),
            valid_principals: cert.valid_principals().to_vec(),
            valid_after: cert.valid_after(),
            valid_before: cert.valid_before(),
            key_id: cert.key_id().to_string(),
            serial: cert.serial(),
            kind,
            comment: comment.into(),
            options,
        }
    }
}

/// Decode a single authorized-key formatted certificate.
///
/// Fails when nothing decodes, when any text follows the certificate's line, or when
/// the decoded key is a bare public key.
pub fn decode_certificate(input: &str) -> CertResult<ParsedCertificate> {
    let AuthorizedKey {
        algorithm,
        key,
        comment,
        options,
        rest,
    } = parse_authorized_key(input)?;

    if !rest.is_empty() {
        return Err(CertError::TrailingData { rest: rest.to_string() });
    }

    match key {
        DecodedKey::Certificate(cert) => {
            debug!(%algorithm, key_id = cert.key_id(), serial = cert.serial(), "decoded certificate");
            Ok(ParsedCertificate::from_certificate(&cert, comment, options))
        }
        DecodedKey::PublicKey(_) => Err(CertError::NotCertificate { algorithm }),
    }
}
