use std::io::Write;

use serde::Serialize;
use ssh_key::{PublicKey, public::KeyData};

use crate::{
    cert::{CertKind, ParsedCertificate},
    error::CertResult,
};

/// Separator used when printing the principal list on one line.
pub const PRINCIPAL_SEPARATOR: &str = ";";

/// Encode key material as `ALGORITHM BASE64` with no comment and no newline.
pub fn encode_authorized_key(key: &KeyData) -> CertResult<String> {
    Ok(PublicKey::new(key.clone(), "").to_openssh()?)
}

/// Printable view of a [`ParsedCertificate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSummary {
    pub public_key: String,
    pub signing_key: String,
    pub principals: Vec<String>,
    pub valid_after: u64,
    pub valid_before: u64,
    pub key_id: String,
    pub serial: u64,
    pub cert_type: CertKind,
    pub comment: String,
    pub options: Vec<String>,
}

impl CertificateSummary {
    pub fn from_parsed(cert: &ParsedCertificate) -> CertResult<Self> {
        Ok(Self {
            public_key: encode_authorized_key(&cert.public_key)?,
            signing_key: encode_authorized_key(&cert.signing_key)?,
            principals: cert.valid_principals.clone(),
            valid_after: cert.valid_after,
            valid_before: cert.valid_before,
            key_id: cert.key_id.clone(),
            serial: cert.serial,
            cert_type: cert.kind,
            comment: cert.comment.clone(),
            options: cert.options.clone(),
        })
    }

    /// Public key, signing key, joined principals, valid-after, valid-before; one per line.
    pub fn write_lines(&self, mut out: impl Write) -> CertResult<()> {
        writeln!(out, "{}", self.public_key)?;
        writeln!(out, "{}", self.signing_key)?;
        writeln!(out, "{}", self.principals.join(PRINCIPAL_SEPARATOR))?;
        writeln!(out, "{}", self.valid_after)?;
        writeln!(out, "{}", self.valid_before)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_json(&self, mut out: impl Write) -> CertResult<()> {
        serde_json::to_writer(&mut out, self)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
