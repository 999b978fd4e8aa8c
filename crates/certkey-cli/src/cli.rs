use std::{ffi::OsString, io::Write};

use anyhow::{Context, Result};
use certkey_core::{CertificateSummary, decode_certificate};
use clap::{Parser, ValueEnum};
use tracing::debug;

/// Layout of the printed certificate fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Public key, signing key, principals, valid-after, valid-before; one per line
    #[default]
    Lines,
    /// Single JSON object including key id, serial and certificate type
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "parse-certs",
    about = "Print the keys, principals and validity window of an OpenSSH certificate",
    disable_help_flag = true
)]
pub struct CertArgs {
    /// Certificate in authorized_keys format: ALGORITHM BASE64 [COMMENT]
    ///
    /// Taken as raw bytes; only the base64 blob has to be ASCII.
    #[arg(value_name = "CERTIFICATE", allow_hyphen_values = true, value_parser = clap::value_parser!(OsString))]
    certificate: OsString,
    /// Output layout (defaults to lines)
    #[arg(long, value_enum, value_name = "FORMAT")]
    format: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertConfig {
    pub certificate: OsString,
    pub format: OutputFormat,
}

impl CertArgs {
    pub fn parse_config() -> CertConfig {
        CertConfig::from(CertArgs::parse())
    }
}

impl From<CertArgs> for CertConfig {
    fn from(args: CertArgs) -> Self {
        let CertArgs { certificate, format } = args;
        CertConfig {
            certificate,
            format: format.unwrap_or_default(),
        }
    }
}

impl CertConfig {
    /// Decode the certificate and write its fields to `out`.
    ///
    /// Nothing is written unless decoding and key encoding both succeed.
    pub fn run(&self, out: impl Write) -> Result<()> {
        // Non-UTF-8 bytes become U+FFFD; the base64 blob has to be ASCII anyway
        let input = self.certificate.to_string_lossy();
        let parsed = decode_certificate(&input).context("failed to parse certificate")?;
        let summary = CertificateSummary::from_parsed(&parsed).context("failed to encode certificate keys")?;
        debug!(format = ?self.format, principals = summary.principals.len(), "writing certificate summary");

        match self.format {
            OutputFormat::Lines => summary.write_lines(out)?,
            OutputFormat::Json => summary.write_json(out)?,
        }
        Ok(())
    }
}
