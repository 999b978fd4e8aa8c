use base64::{
    Engine, alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};
use ssh_encoding::Decode;
use ssh_key::{Certificate, PublicKey};
use tracing::debug;

use crate::error::{CertError, CertResult};

/// Algorithm name suffix shared by every OpenSSH certificate key type.
pub const CERT_ALGORITHM_SUFFIX: &str = "-cert-v01@openssh.com";

/// Padded standard alphabet that ignores non-zero bits in the final symbol.
const KEY_BLOB_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true));

/// Key material decoded from an authorized_keys entry.
#[derive(Debug, Clone)]
pub enum DecodedKey {
    Certificate(Box<Certificate>),
    PublicKey(PublicKey),
}

impl DecodedKey {
    pub fn is_certificate(&self) -> bool {
        matches!(self, DecodedKey::Certificate(_))
    }
}

/// The first decodable entry of an authorized_keys text plus whatever follows its line.
#[derive(Debug, Clone)]
pub struct AuthorizedKey<'a> {
    /// Algorithm name read from the key blob (not from the text token)
    pub algorithm: String,
    pub key: DecodedKey,
    pub comment: String,
    /// Options preceding the key, e.g. `cert-authority` or `principals="a,b"`
    pub options: Vec<String>,
    /// Text after the newline that terminates the decoded entry
    pub rest: &'a str,
}

/// Decode the first authorized_keys entry found in `input`.
///
/// Blank lines, `#` comments and lines that do not decode are skipped. Anything after
/// the decoded entry's line is returned untouched in [`AuthorizedKey::rest`].
pub fn parse_authorized_key(input: &str) -> CertResult<AuthorizedKey<'_>> {
    let mut remaining = input;
    while !remaining.is_empty() {
        let (line, rest) = remaining.split_once('\n').unwrap_or((remaining, ""));
        remaining = rest;

        let line = line.split_once('\r').map_or(line, |(head, _)| head).trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line, rest) {
            Ok(entry) => return Ok(entry),
            Err(err) => debug!(%err, "skipping undecodable authorized key line"),
        }
    }
    Err(CertError::NoKeyFound)
}

fn parse_line<'a>(line: &str, rest: &'a str) -> CertResult<AuthorizedKey<'a>> {
    // The leading token is the text algorithm name; the blob carries the real one.
    let (_, fields) = split_field(line).ok_or_else(|| CertError::malformed("missing key blob"))?;
    let err = match parse_key_fields(fields) {
        Ok((algorithm, key, comment)) => {
            return Ok(AuthorizedKey {
                algorithm,
                key,
                comment,
                options: Vec::new(),
                rest,
            });
        }
        Err(err) => err,
    };

    // Retry assuming an options field in front of the key
    let Some((options, key_part)) = split_options(line) else {
        return Err(err);
    };
    let Some((_, fields)) = split_field(key_part) else {
        return Err(err);
    };
    match parse_key_fields(fields) {
        Ok((algorithm, key, comment)) => Ok(AuthorizedKey {
            algorithm,
            key,
            comment,
            options,
            rest,
        }),
        Err(_) => Err(err),
    }
}

fn split_field(text: &str) -> Option<(&str, &str)> {
    text.split_once([' ', '\t'])
}

/// Parse `BASE64 [COMMENT]`.
fn parse_key_fields(text: &str) -> CertResult<(String, DecodedKey, String)> {
    let text = text.trim();
    let (encoded, comment) = split_field(text).unwrap_or((text, ""));
    let blob = KEY_BLOB_ENGINE.decode(encoded)?;
    let (algorithm, key) = decode_blob(&blob)?;
    Ok((algorithm, key, comment.trim().to_string()))
}

/// Decode a binary key blob, choosing certificate or bare key from its algorithm name.
pub fn decode_blob(blob: &[u8]) -> CertResult<(String, DecodedKey)> {
    let algorithm = blob_algorithm(blob)?;
    let key = if algorithm.ends_with(CERT_ALGORITHM_SUFFIX) {
        DecodedKey::Certificate(Box::new(Certificate::from_bytes(blob)?))
    } else {
        DecodedKey::PublicKey(PublicKey::from_bytes(blob)?)
    };
    Ok((algorithm, key))
}

fn blob_algorithm(mut blob: &[u8]) -> CertResult<String> {
    Ok(String::decode(&mut blob)?)
}

/// Split a leading options field off `line`.
///
/// Options end at the first space or tab outside double quotes and are separated by
/// unquoted commas. A quote preceded by a backslash does not toggle quoting.
fn split_options(line: &str) -> Option<(Vec<String>, &str)> {
    let bytes = line.as_bytes();
    let mut options = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    let mut end = bytes.len();

    for (i, &b) in bytes.iter().enumerate() {
        let is_end = !in_quote && (b == b' ' || b == b'\t');
        if (b == b',' && !in_quote) || is_end {
            if i > start {
                options.push(line[start..i].to_string());
            }
            start = i + 1;
        }
        if is_end {
            end = i;
            break;
        }
        if b == b'"' && (i == 0 || bytes[i - 1] != b'\\') {
            in_quote = !in_quote;
        }
    }

    let key_part = line[end..].trim_start_matches([' ', '\t']);
    if key_part.is_empty() {
        return None;
    }
    Some((options, key_part))
}
