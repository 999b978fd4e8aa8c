pub mod authorized;
pub mod cert;
pub mod error;
pub mod render;

pub use authorized::{AuthorizedKey, DecodedKey, parse_authorized_key};
pub use cert::{CertKind, ParsedCertificate, decode_certificate};
pub use error::{CertError, CertResult};
pub use render::{CertificateSummary, encode_authorized_key};
