use crate::codec::canonical_request;
use crate::errors::VcrError;
use crate::message::{FormFields, HttpRequest};
use crate::types::CallKind;
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 of a call's canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_digest(digest: Sha256) -> Self {
        let bytes = digest.finalize();
        let mut out = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            out.push_str(&format!("{byte:02x}"));
        }
        Self(out)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One outbound call, borrowed for the duration of fingerprinting.
#[derive(Debug, Clone, Copy)]
pub enum CallDescriptor<'a> {
    DirectRequest(&'a HttpRequest),
    SimpleGet { url: &'a str },
    FormPost { url: &'a str, fields: &'a FormFields },
}

impl CallDescriptor<'_> {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::DirectRequest(_) => CallKind::DirectRequest,
            Self::SimpleGet { .. } => CallKind::SimpleGet,
            Self::FormPost { .. } => CallKind::FormPost,
        }
    }

    /// A direct request must have its body buffered first
    /// (see [`HttpRequest::buffer_body`]); otherwise this is an encoding error.
    pub fn fingerprint(&self) -> Result<Fingerprint, VcrError> {
        let mut digest = Sha256::new();
        match self {
            Self::DirectRequest(request) => digest.update(canonical_request(request)?),
            Self::SimpleGet { url } => digest.update(url.as_bytes()),
            Self::FormPost { url, fields } => {
                digest.update(url.as_bytes());
                digest.update(fields.encode().as_bytes());
            }
        }
        Ok(Fingerprint::from_digest(digest))
    }
}
