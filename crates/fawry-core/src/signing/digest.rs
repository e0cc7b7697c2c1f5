//! Hash engine for the gateway signature scheme.
//!
//! The secret is one plaintext component of the hashed string, not an HMAC key.
//! The counterparty computes the same unkeyed digest, so this must not be
//! replaced with a keyed construction.

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Digest algorithms accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-256, 64 hex characters. Used by every current recipe.
    #[default]
    Sha256,
    /// MD5, 32 hex characters. Used only by the V1 notification.
    Md5,
}

impl HashAlgorithm {
    /// Length of the lowercase hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Md5 => 32,
        }
    }

    /// Hash `input` and return the lowercase hex encoding.
    pub fn hex_digest(self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input).as_slice()),
            HashAlgorithm::Md5 => format!("{:x}", md5::compute(input)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Md5 => write!(f, "md5"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "md5" => Ok(HashAlgorithm::Md5),
            other => Err(Error::Config {
                message: format!("unsupported hash algorithm: {}", other),
            }),
        }
    }
}

/// Concatenate `values` with `separator` and hash the UTF-8 bytes.
pub fn digest<I, S>(values: I, separator: &str, algorithm: HashAlgorithm) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut input = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            input.push_str(separator);
        }
        input.push_str(value.as_ref());
    }
    algorithm.hex_digest(input.as_bytes())
}
