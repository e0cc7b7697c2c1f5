//! Signing options: algorithm, projection, post-transform and separator.

use super::digest::{digest, HashAlgorithm};
use super::fields::SignatureFields;

/// Maps the ordered field mapping to the sequence of strings that gets hashed.
///
/// A plain function pointer, so a projection can never capture outer state.
pub type FieldProjection = fn(&SignatureFields) -> Vec<String>;

/// Post-processing applied to the lowercase hex digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureTransform {
    #[default]
    Identity,
    /// Upper-case the hex string. Applied after hex encoding.
    Uppercase,
}

impl SignatureTransform {
    pub fn apply(self, hex: String) -> String {
        match self {
            SignatureTransform::Identity => hex,
            SignatureTransform::Uppercase => hex.to_ascii_uppercase(),
        }
    }
}

/// How a field mapping becomes a signature.
#[derive(Clone)]
pub struct SigningOptions {
    pub algorithm: HashAlgorithm,
    /// `None` takes the values in insertion order and drops the names.
    pub projection: Option<FieldProjection>,
    pub transform: SignatureTransform,
    pub separator: String,
}

impl Default for SigningOptions {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            projection: None,
            transform: SignatureTransform::Identity,
            separator: String::new(),
        }
    }
}

impl std::fmt::Debug for SigningOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningOptions")
            .field("algorithm", &self.algorithm)
            .field("custom_projection", &self.projection.is_some())
            .field("transform", &self.transform)
            .field("separator", &self.separator)
            .finish()
    }
}

impl SigningOptions {
    pub fn sha256() -> Self {
        Self::default()
    }

    /// MD5 with an upper-cased result, as used by V1 notifications.
    pub fn md5_uppercase() -> Self {
        Self {
            algorithm: HashAlgorithm::Md5,
            transform: SignatureTransform::Uppercase,
            ..Self::default()
        }
    }

    pub fn with_projection(mut self, projection: FieldProjection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Compute the signature for `fields`.
    pub fn signature(&self, fields: &SignatureFields) -> String {
        let hex = match self.projection {
            Some(project) => digest(project(fields), &self.separator, self.algorithm),
            None => digest(fields.values(), &self.separator, self.algorithm),
        };
        self.transform.apply(hex)
    }
}
