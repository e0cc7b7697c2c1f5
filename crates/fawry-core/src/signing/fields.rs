//! Ordered field mapping that feeds the hash engine.

use super::format::Canonical;

/// Insertion-ordered mapping from field name to its canonical text.
///
/// Built fresh for every signature from an explicit recipe. The order of
/// `push` calls is the order in which values are concatenated.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignatureFields {
    entries: Vec<(&'static str, String)>,
}

impl SignatureFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append a field rendered with its canonical rule.
    pub fn push(&mut self, name: &'static str, value: Canonical<'_>) -> &mut Self {
        self.entries.push((name, value.render()));
        self
    }

    /// Append a field whose text is already final.
    pub fn push_text(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.entries.push((name, value.into()));
        self
    }

    /// Append an optional field; `None` is omitted entirely rather than signed as empty.
    pub fn push_opt(&mut self, name: &'static str, value: Option<Canonical<'_>>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }
}

// Every recipe carries the shared secret, so the values stay out of Debug output.
impl std::fmt::Debug for SignatureFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureFields")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
