//! Operation identity and the keys derived from it.

use std::fmt;

/// Stable name of an instrumented operation, e.g. `Cache.store`.
///
/// Must be unique per distinct operation within a process since every
/// counter and history key is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the invocation counter: the identity verbatim.
    pub fn counter_key(&self) -> &str {
        &self.0
    }

    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.0)
    }

    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.0)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
