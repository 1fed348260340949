mod format;

use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

pub use format::{bare_name, format_parameter_signatures, format_signature_with_parameters};

/// Canonical identity of a binding: a type name, optionally followed by the
/// ordered signatures of a constructor's parameters, e.g. `app::B(app::A)`.
///
/// Two signatures are equal if their rendered forms are equal, which allows
/// looking up registry entries with a plain `&str`.
#[derive(Clone)]
pub struct Signature {
    full: String,
    base: String,
    parameters: Vec<String>,
}

impl Signature {
    /// Creates a signature without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        let base = name.into();
        Self {
            full: base.clone(),
            base,
            parameters: Vec::new(),
        }
    }

    pub(crate) fn from_parts(full: String, base: String, parameters: Vec<String>) -> Self {
        Self {
            full,
            base,
            parameters,
        }
    }

    /// The type name part of the signature.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The parameter signatures, in declaration order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// Returns the same type name with a different parameter list.
    pub fn with_parameters(&self, parameters: &[String]) -> Self {
        format_signature_with_parameters(&self.base, parameters)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.full, f)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.full)
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.full == other.full
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full.hash(state);
    }
}

impl Borrow<str> for Signature {
    fn borrow(&self) -> &str {
        &self.full
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

impl From<&str> for Signature {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Signature {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn signature_eq_succeeds() {
        let plain = Signature::new("app::A");
        let with_params = format_signature_with_parameters("app::B", &["app::A".to_string()]);

        assert_eq!(plain, Signature::from("app::A"));
        assert_ne!(plain, with_params);
        assert_eq!(with_params.as_str(), "app::B(app::A)");
        assert_eq!(with_params.base(), "app::B");
        assert_eq!(with_params.arity(), 1);
    }

    #[test]
    fn signature_lookup_by_str_succeeds() {
        let mut map = HashMap::new();
        map.insert(
            format_signature_with_parameters("app::B", &["app::A".to_string()]),
            1,
        );

        assert_eq!(map.get("app::B(app::A)"), Some(&1));
        assert_eq!(map.get("app::B"), None);
    }

    #[test]
    fn signature_with_parameters_keeps_base() {
        let sig = Signature::new("app::B").with_parameters(&["i32".to_string(), "bool".to_string()]);
        assert_eq!(sig.as_str(), "app::B(i32,bool)");
        assert_eq!(sig.parameters(), &["i32".to_string(), "bool".to_string()]);
    }
}
