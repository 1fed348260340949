use std::fmt::{Display, Formatter, Result as FmtResult};

/// Specifies whether repeated resolution of a binding yields the same object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// The binding is activated at most once and the object is cached in its
    /// node for the rest of the builder's life.
    Singleton,
    /// Every direct request activates the binding again. When the binding is
    /// injected into another type, the injected object is shared between the
    /// consumer's instances unless the injection asks for a per-call object.
    #[default]
    Transient,
    /// The binding is a factory which is invoked on every resolution, including
    /// injections.
    Lazy,
}

impl Lifetime {
    /// Returns true if an injection with this lifetime must produce a new
    /// object on each resolution.
    pub fn is_per_call(self) -> bool {
        !matches!(self, Self::Singleton)
    }

    pub fn to_str(self) -> &'static str {
        match self {
            Self::Singleton => "Singleton",
            Self::Transient => "Transient",
            Self::Lazy => "Lazy",
        }
    }
}

impl Display for Lifetime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_str())
    }
}

/// Overrides attached to a constructor or a constructor parameter.
///
/// On a constructor, `override_type` registers the binding under another type
/// name (an alias the owner must be assignable to) and `lifetime` sets the
/// binding's [`Lifetime`]. On a parameter, `override_type` substitutes the
/// declared type with a concrete one and `lifetime` controls how the injected
/// object is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Annotation {
    override_type: Option<String>,
    lifetime: Option<Lifetime>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, type_name: impl Into<String>) -> Self {
        self.override_type = Some(type_name.into());
        self
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn override_type(&self) -> Option<&str> {
        self.override_type.as_deref()
    }

    pub fn lifetime(&self) -> Option<Lifetime> {
        self.lifetime
    }

    pub fn is_empty(&self) -> bool {
        self.override_type.is_none() && self.lifetime.is_none()
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match (&self.override_type, self.lifetime) {
            (Some(ty), Some(lifetime)) => write!(f, "{ty}@{lifetime}"),
            (Some(ty), None) => write!(f, "{ty}"),
            (None, Some(lifetime)) => write!(f, "@{lifetime}"),
            (None, None) => write!(f, "<none>"),
        }
    }
}
