//! Registration and instantiation of bindings.
//!
//! A [`TypeBuilder`] owns the descriptor [`Catalog`] and the [`Registry`]
//! and delegates policy decisions to the four strategies of
//! [`crate::strategy`].

mod instantiation;
mod registration;
pub mod registry;

use snafu::prelude::*;

use crate::descriptor::{ActivationError, Catalog, TypeDescriptor};
use crate::signature::Signature;
use crate::strategy::{
    DefaultTypeConstructor, DefaultTypeFilter, DefaultTypeParser, DefaultTypeResolver,
};

use registry::Registry;

/// Switches controlling how eagerly the builder fills in missing pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    default_type_resolution: bool,
    default_type_instantiation: bool,
    default_type_attribute_overwrite: bool,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers unregistered parameter types on demand. When disabled, every
    /// parameter type must be registered before its consumers.
    pub fn default_type_resolution(mut self, enabled: bool) -> Self {
        self.default_type_resolution = enabled;
        self
    }

    /// Falls back to a type's default activator when it declares no
    /// constructor.
    pub fn default_type_instantiation(mut self, enabled: bool) -> Self {
        self.default_type_instantiation = enabled;
        self
    }

    /// Lets a later registration replace recorded override metadata.
    pub fn default_type_attribute_overwrite(mut self, enabled: bool) -> Self {
        self.default_type_attribute_overwrite = enabled;
        self
    }

    pub fn resolves_default_types(&self) -> bool {
        self.default_type_resolution
    }

    pub fn instantiates_default_types(&self) -> bool {
        self.default_type_instantiation
    }

    pub fn overwrites_attributes(&self) -> bool {
        self.default_type_attribute_overwrite
    }
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            default_type_resolution: true,
            default_type_instantiation: true,
            default_type_attribute_overwrite: true,
        }
    }
}

/// The orchestrator of registration and instantiation.
#[derive(Debug)]
pub struct TypeBuilder<
    C = DefaultTypeConstructor,
    F = DefaultTypeFilter,
    P = DefaultTypeParser,
    R = DefaultTypeResolver,
> {
    catalog: Catalog,
    registry: Registry,
    options: BuilderOptions,
    constructor: C,
    filter: F,
    parser: P,
    resolver: R,
}

impl TypeBuilder {
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self::with_strategies(
            options,
            DefaultTypeConstructor::new(),
            DefaultTypeFilter::new(),
            DefaultTypeParser::new(),
            DefaultTypeResolver::new(),
        )
    }
}

impl Default for TypeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, F, P, R> TypeBuilder<C, F, P, R> {
    pub fn with_strategies(
        options: BuilderOptions,
        constructor: C,
        filter: F,
        parser: P,
        resolver: R,
    ) -> Self {
        Self {
            catalog: Catalog::new(),
            registry: Registry::new(),
            options,
            constructor,
            filter,
            parser,
            resolver,
        }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Adds a descriptor to the catalog without registering anything.
    pub fn declare(&mut self, descriptor: TypeDescriptor) {
        self.catalog.declare(descriptor);
    }

    /// Drops every registered node. Declared descriptors are kept.
    pub fn reset(&mut self) {
        tracing::debug!("resetting registry");
        self.registry.reset();
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum RegistrationError {
    #[snafu(display("could not register {signature}: no constructors available"))]
    #[non_exhaustive]
    NoConstructors { signature: Signature },
    #[snafu(display(
        "could not register {signature}: circular references found through {parameter}"
    ))]
    #[non_exhaustive]
    CircularReference {
        signature: Signature,
        parameter: String,
    },
    #[snafu(display("could not register {signature}: {required} is not assignable from {candidate}"))]
    #[non_exhaustive]
    NotAssignable {
        signature: Signature,
        required: String,
        candidate: String,
    },
    #[snafu(display("could not register {signature}: parameter {parameter} is not registered"))]
    #[non_exhaustive]
    NotRegistered {
        signature: Signature,
        parameter: String,
    },
    #[snafu(display(
        "could not register {signature}: override {requested} conflicts with {existing}"
    ))]
    #[non_exhaustive]
    OverwriteRejected {
        signature: Signature,
        existing: String,
        requested: String,
    },
    #[snafu(display("could not register {name}: the type is not declared"))]
    #[non_exhaustive]
    Undeclared { name: String },
    #[snafu(display("could not register {signature}"))]
    #[non_exhaustive]
    Nested {
        signature: Signature,
        source: Box<RegistrationError>,
    },
}

impl RegistrationError {
    /// The innermost error, skipping every [`RegistrationError::Nested`]
    /// layer.
    pub fn root_cause(&self) -> &RegistrationError {
        match self {
            Self::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum InstantiationError {
    #[snafu(display("could not instantiate {signature}: no constructors available"))]
    #[non_exhaustive]
    NoCandidates { signature: Signature },
    #[snafu(display(
        "could not instantiate {signature}: more than one constructor available ({count} candidates)"
    ))]
    #[non_exhaustive]
    Ambiguous { signature: Signature, count: usize },
    #[snafu(display("could not instantiate {signature}: dependency {parameter} is unresolved"))]
    #[non_exhaustive]
    UnresolvedDependency {
        signature: Signature,
        parameter: Signature,
    },
    #[snafu(display("could not instantiate {signature}: the activator failed"))]
    #[non_exhaustive]
    Activation {
        signature: Signature,
        source: ActivationError,
    },
    #[snafu(display("could not instantiate {signature}: expected {expected} but got {found}"))]
    #[non_exhaustive]
    TypeMismatch {
        signature: Signature,
        expected: &'static str,
        found: &'static str,
    },
}
