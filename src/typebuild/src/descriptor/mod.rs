//! The statically declared descriptor table which stands in for runtime
//! reflection.
//!
//! Every type the builder is able to register is described once by a
//! [`TypeDescriptor`]: its name, its kind, the contracts it satisfies and its
//! constructors in declaration order. Descriptors are collected in a
//! [`Catalog`], which is the context the type resolver looks names up in.

mod catalog;
mod constructor;
mod injected;

use std::any;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::signature;
use crate::util::any::Managed;

pub use catalog::Catalog;
pub use constructor::{
    ActivationError, Activator, ArgumentError, Arguments, ConstructorDescriptor,
    ParameterDescriptor,
};
pub use injected::{Contract, Factory, Injected};

/// A type which knows how to describe itself to the builder.
///
/// Usually implemented with the `#[injectable]` attribute.
pub trait Injectable: Managed {
    fn describe() -> TypeDescriptor;
}

/// What kind of type a descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// An ordinary constructible type.
    Class,
    /// A plain value such as an integer, supplied as a held value rather
    /// than constructed.
    Value,
    /// A handle-like type that is never constructed by the builder.
    Opaque,
    /// An abstract contract (a trait) other types can satisfy.
    Contract,
}

pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    contracts: Vec<String>,
    constructors: Vec<ConstructorDescriptor>,
    default_constructor: Option<ConstructorDescriptor>,
}

impl TypeDescriptor {
    pub fn named(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            contracts: Vec::new(),
            constructors: Vec::new(),
            default_constructor: None,
        }
    }

    pub fn class<T: Managed>() -> Self {
        Self::named(any::type_name::<T>(), TypeKind::Class)
    }

    pub fn value<T: Managed>() -> Self {
        Self::named(any::type_name::<T>(), TypeKind::Value)
    }

    pub fn opaque<T: Managed>() -> Self {
        Self::named(any::type_name::<T>(), TypeKind::Opaque)
    }

    pub fn contract(name: impl Into<String>) -> Self {
        Self::named(name, TypeKind::Contract)
    }

    /// Appends a constructor. Constructors are discovered in the order they
    /// are added.
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Sets the activator used when the type declares no constructor and
    /// default instantiation is allowed.
    pub fn default_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.default_constructor = Some(constructor);
        self
    }

    /// Uses [`Default`] as the default activator.
    pub fn with_default<T>(self) -> Self
    where
        T: Managed + Default,
    {
        self.default_constructor(ConstructorDescriptor::new(|_| Ok(T::default())))
    }

    /// Declares that the type satisfies the contract named `contract`.
    pub fn satisfies(mut self, contract: impl Into<String>) -> Self {
        self.contracts.push(contract.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bare_name(&self) -> &str {
        signature::bare_name(&self.name)
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn contracts(&self) -> &[String] {
        &self.contracts
    }

    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    pub fn default_activator(&self) -> Option<&ConstructorDescriptor> {
        self.default_constructor.as_ref()
    }

    pub fn satisfies_contract(&self, contract: &str) -> bool {
        self.contracts.iter().any(|c| c == contract)
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("contracts", &self.contracts)
            .field("constructors", &self.constructors.len())
            .field("default_constructor", &self.default_constructor.is_some())
            .finish()
    }
}
