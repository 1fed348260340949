//! The four collaborators the type builder delegates to.
//!
//! Each one sits behind a trait so that a builder can be assembled with custom
//! policies; the `Default*` types are what [`TypeBuilder::new`] uses.
//!
//! [`TypeBuilder::new`]: crate::builder::TypeBuilder::new

mod constructor;
mod filter;
mod parser;
mod resolver;

use std::sync::Arc;

use crate::builder::registry::{NodeId, RuntimeType};
use crate::descriptor::{Catalog, TypeDescriptor};

pub use constructor::{DefaultTypeConstructor, DependencyObject, InjectionObject};
pub use filter::DefaultTypeFilter;
pub use parser::DefaultTypeParser;
pub use resolver::DefaultTypeResolver;

/// Enumerates the constructor candidates of a type.
#[cfg_attr(test, mockall::automock)]
pub trait TypeConstructor {
    /// Yields one [`DependencyObject`] per declared constructor, in
    /// declaration order. A type without declared constructors yields its
    /// default activator only if `allow_default_instantiation` is set.
    fn dependency_objects(
        &self,
        descriptor: &Arc<TypeDescriptor>,
        allow_default_instantiation: bool,
    ) -> Box<dyn Iterator<Item = DependencyObject>>;
}

/// Eligibility and assignability predicates.
#[cfg_attr(test, mockall::automock)]
pub trait TypeFilter {
    /// Returns true if the type may be registered on its own.
    fn can_register(&self, descriptor: &TypeDescriptor) -> bool;

    /// Returns true if the type may be registered as a constructor parameter.
    fn can_register_parameter(&self, descriptor: &TypeDescriptor) -> bool;

    /// Returns true if `candidate` satisfies what `required` demands.
    fn is_assignable(&self, candidate: &TypeDescriptor, required: &TypeDescriptor) -> bool;
}

/// Finds registry entries matching a signature.
#[cfg_attr(test, mockall::automock)]
pub trait TypeParser {
    /// Returns the entry whose base identity is `signature` and whose
    /// parameter signatures are exactly `parameters`.
    fn find<'a>(
        &self,
        signature: &str,
        parameters: &[String],
        candidates: &[&'a RuntimeType],
    ) -> Option<NodeId>;

    /// Returns every entry whose base identity is `signature` and whose
    /// parameter signatures are `parameters`, or of any arity when
    /// `parameters` is empty.
    fn find_all<'a>(
        &self,
        signature: &str,
        parameters: &[String],
        candidates: &[&'a RuntimeType],
    ) -> Vec<NodeId>;
}

/// Looks up type descriptors by name.
#[cfg_attr(test, mockall::automock)]
pub trait TypeResolver {
    fn get_type(&self, catalog: &Catalog, name: &str) -> Option<Arc<TypeDescriptor>>;
}
