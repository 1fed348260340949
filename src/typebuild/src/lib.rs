#![allow(clippy::new_without_default)]

pub mod builder;
pub mod container;
pub mod descriptor;
pub mod lifetime;
pub mod signature;
pub mod strategy;
pub mod util;

pub use typebuild_derive::injectable;

pub mod prelude {
    pub use crate::builder::{BuilderOptions, InstantiationError, RegistrationError, TypeBuilder};
    pub use crate::container::Container;
    pub use crate::descriptor::{
        ActivationError, Arguments, ConstructorDescriptor, Contract, Factory, Injectable, Injected,
        ParameterDescriptor, TypeDescriptor, TypeKind,
    };
    pub use crate::injectable;
    pub use crate::lifetime::{Annotation, Lifetime};
    pub use crate::signature::Signature;
    pub use crate::util::any::{Downcast, Managed, Object};
}
