use std::sync::Arc;

use crate::descriptor::{ConstructorDescriptor, ParameterDescriptor, TypeDescriptor};
use crate::lifetime::{Annotation, Lifetime};
use crate::signature::{format_signature_with_parameters, Signature};
use crate::strategy::TypeConstructor;

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeConstructor;

impl DefaultTypeConstructor {
    pub fn new() -> Self {
        Self
    }
}

impl TypeConstructor for DefaultTypeConstructor {
    fn dependency_objects(
        &self,
        descriptor: &Arc<TypeDescriptor>,
        allow_default_instantiation: bool,
    ) -> Box<dyn Iterator<Item = DependencyObject>> {
        let owner = Arc::clone(descriptor);
        if !owner.constructors().is_empty() {
            let count = owner.constructors().len();
            Box::new((0..count).map(move |i| {
                let constructor = owner.constructors()[i].clone();
                DependencyObject::new(Arc::clone(&owner), constructor)
            }))
        } else if allow_default_instantiation {
            let default = owner.default_activator().cloned();
            Box::new(
                default
                    .into_iter()
                    .map(move |constructor| DependencyObject::new(Arc::clone(&owner), constructor)),
            )
        } else {
            Box::new(std::iter::empty())
        }
    }
}

/// One constructor candidate of a type together with its parameters.
#[derive(Debug, Clone)]
pub struct DependencyObject {
    owner: Arc<TypeDescriptor>,
    constructor: ConstructorDescriptor,
    injections: Vec<InjectionObject>,
}

impl DependencyObject {
    pub fn new(owner: Arc<TypeDescriptor>, constructor: ConstructorDescriptor) -> Self {
        let injections = constructor
            .parameters()
            .iter()
            .map(InjectionObject::from_descriptor)
            .collect();
        Self {
            owner,
            constructor,
            injections,
        }
    }

    pub fn owner(&self) -> &Arc<TypeDescriptor> {
        &self.owner
    }

    pub fn constructor(&self) -> &ConstructorDescriptor {
        &self.constructor
    }

    pub fn injection_objects(&self) -> &[InjectionObject] {
        &self.injections
    }

    /// The alias the constructor is annotated with, if any.
    pub fn alias(&self) -> Option<&str> {
        self.constructor.annotation().override_type()
    }

    /// The name the binding is registered under: the alias, or the owner's
    /// own name.
    pub fn type_full_name(&self) -> &str {
        self.alias().unwrap_or_else(|| self.owner.name())
    }

    /// The registry key of the binding.
    pub fn signature(&self) -> Signature {
        format_signature_with_parameters(self.type_full_name(), &self.parameter_signatures())
    }

    /// The underlying identity of the binding, which differs from
    /// [`DependencyObject::signature`] only when the constructor is aliased.
    pub fn id(&self) -> Signature {
        format_signature_with_parameters(self.owner.name(), &self.parameter_signatures())
    }

    pub fn parameter_signatures(&self) -> Vec<String> {
        self.constructor.parameter_signatures()
    }

    /// The explicitly annotated lifetime, if any.
    pub fn lifetime_annotation(&self) -> Option<Lifetime> {
        self.constructor.annotation().lifetime()
    }
}

/// One formal parameter of a constructor candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionObject {
    declared: String,
    nested: Vec<String>,
    annotation: Annotation,
}

impl InjectionObject {
    fn from_descriptor(parameter: &ParameterDescriptor) -> Self {
        Self {
            declared: parameter.type_name().to_string(),
            nested: parameter.nested().to_vec(),
            annotation: parameter.annotation().clone(),
        }
    }

    /// The declared parameter type.
    pub fn declared_type(&self) -> &str {
        &self.declared
    }

    /// The type actually injected: the override if annotated, otherwise the
    /// declared type.
    pub fn effective_type(&self) -> &str {
        self.annotation
            .override_type()
            .unwrap_or(self.declared.as_str())
    }

    pub fn nested(&self) -> &[String] {
        &self.nested
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// The registry key of the injected type.
    pub fn signature(&self) -> Signature {
        format_signature_with_parameters(self.effective_type(), &self.nested)
    }
}
