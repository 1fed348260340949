use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use snafu::prelude::*;

use crate::descriptor::Injected;
use crate::lifetime::{Annotation, Lifetime};
use crate::util::any::{Downcast, Managed, Object};

/// The error an activator reports when the object can't be constructed.
pub type ActivationError = Box<dyn Error + Send + Sync>;

/// A type-erased constructor.
pub type Activator = Arc<dyn Fn(&mut Arguments) -> Result<Object, ActivationError> + Send + Sync>;

/// One declared constructor of a type.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    parameters: Vec<ParameterDescriptor>,
    annotation: Annotation,
    activator: Activator,
}

impl ConstructorDescriptor {
    /// Wraps a closure which pulls its arguments out of [`Arguments`] in
    /// parameter order and returns the constructed object.
    pub fn new<F, T>(activator: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, ActivationError> + Send + Sync + 'static,
        T: Managed,
    {
        Self {
            parameters: Vec::new(),
            annotation: Annotation::new(),
            activator: Arc::new(move |args: &mut Arguments| {
                activator(args).map(|obj| -> Object { Arc::new(obj) })
            }),
        }
    }

    /// Wraps a closure which already produces a type-erased object, e.g. one
    /// that hands out a held value.
    pub fn from_activator(activator: Activator) -> Self {
        Self {
            parameters: Vec::new(),
            annotation: Annotation::new(),
            activator,
        }
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Registers the binding under `type_name` instead of the owner's name.
    pub fn alias(mut self, type_name: impl Into<String>) -> Self {
        self.annotation = self.annotation.with_override(type_name);
        self
    }

    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.annotation = self.annotation.with_lifetime(lifetime);
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// The declared type names of the parameters, in order.
    pub fn parameter_signatures(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| p.type_name().to_string())
            .collect()
    }

    pub fn activator(&self) -> &Activator {
        &self.activator
    }

    pub fn activate(&self, arguments: Vec<Option<Object>>) -> Result<Object, ActivationError> {
        let mut arguments = Arguments::new(arguments);
        (self.activator)(&mut arguments)
    }
}

impl Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConstructorDescriptor")
            .field("parameters", &self.parameters)
            .field("annotation", &self.annotation)
            .finish_non_exhaustive()
    }
}

/// One formal parameter of a constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    type_name: String,
    nested: Vec<String>,
    annotation: Annotation,
}

impl ParameterDescriptor {
    pub fn of<P: Injected>() -> Self {
        Self {
            type_name: P::signature(),
            nested: P::nested(),
            annotation: Annotation::new(),
        }
    }

    /// A parameter declared by name only, typically a contract which the
    /// activator receives as a raw [`Object`].
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            nested: Vec::new(),
            annotation: Annotation::new(),
        }
    }

    pub fn with_nested(mut self, nested: Vec<String>) -> Self {
        self.nested = nested;
        self
    }

    /// Injects `type_name` in place of the declared type.
    pub fn with_override(mut self, type_name: impl Into<String>) -> Self {
        self.annotation = self.annotation.with_override(type_name);
        self
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.annotation = self.annotation.with_lifetime(lifetime);
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn nested(&self) -> &[String] {
        &self.nested
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// Arguments handed to an activator, consumed in parameter order.
pub struct Arguments {
    values: Vec<Option<Object>>,
    cursor: usize,
}

impl Arguments {
    pub fn new(values: Vec<Option<Object>>) -> Self {
        Self { values, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Takes the next argument and converts it to `P`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is absent or has another type.
    pub fn next<P: Injected>(&mut self) -> Result<P, ArgumentError> {
        let index = self.cursor;
        let argument = self.next_object();
        let found = argument.as_ref().map(|obj| obj.concrete_type_name());
        match P::from_argument(argument) {
            Some(value) => Ok(value),
            None => match found {
                Some(found) => ArgumentTypeSnafu {
                    index,
                    expected: P::signature(),
                    found,
                }
                .fail(),
                None => MissingArgumentSnafu {
                    index,
                    expected: P::signature(),
                }
                .fail(),
            },
        }
    }

    /// Takes the next argument without converting it.
    pub fn next_object(&mut self) -> Option<Object> {
        let argument = self.values.get_mut(self.cursor).and_then(Option::take);
        self.cursor += 1;
        argument
    }
}

impl Debug for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Arguments")
            .field("len", &self.values.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ArgumentError {
    #[snafu(display("argument {index} of type {expected} is missing"))]
    #[non_exhaustive]
    MissingArgument { index: usize, expected: String },
    #[snafu(display("argument {index} should be {expected} but is {found}"))]
    #[non_exhaustive]
    ArgumentType {
        index: usize,
        expected: String,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pair {
        left: i32,
        right: Option<Arc<String>>,
    }

    fn arg<T: Managed>(value: T) -> Option<Object> {
        Some(Arc::new(value))
    }

    fn pair_constructor() -> ConstructorDescriptor {
        ConstructorDescriptor::new(|args| {
            Ok(Pair {
                left: args.next()?,
                right: args.next()?,
            })
        })
        .parameter(ParameterDescriptor::of::<i32>())
        .parameter(ParameterDescriptor::of::<Option<Arc<String>>>())
    }

    #[test]
    fn constructor_activate_succeeds() {
        let ctor = pair_constructor();
        let object = ctor
            .activate(vec![arg(7i32), arg(String::from("r"))])
            .unwrap();
        let pair = object.downcast_arc::<Pair>().unwrap();
        assert_eq!(pair.left, 7);
        assert_eq!(pair.right.as_deref().map(String::as_str), Some("r"));
    }

    #[test]
    fn constructor_activate_accepts_absent_optional() {
        let ctor = pair_constructor();
        let object = ctor.activate(vec![arg(7i32), None]).unwrap();
        let pair = object.downcast_arc::<Pair>().unwrap();
        assert!(pair.right.is_none());
    }

    #[test]
    fn constructor_activate_fails_when_required_argument_is_missing() {
        let ctor = pair_constructor();
        let err = ctor.activate(vec![]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArgumentError>(),
            Some(ArgumentError::MissingArgument { index: 0, .. })
        ));
    }

    #[test]
    fn constructor_activate_fails_when_argument_type_differs() {
        let ctor = pair_constructor();
        let err = ctor.activate(vec![arg(true), None]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArgumentError>(),
            Some(ArgumentError::ArgumentType { found: "bool", .. })
        ));
    }

    #[test]
    fn constructor_parameter_signatures_succeeds() {
        let ctor = pair_constructor().lifetime(Lifetime::Singleton).alias("Both");
        assert_eq!(
            ctor.parameter_signatures(),
            vec!["i32".to_string(), "alloc::string::String".to_string()]
        );
        assert_eq!(ctor.annotation().lifetime(), Some(Lifetime::Singleton));
        assert_eq!(ctor.annotation().override_type(), Some("Both"));
    }
}
