use std::any;
use std::sync::Arc;

use crate::builder::registry::Registry;
use crate::builder::{
    BuilderOptions, InstantiationError, RegistrationError, TypeBuilder, TypeMismatchSnafu,
};
use crate::descriptor::{ConstructorDescriptor, Factory, Injectable, Injected, TypeDescriptor};
use crate::lifetime::Lifetime;
use crate::signature::{format_signature_with_parameters, Signature};
use crate::util::any::{Downcast, Managed, Object};

/// A typed front end of a [`TypeBuilder`] with the default strategies.
///
/// Types are addressed by their [`std::any::type_name`], so the typed
/// operations and the signature based ones of the builder can be mixed.
#[derive(Debug, Default)]
pub struct Container {
    builder: TypeBuilder,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            builder: TypeBuilder::with_options(options),
        }
    }

    pub fn builder(&self) -> &TypeBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut TypeBuilder {
        &mut self.builder
    }

    pub fn registry(&self) -> &Registry {
        self.builder.registry()
    }

    /// Makes `T` known to the builder without registering it, so that it can
    /// be registered on demand as a dependency.
    pub fn declare<T: Injectable>(&mut self) {
        self.builder.declare(T::describe());
    }

    /// Makes a hand-written descriptor known to the builder, e.g. the one of
    /// a contract.
    pub fn declare_descriptor(&mut self, descriptor: TypeDescriptor) {
        self.builder.declare(descriptor);
    }

    /// Declares the contract `T`, usually a trait object type, so that
    /// constructors can be aliased to it.
    pub fn declare_contract<T>(&mut self)
    where
        T: ?Sized + 'static,
    {
        self.builder
            .declare(TypeDescriptor::contract(any::type_name::<T>()));
    }

    pub fn register_type<T: Injectable>(&mut self) -> Result<(), RegistrationError> {
        self.register_type_with::<T>(&[])
    }

    /// Registers `T` and binds `args` to the constructor whose parameters
    /// match their types.
    pub fn register_type_with<T: Injectable>(
        &mut self,
        args: &[Object],
    ) -> Result<(), RegistrationError> {
        self.declare::<T>();
        self.builder.register(any::type_name::<T>(), args)
    }

    /// Binds `value` as the only object of `T`.
    pub fn register_instance<T: Managed>(&mut self, value: T) {
        self.builder
            .register_instance(Signature::new(any::type_name::<T>()), Arc::new(value));
    }

    /// Binds an already shared object under an arbitrary signature, e.g. the
    /// name of a contract.
    pub fn register_object(&mut self, signature: impl Into<Signature>, object: Object) {
        self.builder.register_instance(signature.into(), object);
    }

    /// Binds `value` as the only object of the contract `T`.
    pub fn register_contract<T>(&mut self, value: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.builder
            .register_instance(Signature::new(any::type_name::<T>()), Arc::new(value));
    }

    /// Binds `produce` as a [`Lifetime::Lazy`] producer of `T`.
    pub fn register_factory<T, F>(&mut self, produce: F)
    where
        T: Managed,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_factory_with_lifetime(produce, Lifetime::Lazy);
    }

    /// Binds `produce` as the producer of `T`. Consumers may also ask for a
    /// [`Factory<T>`] to call it on their own.
    pub fn register_factory_with_lifetime<T, F>(&mut self, produce: F, lifetime: Lifetime)
    where
        T: Managed,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let produce = Arc::new(produce);

        let activate = Arc::clone(&produce);
        self.builder.register_factory(
            Signature::new(any::type_name::<T>()),
            ConstructorDescriptor::new(move |_| Ok(activate())),
            lifetime,
        );

        let factory = Factory::new(move || Arc::new(produce()));
        self.builder.register_instance(
            format_signature_with_parameters(
                &Factory::<T>::signature(),
                &Factory::<T>::nested(),
            ),
            Arc::new(factory),
        );
    }

    pub fn create_instance<T: Managed>(&mut self) -> Result<Arc<T>, InstantiationError> {
        self.create_instance_with::<T>(&[])
    }

    /// Creates a `T`, failing if any of its dependencies can't be resolved.
    pub fn create_instance_with<T: Managed>(
        &mut self,
        args: &[Object],
    ) -> Result<Arc<T>, InstantiationError> {
        let signature = any::type_name::<T>();
        let object = self.builder.create_instance(signature, args)?;
        downcast(signature, object)
    }

    pub fn get_instance<T: Managed>(&mut self) -> Result<Arc<T>, InstantiationError> {
        self.get_instance_with::<T>(&[])
    }

    /// Creates a `T`, passing absence for dependencies that can't be
    /// resolved.
    pub fn get_instance_with<T: Managed>(
        &mut self,
        args: &[Object],
    ) -> Result<Arc<T>, InstantiationError> {
        let signature = any::type_name::<T>();
        let object = self.builder.get_instance(signature, args)?;
        downcast(signature, object)
    }

    /// Creates an object of the contract `T` from the binding aliased to it.
    pub fn create_contract<T>(&mut self) -> Result<Arc<T>, InstantiationError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let signature = any::type_name::<T>();
        let object = self.builder.create_instance(signature, &[])?;
        downcast::<Arc<T>>(signature, object).map(|inner| Arc::clone(&*inner))
    }

    pub fn get_contract<T>(&mut self) -> Result<Arc<T>, InstantiationError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let signature = any::type_name::<T>();
        let object = self.builder.get_instance(signature, &[])?;
        downcast::<Arc<T>>(signature, object).map(|inner| Arc::clone(&*inner))
    }

    /// Creates the object bound under `signature` without knowing its type.
    pub fn create_object(
        &mut self,
        signature: &str,
        args: &[Object],
    ) -> Result<Object, InstantiationError> {
        self.builder.create_instance(signature, args)
    }

    pub fn get_object(&mut self, signature: &str, args: &[Object]) -> Result<Object, InstantiationError> {
        self.builder.get_instance(signature, args)
    }

    pub fn runtime_types(&self) -> Vec<&Signature> {
        self.registry().runtime_types()
    }

    pub fn runtime_aliased_types(&self) -> Vec<&Signature> {
        self.registry().runtime_aliased_types()
    }

    pub fn runtime_non_aliased_types(&self) -> Vec<&Signature> {
        self.registry().runtime_non_aliased_types()
    }

    pub fn runtime_type_aliases(&self) -> Vec<&Signature> {
        self.registry().runtime_type_aliases()
    }

    pub fn signatures(&self) -> Vec<&Signature> {
        self.registry().signatures()
    }

    pub fn reset(&mut self) {
        self.builder.reset();
    }
}

fn downcast<T: Managed>(signature: &str, object: Object) -> Result<Arc<T>, InstantiationError> {
    object.downcast_arc::<T>().map_err(|object| {
        TypeMismatchSnafu {
            signature,
            expected: any::type_name::<T>(),
            found: object.concrete_type_name(),
        }
        .build()
    })
}
