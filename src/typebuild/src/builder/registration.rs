use std::sync::Arc;

use snafu::prelude::*;

use crate::builder::registry::{NodeId, ParameterEdge, RuntimeType};
use crate::builder::{
    CircularReferenceSnafu, NoConstructorsSnafu, NotAssignableSnafu, NotRegisteredSnafu,
    RegistrationError, TypeBuilder, UndeclaredSnafu,
};
use crate::descriptor::{ConstructorDescriptor, TypeDescriptor, TypeKind};
use crate::lifetime::Lifetime;
use crate::signature::{
    bare_name, format_parameter_signatures, format_signature_with_parameters, Signature,
};
use crate::strategy::{
    DependencyObject, InjectionObject, TypeConstructor, TypeFilter, TypeParser, TypeResolver,
};
use crate::util::any::Object;

/// Type names whose registration is in progress, innermost last.
#[derive(Debug, Default)]
pub(crate) struct Visited {
    names: Vec<String>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    fn pop(&mut self) {
        self.names.pop();
    }

    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|visited| visited == name)
    }
}

impl<C, F, P, R> TypeBuilder<C, F, P, R>
where
    C: TypeConstructor,
    F: TypeFilter,
    P: TypeParser,
    R: TypeResolver,
{
    /// Registers every constructor of the type `name` together with the
    /// types its constructors depend on.
    ///
    /// If `args` is not empty, the binding whose parameters match the types
    /// of `args` is specialised to always be activated with them.
    ///
    /// Registration is not transactional: nodes registered before a failure
    /// stay in the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the type or one of its dependencies can't be
    /// registered. Failures of dependencies are wrapped in
    /// [`RegistrationError::Nested`].
    pub fn register(&mut self, name: &str, args: &[Object]) -> Result<(), RegistrationError> {
        let mut visited = Visited::new();
        self.register_type(name, args, &mut visited)
    }

    /// Binds `value` under `signature`, replacing a value held there.
    pub fn register_instance(&mut self, signature: Signature, value: Object) -> NodeId {
        tracing::debug!(%signature, "registering instance");
        self.registry.upsert(RuntimeType::instance(signature, value))
    }

    /// Binds a zero-parameter constructor under `signature`. A signature
    /// that already has a constructor keeps it.
    pub fn register_factory(
        &mut self,
        signature: Signature,
        constructor: ConstructorDescriptor,
        lifetime: Lifetime,
    ) -> NodeId {
        tracing::debug!(%signature, %lifetime, "registering factory");
        self.registry
            .upsert(RuntimeType::factory(signature, constructor, lifetime))
    }

    fn register_type(
        &mut self,
        name: &str,
        args: &[Object],
        visited: &mut Visited,
    ) -> Result<(), RegistrationError> {
        visited.push(name);
        let res = self.register_candidates(name, args, visited);
        visited.pop();
        res
    }

    fn register_candidates(
        &mut self,
        name: &str,
        args: &[Object],
        visited: &mut Visited,
    ) -> Result<(), RegistrationError> {
        let descriptor = self
            .resolver
            .get_type(&self.catalog, name)
            .context(UndeclaredSnafu { name })?;
        if descriptor.kind() == TypeKind::Value {
            return Ok(());
        }

        let objects: Vec<_> = self
            .constructor
            .dependency_objects(&descriptor, self.options.default_type_instantiation)
            .collect();
        ensure!(!objects.is_empty(), NoConstructorsSnafu { signature: name });

        tracing::debug!(name, candidates = objects.len(), "registering type");
        for object in &objects {
            self.register_dependency_object(object, visited)?;
        }

        if !args.is_empty() {
            self.bind_arguments(name, args)?;
        }
        Ok(())
    }

    fn register_dependency_object(
        &mut self,
        object: &DependencyObject,
        visited: &mut Visited,
    ) -> Result<(), RegistrationError> {
        let signature = object.signature();
        // An aliased binding is reachable through its alias as well.
        if let Some(alias) = object.alias() {
            visited.push(alias);
        }
        let edges = object
            .injection_objects()
            .iter()
            .map(|injection| self.register_injection(object, injection, visited))
            .collect::<Result<Vec<_>, _>>();
        if object.alias().is_some() {
            visited.pop();
        }
        let edges = edges?;

        if let Some(alias) = object.alias() {
            self.check_alias(object.owner(), alias, &signature)?;
        }

        let lifetime = object.lifetime_annotation();
        let candidate = RuntimeType::binding(
            object.id(),
            signature.clone(),
            Arc::clone(object.owner()),
            object.constructor().clone(),
            edges,
            lifetime.unwrap_or_default(),
        );
        let id = self.registry.upsert(candidate);

        let allow_overwrite = self.options.default_type_attribute_overwrite;
        let node = self.registry.node_mut(id);
        node.metadata_mut()
            .register_lifetime(lifetime, allow_overwrite)
            .map_err(|existing| RegistrationError::OverwriteRejected {
                signature: signature.clone(),
                existing: existing.to_string(),
                requested: lifetime.map_or("<none>", Lifetime::to_str).to_string(),
            })?;
        if let Some(lifetime) = lifetime {
            node.set_lifetime(lifetime);
        }
        Ok(())
    }

    fn register_injection(
        &mut self,
        object: &DependencyObject,
        injection: &InjectionObject,
        visited: &mut Visited,
    ) -> Result<ParameterEdge, RegistrationError> {
        let consumer = object.signature();
        let declared_name = injection.declared_type();
        let effective_name = injection.effective_type();

        let declared = self.resolver.get_type(&self.catalog, declared_name);
        let effective = if injection.annotation().override_type().is_some() {
            let effective = self.resolver.get_type(&self.catalog, effective_name);
            if let (Some(candidate), Some(required)) = (&effective, &declared) {
                ensure!(
                    self.filter.is_assignable(candidate, required),
                    NotAssignableSnafu {
                        signature: consumer.clone(),
                        required: declared_name,
                        candidate: effective_name,
                    }
                );
            }
            effective
        } else {
            declared.clone()
        };

        ensure!(
            bare_name(object.owner().name()) != bare_name(declared_name),
            CircularReferenceSnafu {
                signature: consumer.clone(),
                parameter: declared_name,
            }
        );
        let key = object.type_full_name();
        ensure!(
            key != declared_name && key != effective_name,
            CircularReferenceSnafu {
                signature: consumer.clone(),
                parameter: effective_name,
            }
        );
        ensure!(
            !visited.contains(effective_name),
            CircularReferenceSnafu {
                signature: consumer.clone(),
                parameter: effective_name,
            }
        );

        if self.find_node(effective_name, injection.nested()).is_none() {
            match &effective {
                _ if !self.options.default_type_resolution => {
                    return NotRegisteredSnafu {
                        signature: consumer,
                        parameter: injection.signature().to_string(),
                    }
                    .fail();
                }
                Some(descriptor) if self.filter.can_register_parameter(descriptor) => {
                    self.register_nested(effective_name, &consumer, visited)?;
                }
                _ => {}
            }
        }

        if effective_name != declared_name {
            if let Some(descriptor) = &declared {
                if self.filter.can_register(descriptor)
                    && !visited.contains(declared_name)
                    && !self.is_bound(declared_name)
                {
                    self.register_nested(declared_name, &consumer, visited)?;
                }
            }
        }

        let parameter = injection.signature();
        let param_id = self
            .registry
            .upsert(RuntimeType::parameter(parameter.clone(), effective));
        let allow_overwrite = self.options.default_type_attribute_overwrite;
        self.registry
            .node_mut(param_id)
            .metadata_mut()
            .register_injection(&consumer, injection.annotation(), allow_overwrite)
            .map_err(|existing| RegistrationError::OverwriteRejected {
                signature: parameter.clone(),
                existing: existing.to_string(),
                requested: injection.annotation().to_string(),
            })?;

        let target = self.edge_target(param_id, effective_name);
        let registrable = self
            .registry
            .node(target)
            .descriptor()
            .is_some_and(|descriptor| self.filter.can_register(descriptor));
        tracing::debug!(%consumer, %parameter, registrable, "attaching parameter");
        Ok(ParameterEdge::new(parameter, target, registrable))
    }

    fn register_nested(
        &mut self,
        name: &str,
        consumer: &Signature,
        visited: &mut Visited,
    ) -> Result<(), RegistrationError> {
        self.register_type(name, &[], visited)
            .map_err(|source| RegistrationError::Nested {
                signature: consumer.clone(),
                source: Box::new(source),
            })
    }

    fn check_alias(
        &self,
        owner: &TypeDescriptor,
        alias: &str,
        signature: &Signature,
    ) -> Result<(), RegistrationError> {
        let required = self
            .resolver
            .get_type(&self.catalog, alias)
            .context(UndeclaredSnafu { name: alias })?;
        ensure!(
            self.filter.is_assignable(owner, &required),
            NotAssignableSnafu {
                signature: signature.clone(),
                required: alias,
                candidate: owner.name(),
            }
        );
        Ok(())
    }

    /// Specialises the binding of `name` matching the types of `args`. An
    /// aliased binding is found through the type it was declared on.
    fn bind_arguments(&mut self, name: &str, args: &[Object]) -> Result<(), RegistrationError> {
        let parameters = format_parameter_signatures(args);
        let bindings: Vec<_> = self.registry.bindings().collect();
        let found = self.parser.find_all(name, &parameters, &bindings);
        let id = found
            .first()
            .copied()
            .or_else(|| {
                bindings
                    .iter()
                    .find(|node| {
                        node.id().base() == name && node.id().parameters() == parameters.as_slice()
                    })
                    .map(|node| node.node())
            })
            .context(NoConstructorsSnafu {
                signature: format_signature_with_parameters(name, &parameters),
            })?;

        tracing::debug!(signature = %self.registry.node(id).signature(), "binding arguments");
        self.registry.node_mut(id).bind(args.to_vec());
        Ok(())
    }

    fn find_node(&self, name: &str, parameters: &[String]) -> Option<NodeId> {
        let nodes: Vec<_> = self.registry.nodes().collect();
        self.parser.find(name, parameters, &nodes)
    }

    fn is_bound(&self, name: &str) -> bool {
        let bindings: Vec<_> = self.registry.bindings().collect();
        !self.parser.find_all(name, &[], &bindings).is_empty()
    }

    /// The node a parameter is resolved from: the parameter node if it is a
    /// binding, otherwise the only binding of the type if there is one.
    fn edge_target(&self, param_id: NodeId, name: &str) -> NodeId {
        if self.registry.node(param_id).is_binding() {
            return param_id;
        }
        let bindings: Vec<_> = self.registry.bindings().collect();
        match self.parser.find_all(name, &[], &bindings).as_slice() {
            [single] => *single,
            _ => param_id,
        }
    }
}
