use snafu::prelude::*;

use crate::builder::registry::{NodeId, ParameterEdge};
use crate::builder::{
    ActivationSnafu, AmbiguousSnafu, InstantiationError, NoCandidatesSnafu,
    UnresolvedDependencySnafu, TypeBuilder,
};
use crate::lifetime::Lifetime;
use crate::signature::{format_parameter_signatures, Signature};
use crate::strategy::{TypeConstructor, TypeFilter, TypeParser, TypeResolver};
use crate::util::any::Object;

/// How parameters which can't be resolved are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// Fail the whole activation.
    Strict,
    /// Substitute absence and go on.
    Lenient,
}

impl<C, F, P, R> TypeBuilder<C, F, P, R>
where
    C: TypeConstructor,
    F: TypeFilter,
    P: TypeParser,
    R: TypeResolver,
{
    /// Activates the binding registered under `signature`, or the single
    /// binding of that type matching the types of `args`.
    ///
    /// Parameters not supplied through `args` or bound at registration are
    /// resolved along the binding's own edges.
    ///
    /// # Errors
    ///
    /// Returns an error if no binding or more than one binding matches, if a
    /// parameter edge can't be resolved, or if an activator fails.
    pub fn create_instance(
        &mut self,
        signature: &str,
        args: &[Object],
    ) -> Result<Object, InstantiationError> {
        let id = match self.exact_binding(signature, args) {
            Some(id) => id,
            None => self.select_candidate(signature, args, true)?,
        };
        self.activate(id, args, Resolution::Strict)
    }

    /// Like [`TypeBuilder::create_instance`], but resolves every parameter
    /// not covered by `args` from the registry and substitutes absence for
    /// parameters that have no unique binding.
    ///
    /// # Errors
    ///
    /// Returns an error if no binding or more than one binding matches, or if
    /// an activator fails.
    pub fn get_instance(
        &mut self,
        signature: &str,
        args: &[Object],
    ) -> Result<Object, InstantiationError> {
        let id = match self.exact_binding(signature, args) {
            Some(id) => id,
            None => self.select_candidate(signature, args, false)?,
        };

        let node = self.registry.node(id);
        let arity = node.constructor().map_or(0, |c| c.parameters().len());
        let args = if !node.invoke() && !args.is_empty() && args.len() >= arity {
            args
        } else {
            &[]
        };
        self.activate(id, args, Resolution::Lenient)
    }

    /// The binding registered under exactly `signature`, unless `args` can't
    /// be passed to its constructor.
    fn exact_binding(&self, signature: &str, args: &[Object]) -> Option<NodeId> {
        self.registry.node_id(signature).filter(|id| {
            let node = self.registry.node(*id);
            node.is_binding() && (args.is_empty() || node.signature().arity() == args.len())
        })
    }

    fn select_candidate(
        &self,
        signature: &str,
        args: &[Object],
        prefer_parameterless: bool,
    ) -> Result<NodeId, InstantiationError> {
        let parameters = format_parameter_signatures(args);
        let bindings: Vec<_> = self.registry.bindings().collect();
        let found = self.parser.find_all(signature, &parameters, &bindings);
        tracing::trace!(signature, candidates = found.len(), "selecting candidate");

        match found.as_slice() {
            [] => NoCandidatesSnafu { signature }.fail(),
            [single] => Ok(*single),
            many if prefer_parameterless && args.is_empty() => many
                .iter()
                .copied()
                .find(|id| self.registry.node(*id).signature().arity() == 0)
                .context(AmbiguousSnafu {
                    signature,
                    count: many.len(),
                }),
            many => AmbiguousSnafu {
                signature,
                count: many.len(),
            }
            .fail(),
        }
    }

    fn activate(
        &mut self,
        id: NodeId,
        args: &[Object],
        resolution: Resolution,
    ) -> Result<Object, InstantiationError> {
        let node = self.registry.node(id);
        // Explicit arguments always produce a fresh object.
        let explicit = !args.is_empty();
        if let (Some(cached), false) = (node.cached(), explicit) {
            tracing::trace!(signature = %node.signature(), "reusing singleton");
            return Ok(cached.clone());
        }
        if let (Some(value), false) = (node.value(), node.invoke()) {
            return Ok(value.clone());
        }

        let bound: Option<Vec<_>> = node
            .bound()
            .map(|bound| bound.iter().cloned().map(Some).collect());
        let arguments = if explicit {
            args.iter().cloned().map(Some).collect()
        } else if let Some(bound) = bound {
            bound
        } else {
            self.resolve_parameters(id, resolution)?
        };

        let node = self.registry.node(id);
        let signature = node.signature().clone();
        let constructor = node
            .constructor()
            .context(NoCandidatesSnafu {
                signature: signature.clone(),
            })?
            .clone();
        tracing::trace!(%signature, "activating");
        let object = constructor
            .activate(arguments)
            .context(ActivationSnafu { signature })?;

        if node.lifetime() == Lifetime::Singleton && !explicit {
            self.registry.node_mut(id).cache(object.clone());
        }
        Ok(object)
    }

    fn resolve_parameters(
        &mut self,
        id: NodeId,
        resolution: Resolution,
    ) -> Result<Vec<Option<Object>>, InstantiationError> {
        let node = self.registry.node(id);
        let consumer = node.signature().clone();
        let edges = node.parameters().to_vec();
        edges
            .iter()
            .map(|edge| self.resolve_edge(&consumer, edge, resolution))
            .collect()
    }

    fn resolve_edge(
        &mut self,
        consumer: &Signature,
        edge: &ParameterEdge,
        resolution: Resolution,
    ) -> Result<Option<Object>, InstantiationError> {
        let target = match resolution {
            Resolution::Strict => Some(edge.target())
                .filter(|target| self.registry.node(*target).is_binding())
                .or_else(|| self.unique_binding(edge.signature())),
            Resolution::Lenient => self.unique_binding(edge.signature()),
        };

        let Some(target) = target else {
            return match resolution {
                Resolution::Strict => UnresolvedDependencySnafu {
                    signature: consumer.clone(),
                    parameter: edge.signature().clone(),
                }
                .fail(),
                Resolution::Lenient => {
                    tracing::warn!(
                        %consumer,
                        parameter = %edge.signature(),
                        "dependency unresolved, substituting absence"
                    );
                    Ok(None)
                }
            };
        };

        let param = self.registry.node_id(edge.signature().as_str());
        let record = param.and_then(|param| {
            self.registry
                .node(param)
                .metadata()
                .injection(consumer.as_str())
        });
        let per_call = record
            .and_then(|record| record.annotation().lifetime())
            .map_or(
                self.registry.node(target).lifetime() == Lifetime::Lazy,
                Lifetime::is_per_call,
            );
        let revision = self.registry.node(target).revision();
        if !per_call {
            if let Some(shared) = record.and_then(|record| record.shared(target, revision)) {
                return Ok(Some(shared.clone()));
            }
        }

        let object = self.activate(target, &[], resolution)?;
        if !per_call {
            if let Some(record) = param.and_then(|param| {
                self.registry
                    .node_mut(param)
                    .metadata_mut()
                    .injection_mut(consumer.as_str())
            }) {
                record.set_shared(object.clone(), target, revision);
            }
        }
        Ok(Some(object))
    }

    /// The only binding of the type named by `signature`, if there is
    /// exactly one.
    fn unique_binding(&self, signature: &Signature) -> Option<NodeId> {
        let bindings: Vec<_> = self.registry.bindings().collect();
        match self
            .parser
            .find_all(signature.base(), signature.parameters(), &bindings)
            .as_slice()
        {
            [single] => Some(*single),
            _ => None,
        }
    }
}
