//! The store of bindings built up by registration.

mod metadata;
mod runtime_type;

use indexmap::IndexMap;

use crate::signature::Signature;

pub use metadata::{InjectionRecord, OverrideMetadata};
pub use runtime_type::{ParameterEdge, RuntimeType};

/// Index of a node inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(usize);

/// An arena of [`RuntimeType`] nodes addressed by their signatures.
///
/// Nodes are kept in insertion order and are only dropped all at once by
/// [`Registry::reset`].
#[derive(Debug, Default)]
pub struct Registry {
    nodes: Vec<RuntimeType>,
    index: IndexMap<Signature, NodeId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `candidate` under its signature, or merges it into the node
    /// already registered there. Returns the node now holding the signature.
    pub fn upsert(&mut self, mut candidate: RuntimeType) -> NodeId {
        if let Some(&id) = self.index.get(candidate.signature()) {
            tracing::debug!(signature = %candidate.signature(), "merging into registered node");
            self.nodes[id.0].merge(candidate);
            return id;
        }

        let id = NodeId(self.nodes.len());
        tracing::debug!(signature = %candidate.signature(), "registering node");
        candidate.set_node(id);
        self.index.insert(candidate.signature().clone(), id);
        self.nodes.push(candidate);
        id
    }

    pub fn lookup(&self, signature: &str) -> Option<&RuntimeType> {
        self.node_id(signature).map(|id| self.node(id))
    }

    pub fn node_id(&self, signature: &str) -> Option<NodeId> {
        self.index.get(signature).copied()
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.index.contains_key(signature)
    }

    /// # Panics
    ///
    /// Panics if `id` was not handed out by this registry since the last
    /// reset.
    pub fn node(&self, id: NodeId) -> &RuntimeType {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not handed out by this registry since the last
    /// reset.
    pub fn node_mut(&mut self, id: NodeId) -> &mut RuntimeType {
        &mut self.nodes[id.0]
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &RuntimeType> {
        self.nodes.iter()
    }

    /// Nodes which can produce an object by themselves.
    pub fn bindings(&self) -> impl Iterator<Item = &RuntimeType> {
        self.nodes.iter().filter(|node| node.is_binding())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn reset(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    /// Underlying identities of all nodes.
    pub fn runtime_types(&self) -> Vec<&Signature> {
        self.nodes.iter().map(RuntimeType::id).collect()
    }

    /// Underlying identities of nodes registered under another name.
    pub fn runtime_aliased_types(&self) -> Vec<&Signature> {
        self.nodes
            .iter()
            .filter(|node| node.is_aliased())
            .map(RuntimeType::id)
            .collect()
    }

    /// Underlying identities of nodes registered under their own name.
    pub fn runtime_non_aliased_types(&self) -> Vec<&Signature> {
        self.nodes
            .iter()
            .filter(|node| !node.is_aliased())
            .map(RuntimeType::id)
            .collect()
    }

    /// Keys of nodes registered under another name.
    pub fn runtime_type_aliases(&self) -> Vec<&Signature> {
        self.nodes
            .iter()
            .filter(|node| node.is_aliased())
            .map(RuntimeType::signature)
            .collect()
    }

    /// All keys in insertion order.
    pub fn signatures(&self) -> Vec<&Signature> {
        self.index.keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::descriptor::{ConstructorDescriptor, TypeDescriptor, TypeKind};
    use crate::lifetime::Lifetime;
    use crate::signature::format_signature_with_parameters;
    use crate::util::any::Object;

    use super::*;

    struct Sql;

    fn sql_binding(key: &str) -> RuntimeType {
        RuntimeType::binding(
            Signature::new("app::Sql"),
            Signature::new(key),
            Arc::new(TypeDescriptor::named("app::Sql", TypeKind::Class)),
            ConstructorDescriptor::new(|_| Ok(Sql)),
            Vec::new(),
            Lifetime::Singleton,
        )
    }

    #[test]
    fn registry_upsert_inserts_once() {
        let mut registry = Registry::new();

        let first = registry.upsert(RuntimeType::parameter(Signature::new("app::A"), None));
        let second = registry.upsert(RuntimeType::parameter(Signature::new("app::A"), None));

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.node(first).node(), first);
        assert!(registry.contains("app::A"));
        assert!(registry.lookup("app::B").is_none());
    }

    #[test]
    fn registry_upsert_merges_binding_into_parameter() {
        let mut registry = Registry::new();
        let param = registry.upsert(RuntimeType::parameter(Signature::new("app::IRepo"), None));
        assert!(!registry.node(param).is_binding());

        let merged = registry.upsert(sql_binding("app::IRepo"));

        assert_eq!(param, merged);
        let node = registry.node(merged);
        assert!(node.is_binding());
        assert!(node.is_aliased());
        assert_eq!(node.id().as_str(), "app::Sql");
        assert_eq!(node.lifetime(), Lifetime::Singleton);
        assert_eq!(registry.bindings().count(), 1);
    }

    #[test]
    fn registry_upsert_replaces_held_value() {
        let mut registry = Registry::new();
        let first: Object = Arc::new(1i32);
        let second: Object = Arc::new(2i32);

        let id = registry.upsert(RuntimeType::instance(Signature::new("i32"), first));
        registry.node_mut(id).cache(Arc::new(0i32));
        registry.upsert(RuntimeType::instance(Signature::new("i32"), second.clone()));

        let node = registry.node(id);
        assert!(node.value().is_some_and(|v| Arc::ptr_eq(v, &second)));
        assert!(node.cached().is_none());
    }

    #[test]
    fn registry_enumerations_succeed() {
        let mut registry = Registry::new();
        registry.upsert(sql_binding("app::Sql"));
        registry.upsert(sql_binding("app::IRepo"));
        registry.upsert(RuntimeType::parameter(
            format_signature_with_parameters("app::B", &["app::IRepo".to_string()]),
            None,
        ));

        let strs = |sigs: Vec<&Signature>| -> Vec<String> {
            sigs.into_iter().map(ToString::to_string).collect()
        };
        assert_eq!(
            strs(registry.signatures()),
            ["app::Sql", "app::IRepo", "app::B(app::IRepo)"]
        );
        assert_eq!(
            strs(registry.runtime_types()),
            ["app::Sql", "app::Sql", "app::B(app::IRepo)"]
        );
        assert_eq!(strs(registry.runtime_aliased_types()), ["app::Sql"]);
        assert_eq!(strs(registry.runtime_type_aliases()), ["app::IRepo"]);
        assert_eq!(
            strs(registry.runtime_non_aliased_types()),
            ["app::Sql", "app::B(app::IRepo)"]
        );
    }

    #[test]
    fn registry_reset_succeeds() {
        let mut registry = Registry::new();
        registry.upsert(sql_binding("app::Sql"));

        registry.reset();

        assert!(registry.is_empty());
        assert!(registry.signatures().is_empty());
        assert!(registry.lookup("app::Sql").is_none());
    }
}
