use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::builder::registry::{NodeId, OverrideMetadata};
use crate::descriptor::{ConstructorDescriptor, TypeDescriptor};
use crate::lifetime::Lifetime;
use crate::signature::Signature;
use crate::util::any::Object;

/// One entry of the [`Registry`](super::Registry).
///
/// A node is either a binding, which knows how to produce an object through
/// its constructor or a held value, or a bare parameter node which only
/// records that some constructor asks for the type.
pub struct RuntimeType {
    node: NodeId,
    id: Signature,
    signature: Signature,
    descriptor: Option<Arc<TypeDescriptor>>,
    constructor: Option<ConstructorDescriptor>,
    parameters: Vec<ParameterEdge>,
    lifetime: Lifetime,
    value: Option<Object>,
    invoke: bool,
    bound: Option<Vec<Object>>,
    metadata: OverrideMetadata,
    instance: Option<Object>,
    revision: u64,
}

impl RuntimeType {
    fn empty(id: Signature, signature: Signature) -> Self {
        Self {
            node: NodeId::default(),
            id,
            signature,
            descriptor: None,
            constructor: None,
            parameters: Vec::new(),
            lifetime: Lifetime::default(),
            value: None,
            invoke: false,
            bound: None,
            metadata: OverrideMetadata::new(),
            instance: None,
            revision: 0,
        }
    }

    /// Creates a node for a type some constructor depends on.
    pub fn parameter(signature: Signature, descriptor: Option<Arc<TypeDescriptor>>) -> Self {
        Self {
            descriptor,
            ..Self::empty(signature.clone(), signature)
        }
    }

    /// Creates a binding activated through `constructor`.
    pub fn binding(
        id: Signature,
        signature: Signature,
        descriptor: Arc<TypeDescriptor>,
        constructor: ConstructorDescriptor,
        parameters: Vec<ParameterEdge>,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            descriptor: Some(descriptor),
            constructor: Some(constructor),
            parameters,
            lifetime,
            ..Self::empty(id, signature)
        }
    }

    /// Creates a binding which always resolves to `value`.
    pub fn instance(signature: Signature, value: Object) -> Self {
        Self {
            lifetime: Lifetime::Singleton,
            value: Some(value),
            ..Self::empty(signature.clone(), signature)
        }
    }

    /// Creates a binding around a zero-argument producer.
    pub fn factory(signature: Signature, constructor: ConstructorDescriptor, lifetime: Lifetime) -> Self {
        Self {
            constructor: Some(constructor),
            lifetime,
            ..Self::empty(signature.clone(), signature)
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub(super) fn set_node(&mut self, node: NodeId) {
        self.node = node;
    }

    /// The underlying identity: the owning type's own name plus the
    /// parameter signatures.
    pub fn id(&self) -> &Signature {
        &self.id
    }

    /// The registry key.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns true if the key differs from the underlying identity.
    pub fn is_aliased(&self) -> bool {
        self.id != self.signature
    }

    /// Returns true if the node can produce an object by itself.
    pub fn is_binding(&self) -> bool {
        self.constructor.is_some() || self.value.is_some()
    }

    pub fn descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        self.descriptor.as_ref()
    }

    pub fn constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructor.as_ref()
    }

    pub fn parameters(&self) -> &[ParameterEdge] {
        &self.parameters
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn set_lifetime(&mut self, lifetime: Lifetime) {
        if self.lifetime != lifetime {
            self.lifetime = lifetime;
            self.invalidate();
        }
    }

    pub fn value(&self) -> Option<&Object> {
        self.value.as_ref()
    }

    /// Returns true if resolution must run the activator with the bound
    /// arguments instead of handing out the held value.
    pub fn invoke(&self) -> bool {
        self.invoke
    }

    pub fn bound(&self) -> Option<&[Object]> {
        self.bound.as_deref()
    }

    /// Binds explicit construction arguments to the node.
    pub fn bind(&mut self, arguments: Vec<Object>) {
        self.bound = Some(arguments);
        self.invoke = true;
        self.invalidate();
    }

    pub fn metadata(&self) -> &OverrideMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut OverrideMetadata {
        &mut self.metadata
    }

    /// The cached object of a singleton binding.
    pub fn cached(&self) -> Option<&Object> {
        self.instance.as_ref()
    }

    pub fn cache(&mut self, object: Object) {
        self.instance = Some(object);
    }

    /// Counts the changes to how the node produces its object. Objects
    /// produced by an older revision must not be handed out any more.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn invalidate(&mut self) {
        self.instance = None;
        self.revision += 1;
    }

    /// Merges the identity of `candidate` into `self`.
    ///
    /// Missing pieces are taken from the candidate. Edges are only taken if
    /// `self` has none, and a held value in the candidate replaces the
    /// current one.
    pub(super) fn merge(&mut self, candidate: RuntimeType) {
        if self.descriptor.is_none() {
            self.descriptor = candidate.descriptor;
        }
        if self.constructor.is_none() && candidate.constructor.is_some() {
            self.constructor = candidate.constructor;
            self.id = candidate.id;
            self.lifetime = candidate.lifetime;
            self.invalidate();
        }
        if self.parameters.is_empty() {
            self.parameters = candidate.parameters;
        }
        if let Some(value) = candidate.value {
            self.value = Some(value);
            self.invoke = false;
            self.lifetime = candidate.lifetime;
            self.invalidate();
        }
    }
}

impl Debug for RuntimeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RuntimeType")
            .field("node", &self.node)
            .field("id", &self.id)
            .field("signature", &self.signature)
            .field("parameters", &self.parameters)
            .field("lifetime", &self.lifetime)
            .field("has_value", &self.value.is_some())
            .field("invoke", &self.invoke)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// A dependency of a binding on one of its constructor parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEdge {
    signature: Signature,
    target: NodeId,
    registrable: bool,
}

impl ParameterEdge {
    pub fn new(signature: Signature, target: NodeId, registrable: bool) -> Self {
        Self {
            signature,
            target,
            registrable,
        }
    }

    /// The registry key of the parameter as the constructor declares it.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The node the parameter is resolved from.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns true if the parameter type can be registered on its own.
    pub fn registrable(&self) -> bool {
        self.registrable
    }
}
