use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::{Injectable, TypeDescriptor};

/// The descriptor table types are resolved from.
#[derive(Debug, Default)]
pub struct Catalog {
    descriptors: IndexMap<String, Arc<TypeDescriptor>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor, replacing an earlier one of the same name.
    pub fn declare(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        let name = descriptor.name().to_string();
        if self
            .descriptors
            .insert(name, Arc::clone(&descriptor))
            .is_some()
        {
            tracing::debug!(name = descriptor.name(), "descriptor redeclared");
        }
        descriptor
    }

    pub fn declare_type<T: Injectable>(&mut self) -> Arc<TypeDescriptor> {
        self.declare(T::describe())
    }

    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.descriptors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}
