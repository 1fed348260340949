use std::sync::Arc;

use typebuild::prelude::*;

pub trait Store: Send + Sync {}

pub struct Memory;

#[injectable(satisfies(dyn Store))]
impl Memory {
    #[dependency(singleton)]
    pub fn new() -> Self {
        Memory
    }

    #[dependency(lazy, alias = dyn Store)]
    pub fn shared(#[injection(transient)] _seed: Option<u64>) -> Self {
        Memory
    }
}

impl Store for Memory {}

pub struct Service;

#[injectable]
impl Service {
    #[dependency]
    pub fn new(
        _store: Contract<dyn Store>,
        #[injection(Memory, singleton)] _memory: Arc<Memory>,
        #[injection("typebuild::Other")] _other: Option<Arc<Memory>>,
        _factory: Factory<Memory>,
    ) -> Self {
        Service
    }

    #[dependency(transient)]
    pub fn with_memory(_memory: Arc<Memory>) -> Result<Self, std::fmt::Error> {
        Ok(Service)
    }

    pub fn helper(&self) {}
}

fn main() {
    let descriptor = Service::describe();
    assert_eq!(descriptor.constructors().len(), 2);
}
