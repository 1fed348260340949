use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use typebuild::prelude::*;

pub trait Cache: Send + Sync {}

#[derive(Debug)]
pub struct Unavailable;

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unavailable")
    }
}

impl std::error::Error for Unavailable {}

pub struct Disk;

#[injectable(satisfies(dyn Cache))]
impl Disk {
    #[dependency(alias = dyn Cache)]
    pub fn open() -> Result<Self, Unavailable> {
        Err(Unavailable)
    }

    #[dependency(singleton, alias = dyn Cache)]
    pub fn at(_root: String) -> std::result::Result<Disk, Infallible> {
        Ok(Disk)
    }
}

impl Cache for Disk {}

pub struct Index;

#[injectable]
impl Index {
    #[dependency(lazy)]
    pub fn new(#[injection(transient)] _disk: Arc<Disk>) -> Result<Index, Unavailable> {
        Ok(Index)
    }

    #[dependency]
    pub fn over(
        #[injection(Disk, singleton)] _cache: Contract<dyn Cache>,
        _size: usize,
    ) -> Result<Self, Infallible> {
        Ok(Index)
    }
}

pub struct Plain;

#[injectable]
impl Plain {
    #[dependency(transient)]
    pub fn new(_index: Option<Arc<Index>>) -> Plain {
        Plain
    }
}

fn main() {
    assert_eq!(Disk::describe().constructors().len(), 2);
    assert_eq!(Index::describe().constructors().len(), 2);
    assert_eq!(Plain::describe().constructors().len(), 1);
}
