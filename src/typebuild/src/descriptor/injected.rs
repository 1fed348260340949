use std::any;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ops::Deref;
use std::sync::Arc;

use crate::util::any::{Downcast, Managed, Object};

/// A type that can appear as a constructor parameter.
///
/// An implementation names the signature the parameter is registered under
/// and converts the type-erased argument back to the parameter type. A
/// conversion returns [`None`] if the argument is absent or has another type.
pub trait Injected: Sized {
    fn signature() -> String;

    /// Signatures of the types this parameter is composed of.
    fn nested() -> Vec<String> {
        Vec::new()
    }

    fn from_argument(argument: Option<Object>) -> Option<Self>;
}

impl<T> Injected for Arc<T>
where
    T: Managed,
{
    fn signature() -> String {
        any::type_name::<T>().to_string()
    }

    fn from_argument(argument: Option<Object>) -> Option<Self> {
        argument.and_then(|obj| obj.downcast_arc::<T>().ok())
    }
}

impl<P> Injected for Option<P>
where
    P: Injected,
{
    fn signature() -> String {
        P::signature()
    }

    fn nested() -> Vec<String> {
        P::nested()
    }

    fn from_argument(argument: Option<Object>) -> Option<Self> {
        match argument {
            Some(obj) => P::from_argument(Some(obj)).map(Some),
            None => Some(None),
        }
    }
}

macro_rules! impl_injected_for_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Injected for $ty {
                fn signature() -> String {
                    any::type_name::<$ty>().to_string()
                }

                fn from_argument(argument: Option<Object>) -> Option<Self> {
                    argument
                        .and_then(|obj| obj.downcast_arc::<$ty>().ok())
                        .map(|value| (*value).clone())
                }
            }
        )*
    };
}

impl_injected_for_values!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

/// A shared object injected through a contract, typically a trait object
/// such as `Contract<dyn Repository>`.
///
/// Bindings of a contract hold an `Arc<T>` as their object, which is what
/// `#[dependency(alias = dyn Trait)]` constructors produce.
pub struct Contract<T>
where
    T: ?Sized + 'static,
{
    inner: Arc<T>,
}

impl<T> Contract<T>
where
    T: ?Sized + 'static,
{
    pub fn new(inner: Arc<T>) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T> Clone for Contract<T>
where
    T: ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Deref for Contract<T>
where
    T: ?Sized + 'static,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> Debug for Contract<T>
where
    T: ?Sized + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Contract")
            .field("target", &any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> Injected for Contract<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn signature() -> String {
        any::type_name::<T>().to_string()
    }

    fn from_argument(argument: Option<Object>) -> Option<Self> {
        argument
            .and_then(|obj| obj.downcast_arc::<Arc<T>>().ok())
            .map(|inner| Self::new(Arc::clone(&inner)))
    }
}

/// A deferred producer of `T`, injected where a consumer wants to create
/// objects on demand.
pub struct Factory<T>
where
    T: ?Sized + 'static,
{
    produce: Arc<dyn Fn() -> Arc<T> + Send + Sync>,
}

impl<T> Factory<T>
where
    T: ?Sized + 'static,
{
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Self {
            produce: Arc::new(produce),
        }
    }

    /// Invokes the producer.
    pub fn get(&self) -> Arc<T> {
        (self.produce)()
    }

    /// Returns true if both factories share the same producer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.produce, &other.produce)
    }
}

impl<T> Clone for Factory<T>
where
    T: ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            produce: Arc::clone(&self.produce),
        }
    }
}

impl<T> Debug for Factory<T>
where
    T: ?Sized + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Factory")
            .field("target", &any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> Injected for Factory<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn signature() -> String {
        any::type_name::<Self>().to_string()
    }

    fn nested() -> Vec<String> {
        vec![any::type_name::<T>().to_string()]
    }

    fn from_argument(argument: Option<Object>) -> Option<Self> {
        argument
            .and_then(|obj| obj.downcast_arc::<Self>().ok())
            .map(|factory| (*factory).clone())
    }
}
