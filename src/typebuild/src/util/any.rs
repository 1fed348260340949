use std::any::{self, Any};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

/// A type-erased object handed to and produced by activators.
pub type Object = Arc<dyn Managed>;

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

/// Anything the builder can hold, construct or pass as an argument.
pub trait Managed: AsAny + Send + Sync + 'static {
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T> Managed for T
where
    T: Any + Send + Sync,
{
    #[inline]
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Debug for dyn Managed {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Object")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}

pub trait Downcast: Sized {
    fn is<T: Any>(&self) -> bool;

    fn downcast_arc<T: Any + Send + Sync>(self) -> Result<Arc<T>, Self>;

    /// Name of the concrete type behind the erased object.
    fn concrete_type_name(&self) -> &'static str;
}

impl Downcast for Object {
    #[inline]
    fn is<T: Any>(&self) -> bool {
        (**self).as_any().is::<T>()
    }

    fn downcast_arc<T: Any + Send + Sync>(self) -> Result<Arc<T>, Self> {
        if self.is::<T>() {
            let res = self
                .into_any_arc()
                .downcast::<T>()
                .unwrap_or_else(|_| std::unreachable!("`self` should be `Arc<T>`"));
            Ok(res)
        } else {
            Err(self)
        }
    }

    #[inline]
    fn concrete_type_name(&self) -> &'static str {
        (**self).type_name()
    }
}
