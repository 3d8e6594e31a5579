use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;

/// Type-erased runtime value, tagged with its descriptor.
///
/// Cloning is cheap (shared `Arc`), so identity conversions and upcasts
/// never copy the payload.
#[derive(Clone)]
pub struct Value {
    ty: TypeDescriptor,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            ty: TypeDescriptor::of::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the payload out. Clones it only when the `Arc` is still shared.
    ///
    /// Returns the value back unchanged if it does not hold a `T`.
    pub fn downcast<T: Any + Send + Sync + Clone>(self) -> Result<T, Value> {
        self.downcast_arc::<T>()
            .map(|shared| Arc::try_unwrap(shared).unwrap_or_else(|shared| (*shared).clone()))
    }

    /// Like [`Value::downcast`], for payloads that are not `Clone`.
    pub fn downcast_arc<T: Any + Send + Sync>(self) -> Result<Arc<T>, Value> {
        let Value { ty, inner } = self;
        inner.downcast::<T>().map_err(|inner| Value { ty, inner })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.ty)
    }
}
