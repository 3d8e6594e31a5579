use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use morph_api::{BoxError, TypeDescriptor, Value};

use crate::rule::{ErasedFn, erase};

/// A declared, lossless `Sub → Super` conversion.
#[derive(Clone)]
pub struct Upcast {
    from: TypeDescriptor,
    to: TypeDescriptor,
    f: ErasedFn,
}

impl Upcast {
    pub fn from_type(&self) -> TypeDescriptor {
        self.from
    }

    pub fn to_type(&self) -> TypeDescriptor {
        self.to
    }

    pub fn apply(&self, value: &Value) -> Result<Value, BoxError> {
        (self.f)(value)
    }
}

impl fmt::Debug for Upcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Upcast({} -> {})", self.from, self.to)
    }
}

/// Assignability relation used for polymorphic matching.
///
/// Rust has no class hierarchy, so "`Sub` is assignable to `Super`" is a
/// declaration carrying the upcast function. The relation is reflexive and
/// not transitive: every pair is declared explicitly.
///
/// Examples:
/// - newtype to its representation: `UserId → u64`
/// - concrete type to a trait object: `Celsius → Box<dyn Temperature>`
#[derive(Clone, Default)]
pub struct TypeHierarchy {
    upcasts: HashMap<(TypeDescriptor, TypeDescriptor), Upcast>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `Sub` assignable to `Super`.
    ///
    /// A later declaration for the same pair replaces the earlier one.
    pub fn with<Sub, Super>(mut self, upcast: impl Fn(&Sub) -> Super + Send + Sync + 'static) -> Self
    where
        Sub: Any + Send + Sync,
        Super: Any + Send + Sync,
    {
        self.declare(upcast);
        self
    }

    /// Declare `Sub` assignable to `Super` through a checked cast.
    ///
    /// Assignability is still decided by the declaration alone; an `Err` from
    /// `upcast` surfaces as `ConvertError::FunctionFailure` when it runs.
    pub fn with_fallible<Sub, Super, E>(
        mut self,
        upcast: impl Fn(&Sub) -> Result<Super, E> + Send + Sync + 'static,
    ) -> Self
    where
        Sub: Any + Send + Sync,
        Super: Any + Send + Sync,
        E: Into<BoxError>,
    {
        self.declare_fallible(upcast);
        self
    }

    pub fn declare<Sub, Super>(&mut self, upcast: impl Fn(&Sub) -> Super + Send + Sync + 'static)
    where
        Sub: Any + Send + Sync,
        Super: Any + Send + Sync,
    {
        self.declare_fallible(move |v: &Sub| Ok::<_, BoxError>(upcast(v)));
    }

    pub fn declare_fallible<Sub, Super, E>(
        &mut self,
        upcast: impl Fn(&Sub) -> Result<Super, E> + Send + Sync + 'static,
    ) where
        Sub: Any + Send + Sync,
        Super: Any + Send + Sync,
        E: Into<BoxError>,
    {
        let from = TypeDescriptor::of::<Sub>();
        let to = TypeDescriptor::of::<Super>();
        if from == to {
            return;
        }
        let f = erase::<Sub, Super>(move |v: &Sub| upcast(v).map_err(Into::into));
        self.upcasts.insert((from, to), Upcast { from, to, f });
    }

    pub fn is_assignable(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> bool {
        sub == sup || self.upcasts.contains_key(&(*sub, *sup))
    }

    /// Declared upcast for a pair of distinct types.
    pub fn upcast(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> Option<&Upcast> {
        self.upcasts.get(&(*sub, *sup))
    }

    pub fn len(&self) -> usize {
        self.upcasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upcasts.is_empty()
    }
}

impl fmt::Debug for TypeHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHierarchy")
            .field("upcasts", &self.upcasts.len())
            .finish()
    }
}
