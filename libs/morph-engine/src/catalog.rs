use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use morph_api::{BoxError, Convert, ConvertError, TypeDescriptor, Value};

use crate::config::CatalogConfig;
use crate::rule::{ErasedFn, erase};
use crate::standard;

/// Standard-conversion catalog: one function per exact `(from, to)` pair.
///
/// Entries are one-directional; a round trip needs two entries. The catalog
/// implements `Convert` itself, so it can stand in wherever a converter is
/// expected.
#[derive(Clone, Default)]
pub struct Catalog {
    entries: HashMap<(TypeDescriptor, TypeDescriptor), ErasedFn>,
}

impl Catalog {
    /// Catalog without entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog with the standard policies enabled in `config`.
    pub fn standard(config: &CatalogConfig) -> Self {
        let mut catalog = Self::empty();
        if config.numeric_widening {
            standard::numeric_widening(&mut catalog);
        }
        if config.string_parsing {
            standard::string_parsing(&mut catalog);
        }
        if config.containers {
            standard::containers(&mut catalog);
        }
        if config.json {
            standard::json(&mut catalog);
        }
        tracing::debug!(entries = catalog.len(), "built standard catalog");
        catalog
    }

    /// Register a fallible `S → T` entry, replacing any previous one.
    pub fn insert<S, T, E>(&mut self, f: impl Fn(&S) -> Result<T, E> + Send + Sync + 'static)
    where
        S: Any + Send + Sync,
        T: Any + Send + Sync,
        E: Into<BoxError>,
    {
        let key = (TypeDescriptor::of::<S>(), TypeDescriptor::of::<T>());
        let f = erase::<S, T>(move |v: &S| -> Result<T, BoxError> { f(v).map_err(Into::into) });
        self.entries.insert(key, f);
    }

    /// Register an `S → T` entry that cannot fail.
    pub fn insert_total<S, T>(&mut self, f: impl Fn(&S) -> T + Send + Sync + 'static)
    where
        S: Any + Send + Sync,
        T: Any + Send + Sync,
    {
        self.insert::<S, T, BoxError>(move |v: &S| Ok(f(v)));
    }

    pub fn contains(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> bool {
        self.entries.contains_key(&(*from, *to))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the entry for `(value type, target)`, if any.
    pub(crate) fn apply(&self, value: &Value, target: &TypeDescriptor) -> Option<Result<Value, ConvertError>> {
        let from = *value.ty();
        let f = self.entries.get(&(from, *target))?;
        Some(f(value).map_err(|cause| ConvertError::failure(from, *target, cause)))
    }
}

impl Convert for Catalog {
    fn convert_value(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, ConvertError> {
        self.apply(value, target)
            .unwrap_or_else(|| Err(ConvertError::no_conversion(*value.ty(), *target)))
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("entries", &self.entries.len())
            .finish()
    }
}
