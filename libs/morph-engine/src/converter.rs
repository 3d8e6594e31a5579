use std::fmt;
use std::sync::Arc;

use morph_api::{Convert, ConvertError, TypeDescriptor, Value};

use crate::adapter::Adapter;
use crate::catalog::Catalog;
use crate::config::MorphConfig;
use crate::hierarchy::TypeHierarchy;

/// Base converter at the root of every adapter chain.
///
/// Resolution order:
/// 1. identity: the value already has the target type;
/// 2. catalog entry for the exact pair;
/// 3. declared upcast from the value type to the target type;
/// 4. `NoApplicableConversion`.
///
/// Immutable after construction; clones share the catalog and hierarchy.
#[derive(Clone)]
pub struct StandardConverter {
    catalog: Arc<Catalog>,
    hierarchy: Arc<TypeHierarchy>,
}

impl StandardConverter {
    /// Converter with every standard policy enabled and no declared upcasts.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn from_config(config: &MorphConfig) -> Self {
        Self::builder()
            .catalog(Catalog::standard(&config.catalog))
            .build()
    }

    pub fn builder() -> StandardConverterBuilder {
        StandardConverterBuilder::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn hierarchy(&self) -> &Arc<TypeHierarchy> {
        &self.hierarchy
    }

    /// New adapter with an empty rule table over this converter.
    pub fn adapt(&self) -> Adapter {
        Adapter::with_hierarchy(Arc::new(self.clone()), Arc::clone(&self.hierarchy))
    }
}

impl Default for StandardConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Convert for StandardConverter {
    fn convert_value(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, ConvertError> {
        let source = *value.ty();
        if source == *target {
            return Ok(value.clone());
        }
        if let Some(result) = self.catalog.apply(value, target) {
            tracing::trace!(from = %source, to = %target, "catalog entry applied");
            return result;
        }
        if let Some(cast) = self.hierarchy.upcast(&source, target) {
            tracing::trace!(from = %source, to = %target, "upcast applied");
            return cast
                .apply(value)
                .map_err(|cause| ConvertError::failure(source, *target, cause));
        }
        tracing::debug!(from = %source, to = %target, "no applicable conversion");
        Err(ConvertError::no_conversion(source, *target))
    }
}

impl fmt::Debug for StandardConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardConverter")
            .field("catalog", &self.catalog)
            .field("hierarchy", &self.hierarchy)
            .finish()
    }
}

/// Builder for [`StandardConverter`].
#[derive(Default)]
pub struct StandardConverterBuilder {
    catalog: Option<Catalog>,
    hierarchy: TypeHierarchy,
}

impl StandardConverterBuilder {
    /// Replace the default standard catalog.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn hierarchy(mut self, hierarchy: TypeHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn build(self) -> StandardConverter {
        let catalog = self
            .catalog
            .unwrap_or_else(|| Catalog::standard(&Default::default()));
        StandardConverter {
            catalog: Arc::new(catalog),
            hierarchy: Arc::new(self.hierarchy),
        }
    }
}
