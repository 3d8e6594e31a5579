use std::any::Any;
use std::fmt;
use std::sync::Arc;

use morph_api::{Convert, ConvertError, TypeDescriptor, Value};

use crate::hierarchy::TypeHierarchy;
use crate::rule::Rule;
use crate::table::RuleTable;

/// A converter with its own rules, layered over a parent converter.
///
/// Requests are answered from this adapter's `RuleTable` first; anything it
/// does not match goes to the parent unchanged. The parent is usually a
/// `StandardConverter` or another `Adapter`.
///
/// Registration is persistent: every `rule*` call returns a new adapter with
/// one more rule and leaves the receiver, the parent and any sibling adapters
/// untouched.
///
/// ```ignore
/// let adapter = StandardConverter::new()
///     .adapt()
///     .rule_fn(
///         |s: &String| s.split(',').map(String::from).collect::<Vec<_>>(),
///         |v: &Vec<String>| v.join(","),
///     )?;
/// let parts: Vec<String> = adapter.convert("a,b,c".to_string())?;
/// ```
#[derive(Clone)]
pub struct Adapter {
    parent: Arc<dyn Convert>,
    rules: RuleTable,
}

impl Adapter {
    /// Wrap any converter. Rules match by exact type only.
    ///
    /// The parent's `TypeHierarchy`, if it has one, is not carried over; use
    /// `StandardConverter::adapt` or `Adapter::adapt` to keep polymorphic
    /// matching, or `Adapter::with_hierarchy` to pass one explicitly.
    pub fn wrap(parent: Arc<dyn Convert>) -> Self {
        Self {
            parent,
            rules: RuleTable::new(),
        }
    }

    /// Wrap a converter, matching rules polymorphically over `hierarchy`.
    pub fn with_hierarchy(parent: Arc<dyn Convert>, hierarchy: Arc<TypeHierarchy>) -> Self {
        Self {
            parent,
            rules: RuleTable::with_hierarchy(hierarchy),
        }
    }

    /// Add a rule. Newer rules shadow older ones for the same type pair.
    pub fn rule<F, T>(&self, rule: Rule<F, T>) -> Adapter
    where
        F: Any + Send + Sync,
        T: Any + Send + Sync,
    {
        tracing::debug!(
            from = %rule.from_type(),
            to = %rule.to_type(),
            rules = self.rules.len() + 1,
            "registered rule"
        );
        Adapter {
            parent: Arc::clone(&self.parent),
            rules: self.rules.push(rule.erase()),
        }
    }

    /// Add a rule between explicitly declared types.
    pub fn rule_between<F, T>(
        &self,
        from: TypeDescriptor,
        to: TypeDescriptor,
        to_fn: impl Fn(&F) -> T + Send + Sync + 'static,
        from_fn: impl Fn(&T) -> F + Send + Sync + 'static,
    ) -> Result<Adapter, ConvertError>
    where
        F: Any + Send + Sync,
        T: Any + Send + Sync,
    {
        Ok(self.rule(Rule::between(from, to, to_fn, from_fn)?))
    }

    /// Add a rule with types taken from the two functions.
    pub fn rule_fn<F, T>(
        &self,
        to_fn: impl Fn(&F) -> T + Send + Sync + 'static,
        from_fn: impl Fn(&T) -> F + Send + Sync + 'static,
    ) -> Result<Adapter, ConvertError>
    where
        F: Any + Send + Sync,
        T: Any + Send + Sync,
    {
        Ok(self.rule(Rule::new(to_fn, from_fn)?))
    }

    /// New, empty adapter with this one as its parent.
    pub fn adapt(&self) -> Adapter {
        Adapter::with_hierarchy(Arc::new(self.clone()), Arc::clone(self.rules.hierarchy()))
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn parent(&self) -> &Arc<dyn Convert> {
        &self.parent
    }
}

impl Convert for Adapter {
    fn convert_value(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, ConvertError> {
        let source = *value.ty();
        match self.rules.lookup(&source, target) {
            Some(matched) => {
                tracing::trace!(
                    from = %source,
                    to = %target,
                    direction = ?matched.direction(),
                    "rule matched"
                );
                // A matched rule is final: its failure is not retried upstream.
                matched
                    .apply(value)
                    .map_err(|cause| ConvertError::failure(source, *target, cause))
            }
            None => {
                tracing::trace!(from = %source, to = %target, "delegating to parent");
                self.parent.convert_value(value, target)
            }
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
