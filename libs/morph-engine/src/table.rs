use std::fmt;
use std::sync::Arc;

use morph_api::{BoxError, TypeDescriptor, Value};

use crate::hierarchy::{TypeHierarchy, Upcast};
use crate::rule::{Direction, ErasedRule};

struct Node {
    rule: ErasedRule,
    next: Option<Arc<Node>>,
}

/// Ordered rule collection, searched newest-first.
///
/// Persistent: [`RuleTable::push`] returns a new table sharing every older
/// rule with the receiver, which stays unchanged. A newer rule shadows an
/// older one for the same type pair without removing it.
///
/// Without a `TypeHierarchy` matching is exact descriptor equality.
#[derive(Clone, Default)]
pub struct RuleTable {
    head: Option<Arc<Node>>,
    len: usize,
    hierarchy: Arc<TypeHierarchy>,
}

/// Outcome of a successful lookup: which rule, which direction, and the
/// upcasts needed around it.
pub struct RuleMatch<'t> {
    rule: &'t ErasedRule,
    direction: Direction,
    input_cast: Option<&'t Upcast>,
    output_cast: Option<&'t Upcast>,
}

impl RuleTable {
    /// Empty table with exact matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with polymorphic matching over `hierarchy`.
    pub fn with_hierarchy(hierarchy: Arc<TypeHierarchy>) -> Self {
        Self {
            head: None,
            len: 0,
            hierarchy,
        }
    }

    pub fn hierarchy(&self) -> &Arc<TypeHierarchy> {
        &self.hierarchy
    }

    /// New table with `rule` in front of all existing rules.
    pub fn push(&self, rule: ErasedRule) -> RuleTable {
        RuleTable {
            head: Some(Arc::new(Node {
                rule,
                next: self.head.clone(),
            })),
            len: self.len + 1,
            hierarchy: Arc::clone(&self.hierarchy),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rules, newest first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Find the rule answering `source → target`.
    ///
    /// The newest rule matching in either direction wins. A rule matching
    /// both directions (same-type rules, or through assignability) answers
    /// forward. `None` means "no match", the caller delegates.
    pub fn lookup(&self, source: &TypeDescriptor, target: &TypeDescriptor) -> Option<RuleMatch<'_>> {
        self.iter().find_map(|rule| {
            self.match_direction(rule, Direction::Forward, source, target)
                .or_else(|| self.match_direction(rule, Direction::Backward, source, target))
        })
    }

    fn match_direction<'t>(
        &'t self,
        rule: &'t ErasedRule,
        direction: Direction,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Option<RuleMatch<'t>> {
        let (input, output) = rule.endpoints(direction);
        let input_cast = self.assign(source, &input)?;
        let output_cast = self.assign(&output, target)?;
        Some(RuleMatch {
            rule,
            direction,
            input_cast,
            output_cast,
        })
    }

    /// `Some(None)`: same type. `Some(Some(cast))`: declared upcast.
    /// `None`: not assignable.
    fn assign(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> Option<Option<&Upcast>> {
        if sub == sup {
            return Some(None);
        }
        self.hierarchy.upcast(sub, sup).map(Some)
    }
}

impl Drop for RuleTable {
    // Unlink iteratively so long chains don't overflow the stack.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'t> {
    next: Option<&'t Node>,
}

impl<'t> Iterator for Iter<'t> {
    type Item = &'t ErasedRule;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(&node.rule)
    }
}

impl<'t> RuleMatch<'t> {
    pub fn rule(&self) -> &'t ErasedRule {
        self.rule
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether an upcast is applied before or after the rule function.
    pub fn is_polymorphic(&self) -> bool {
        self.input_cast.is_some() || self.output_cast.is_some()
    }

    /// Run the matched function, with upcasts on either side.
    pub fn apply(&self, value: &Value) -> Result<Value, BoxError> {
        let input = match self.input_cast {
            Some(cast) => cast.apply(value)?,
            None => value.clone(),
        };
        let output = (self.rule.function(self.direction))(&input)?;
        match self.output_cast {
            Some(cast) => cast.apply(&output),
            None => Ok(output),
        }
    }
}

impl fmt::Debug for RuleMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleMatch")
            .field("rule", self.rule)
            .field("direction", &self.direction)
            .field("polymorphic", &self.is_polymorphic())
            .finish()
    }
}
