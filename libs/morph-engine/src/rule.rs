use std::any::Any;
use std::fmt;
use std::sync::Arc;

use morph_api::{BoxError, ConvertError, TypeDescriptor, Value};

type TypedFn<A, B> = Arc<dyn Fn(&A) -> Result<B, BoxError> + Send + Sync>;

/// Type-erased conversion function: `&Value` of a known type in, `Value` out.
pub(crate) type ErasedFn = Arc<dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync>;

/// Erase a typed function. The input type is re-checked on every call.
pub(crate) fn erase<A, B>(f: impl Fn(&A) -> Result<B, BoxError> + Send + Sync + 'static) -> ErasedFn
where
    A: Any + Send + Sync,
    B: Any + Send + Sync,
{
    Arc::new(move |value: &Value| {
        let input = value.downcast_ref::<A>().ok_or_else(|| -> BoxError {
            format!("expected {}, got {}", TypeDescriptor::of::<A>(), value.ty()).into()
        })?;
        f(input).map(Value::new)
    })
}

/// A reversible conversion between `F` and `T`.
///
/// `to_fn` converts `F → T`, `from_fn` converts back `T → F`. Rule authors
/// must keep the pair lossless for the purpose of the conversion:
/// `from_fn(to_fn(v))` is accepted as equivalent to `v`.
///
/// ```ignore
/// let csv = Rule::new(
///     |s: &String| s.split(',').map(String::from).collect::<Vec<_>>(),
///     |v: &Vec<String>| v.join(","),
/// )?;
/// ```
pub struct Rule<F, T> {
    from: TypeDescriptor,
    to: TypeDescriptor,
    to_fn: TypedFn<F, T>,
    from_fn: TypedFn<T, F>,
}

impl<F, T> Clone for Rule<F, T> {
    fn clone(&self) -> Self {
        Self {
            from: self.from,
            to: self.to,
            to_fn: Arc::clone(&self.to_fn),
            from_fn: Arc::clone(&self.from_fn),
        }
    }
}

impl<F, T> fmt::Debug for Rule<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({} <-> {})", self.from, self.to)
    }
}

impl<F, T> Rule<F, T>
where
    F: Any + Send + Sync,
    T: Any + Send + Sync,
{
    /// Rule with types inferred from the two functions.
    pub fn new(
        to_fn: impl Fn(&F) -> T + Send + Sync + 'static,
        from_fn: impl Fn(&T) -> F + Send + Sync + 'static,
    ) -> Result<Self, ConvertError> {
        Self::between(TypeDescriptor::of::<F>(), TypeDescriptor::of::<T>(), to_fn, from_fn)
    }

    /// Rule with explicitly declared types.
    ///
    /// `from` and `to` must describe `F` and `T`, otherwise the rule is
    /// rejected with `ConvertError::AmbiguousRule`.
    pub fn between(
        from: TypeDescriptor,
        to: TypeDescriptor,
        to_fn: impl Fn(&F) -> T + Send + Sync + 'static,
        from_fn: impl Fn(&T) -> F + Send + Sync + 'static,
    ) -> Result<Self, ConvertError> {
        Self::build(
            from,
            to,
            Arc::new(move |v: &F| -> Result<T, BoxError> { Ok(to_fn(v)) }),
            Arc::new(move |v: &T| -> Result<F, BoxError> { Ok(from_fn(v)) }),
        )
    }

    /// Rule whose functions may fail. Errors surface as
    /// `ConvertError::FunctionFailure` at conversion time.
    pub fn fallible<E1, E2>(
        to_fn: impl Fn(&F) -> Result<T, E1> + Send + Sync + 'static,
        from_fn: impl Fn(&T) -> Result<F, E2> + Send + Sync + 'static,
    ) -> Result<Self, ConvertError>
    where
        E1: Into<BoxError>,
        E2: Into<BoxError>,
    {
        Self::build(
            TypeDescriptor::of::<F>(),
            TypeDescriptor::of::<T>(),
            Arc::new(move |v: &F| -> Result<T, BoxError> { to_fn(v).map_err(Into::into) }),
            Arc::new(move |v: &T| -> Result<F, BoxError> { from_fn(v).map_err(Into::into) }),
        )
    }

    fn build(
        from: TypeDescriptor,
        to: TypeDescriptor,
        to_fn: TypedFn<F, T>,
        from_fn: TypedFn<T, F>,
    ) -> Result<Self, ConvertError> {
        let declared_from = TypeDescriptor::of::<F>();
        let declared_to = TypeDescriptor::of::<T>();
        if from != declared_from {
            return Err(ConvertError::AmbiguousRule(format!(
                "declared source type {from} does not match function input {declared_from}"
            )));
        }
        if to != declared_to {
            return Err(ConvertError::AmbiguousRule(format!(
                "declared target type {to} does not match function output {declared_to}"
            )));
        }
        Ok(Self {
            from,
            to,
            to_fn,
            from_fn,
        })
    }

    pub fn from_type(&self) -> TypeDescriptor {
        self.from
    }

    pub fn to_type(&self) -> TypeDescriptor {
        self.to
    }

    /// Forward direction, `F → T`.
    pub fn apply(&self, value: &F) -> Result<T, BoxError> {
        (self.to_fn)(value)
    }

    /// Backward direction, `T → F`.
    pub fn revert(&self, value: &T) -> Result<F, BoxError> {
        (self.from_fn)(value)
    }

    pub(crate) fn erase(self) -> ErasedRule {
        let Rule {
            from,
            to,
            to_fn,
            from_fn,
        } = self;
        ErasedRule {
            from,
            to,
            forward: erase::<F, T>(move |v: &F| to_fn(v)),
            backward: erase::<T, F>(move |v: &T| from_fn(v)),
        }
    }
}

impl<F, T> From<Rule<F, T>> for ErasedRule
where
    F: Any + Send + Sync,
    T: Any + Send + Sync,
{
    fn from(rule: Rule<F, T>) -> Self {
        rule.erase()
    }
}

/// Which function of a rule answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `from → to`, the rule's `to_fn`.
    Forward,
    /// `to → from`, the rule's `from_fn`.
    Backward,
}

/// A rule as stored in a `RuleTable`: both types, both functions, erased.
#[derive(Clone)]
pub struct ErasedRule {
    from: TypeDescriptor,
    to: TypeDescriptor,
    forward: ErasedFn,
    backward: ErasedFn,
}

impl ErasedRule {
    pub fn from_type(&self) -> TypeDescriptor {
        self.from
    }

    pub fn to_type(&self) -> TypeDescriptor {
        self.to
    }

    /// `(input, output)` types for a direction.
    pub fn endpoints(&self, direction: Direction) -> (TypeDescriptor, TypeDescriptor) {
        match direction {
            Direction::Forward => (self.from, self.to),
            Direction::Backward => (self.to, self.from),
        }
    }

    pub(crate) fn function(&self, direction: Direction) -> &ErasedFn {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }
}

impl fmt::Debug for ErasedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErasedRule({} <-> {})", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_api::ErrorKind;

    fn csv() -> Rule<String, Vec<String>> {
        Rule::new(
            |s: &String| s.split(',').map(String::from).collect(),
            |v: &Vec<String>| v.join(","),
        )
        .unwrap()
    }

    #[test]
    fn inferred_types() {
        let rule = csv();
        assert_eq!(rule.from_type(), TypeDescriptor::of::<String>());
        assert_eq!(rule.to_type(), TypeDescriptor::of::<Vec<String>>());
    }

    #[test]
    fn round_trip() {
        let rule = csv();
        let original = "a,b,c".to_string();
        let there = rule.apply(&original).unwrap();
        assert_eq!(there, vec!["a", "b", "c"]);
        assert_eq!(rule.revert(&there).unwrap(), original);
    }

    #[test]
    fn explicit_types_must_match_functions() {
        let ok = Rule::between(
            TypeDescriptor::of::<u8>(),
            TypeDescriptor::of::<char>(),
            |b: &u8| *b as char,
            |c: &char| *c as u8,
        );
        assert!(ok.is_ok());

        let err = Rule::between(
            TypeDescriptor::of::<u16>(),
            TypeDescriptor::of::<char>(),
            |b: &u8| *b as char,
            |c: &char| *c as u8,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousRule);
        assert!(err.to_string().contains("declared source type u16"));
    }

    #[test]
    fn rule_to_same_type_is_accepted() {
        let rule = Rule::new(|s: &String| s.trim().to_string(), |s: &String| s.clone()).unwrap();
        assert_eq!(rule.from_type(), rule.to_type());
        assert_eq!(rule.apply(&"  x ".to_string()).unwrap(), "x");
    }

    #[test]
    fn fallible_functions_report_errors() {
        let rule = Rule::fallible(
            |s: &String| s.parse::<u32>(),
            |n: &u32| Ok::<_, std::convert::Infallible>(n.to_string()),
        )
        .unwrap();
        assert_eq!(rule.apply(&"12".to_string()).unwrap(), 12);
        assert!(rule.apply(&"twelve".to_string()).is_err());
        assert_eq!(rule.revert(&7).unwrap(), "7");
    }

    #[test]
    fn erased_rule_checks_input_type() {
        let erased = csv().erase();
        let out = (erased.function(Direction::Forward))(&Value::new("x,y".to_string())).unwrap();
        assert_eq!(out.downcast_ref::<Vec<String>>().unwrap(), &vec!["x", "y"]);

        let err = (erased.function(Direction::Forward))(&Value::new(5_u8)).unwrap_err();
        assert_eq!(err.to_string(), "expected String, got u8");
        assert_eq!(
            erased.endpoints(Direction::Backward),
            (TypeDescriptor::of::<Vec<String>>(), TypeDescriptor::of::<String>())
        );
    }
}
