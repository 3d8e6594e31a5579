use std::any::Any;

use crate::descriptor::TypeDescriptor;
use crate::error::ConvertError;
use crate::value::Value;

/// Value converter.
///
/// Solves one task: produce a value of `target` type from `value`, or fail
/// with a typed `ConvertError`. Implemented by the standard catalog, the base
/// converter and every adapter layered on top of it.
pub trait Convert: Send + Sync {
    fn convert_value(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, ConvertError>;
}

/// Typed entry points, available on every `Convert` implementation.
pub trait ConvertExt: Convert {
    /// Convert `value` to `T`.
    ///
    /// ```ignore
    /// let n: i64 = converter.convert::<i64>("42".to_string())?;
    /// ```
    fn convert<T>(&self, value: impl Any + Send + Sync) -> Result<T, ConvertError>
    where
        T: Any + Send + Sync + Clone,
    {
        let out = self.convert_value(&Value::new(value), &TypeDescriptor::of::<T>())?;
        typed(out)
    }

    /// Start a conversion of an optional value. See [`Converting`].
    fn converting<S: Any + Send + Sync>(&self, value: Option<S>) -> Converting<'_, Self> {
        Converting {
            converter: self,
            value: value.map(Value::new),
            default: None,
        }
    }
}

impl<C: Convert + ?Sized> ConvertExt for C {}

/// A pending conversion with an optional default value.
///
/// - source present: converted as usual, the default is ignored.
/// - source absent, default present: the default is converted instead.
/// - both absent: `ConvertError::MissingValue`.
pub struct Converting<'c, C: ?Sized> {
    converter: &'c C,
    value: Option<Value>,
    default: Option<Value>,
}

impl<C: Convert + ?Sized> Converting<'_, C> {
    pub fn default_value(mut self, default: impl Any + Send + Sync) -> Self {
        self.default = Some(Value::new(default));
        self
    }

    pub fn to_value(self, target: &TypeDescriptor) -> Result<Value, ConvertError> {
        match self.value.or(self.default) {
            Some(v) => self.converter.convert_value(&v, target),
            None => Err(ConvertError::MissingValue { to: *target }),
        }
    }

    pub fn to<T: Any + Send + Sync + Clone>(self) -> Result<T, ConvertError> {
        let out = self.to_value(&TypeDescriptor::of::<T>())?;
        typed(out)
    }
}

fn typed<T: Any + Send + Sync + Clone>(out: Value) -> Result<T, ConvertError> {
    out.downcast::<T>().map_err(|v| ConvertError::TypeMismatch {
        expected: TypeDescriptor::of::<T>(),
        actual: *v.ty(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Converts `u8` to `String` and nothing else.
    struct Digits;

    impl Convert for Digits {
        fn convert_value(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, ConvertError> {
            match value.downcast_ref::<u8>() {
                Some(n) if target.is::<String>() => Ok(Value::new(n.to_string())),
                _ => Err(ConvertError::no_conversion(*value.ty(), *target)),
            }
        }
    }

    /// Always answers with a `bool`, whatever was asked.
    struct Liar;

    impl Convert for Liar {
        fn convert_value(&self, _: &Value, _: &TypeDescriptor) -> Result<Value, ConvertError> {
            Ok(Value::new(true))
        }
    }

    #[test]
    fn typed_convert() {
        assert_eq!(Digits.convert::<String>(7_u8).unwrap(), "7");
        let err = Digits.convert::<String>(7_u16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoApplicableConversion);
    }

    #[test]
    fn wrong_output_type_is_reported() {
        let err = Liar.convert::<String>(1_u8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.to_string(), "converter returned bool where String was requested");
    }

    #[test]
    fn converting_uses_default_only_without_source() {
        let s = Digits.converting(Some(3_u8)).default_value(9_u8).to::<String>().unwrap();
        assert_eq!(s, "3");

        let s = Digits.converting(None::<u8>).default_value(9_u8).to::<String>().unwrap();
        assert_eq!(s, "9");

        let err = Digits.converting(None::<u8>).to::<String>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingValue);
    }

    #[test]
    fn works_through_trait_objects() {
        let boxed: Box<dyn Convert> = Box::new(Digits);
        assert_eq!(boxed.convert::<String>(42_u8).unwrap(), "42");
    }
}
