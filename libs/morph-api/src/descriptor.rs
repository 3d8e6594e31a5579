use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a concrete Rust type.
///
/// Equality and hashing use the `TypeId` only: two descriptors are equal iff
/// they denote the same concrete type. The name is kept for diagnostics.
///
/// Examples:
/// - `TypeDescriptor::of::<String>()` displays as `String`
/// - `TypeDescriptor::of::<Vec<String>>()` displays as `Vec<String>`
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name, as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name with module paths stripped from every path segment.
    pub fn short_name(&self) -> String {
        short_name(self.name)
    }

    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// `alloc::vec::Vec<alloc::string::String>` → `Vec<String>`.
fn short_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            out.push_str(last_segment(&path));
            path.clear();
            out.push(c);
        }
    }
    out.push_str(last_segment(&path));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_type() {
        assert_eq!(TypeDescriptor::of::<String>(), TypeDescriptor::of::<String>());
        assert_ne!(TypeDescriptor::of::<String>(), TypeDescriptor::of::<&'static str>());
        assert_ne!(TypeDescriptor::of::<i32>(), TypeDescriptor::of::<u32>());
    }

    #[test]
    fn display_strips_module_paths() {
        assert_eq!(TypeDescriptor::of::<String>().to_string(), "String");
        assert_eq!(TypeDescriptor::of::<Vec<String>>().to_string(), "Vec<String>");
        assert_eq!(
            TypeDescriptor::of::<Option<Vec<u8>>>().to_string(),
            "Option<Vec<u8>>"
        );
        assert_eq!(TypeDescriptor::of::<&'static str>().to_string(), "&str");
    }

    #[test]
    fn usable_as_map_key() {
        let mut seen = std::collections::HashSet::new();
        assert!(seen.insert(TypeDescriptor::of::<u8>()));
        assert!(!seen.insert(TypeDescriptor::of::<u8>()));
        assert!(seen.insert(TypeDescriptor::of::<u16>()));
    }
}
