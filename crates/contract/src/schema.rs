use std::any::TypeId;

use derive_more::Display;

/// An opaque handle naming the Rust type a procedure consumes or produces.
///
/// The handle is never inspected for content; it only records which type
/// the contract author declared so tooling can report it.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[display("{type_name}")]
pub struct Schema {
    type_id: Option<TypeId>,
    type_name: &'static str,
}

impl Default for Schema {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl Schema {
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: Some(TypeId::of::<T>()),
            type_name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub const fn unspecified() -> Self {
        Self {
            type_id: None,
            type_name: "unspecified",
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn is_specified(&self) -> bool {
        self.type_id.is_some()
    }

    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == Some(TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_records_declared_type() {
        let schema = Schema::of::<String>();
        assert!(schema.is::<String>());
        assert!(!schema.is::<u32>());
        assert!(schema.to_string().ends_with("String"));
    }

    #[test]
    fn test_default_schema_is_unspecified() {
        let schema = Schema::default();
        assert!(!schema.is_specified());
        assert_eq!(schema.type_name(), "unspecified");
    }
}
