//! Identifier generation collaborator

use crate::Result;

/// Source of unique identifiers, keyed by the kind of entity being identified
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, id_type: &str) -> Result<String>;
}

/// Random v4 UUIDs, prefixed with the id type
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, id_type: &str) -> Result<String> {
        Ok(format!("{}-{}", id_type, uuid::Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_unique_and_prefixed() {
        let generator = UuidIdGenerator;
        let a = generator.next_id("attempt").unwrap();
        let b = generator.next_id("attempt").unwrap();
        assert!(a.starts_with("attempt-"));
        assert_ne!(a, b);
    }
}
