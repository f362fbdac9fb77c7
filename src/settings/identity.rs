//! Owner id generation.

use uuid::Uuid;

/// Supplies fresh owner ids for installations that don't have one yet.
///
/// Ids are opaque: nothing in this crate looks inside them.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID v4 ids in simple (undashed) form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generator_produces_distinct_ids() {
        let ids = UuidGenerator;
        let first = ids.generate();
        let second = ids.generate();

        assert_eq!(first.len(), 32);
        assert_ne!(first, second);
    }
}
