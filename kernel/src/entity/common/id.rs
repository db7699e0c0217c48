use uuid::Uuid;

/// Source of time-ordered identifiers (UUIDv7).
///
/// An identifier produced later compares greater than one produced earlier,
/// both as a [`Uuid`] and in its hyphenated string form, so sorting by id
/// sorts by creation order.
pub struct TimeOrderedId;

impl TimeOrderedId {
    pub fn next() -> Uuid {
        Uuid::now_v7()
    }
}
