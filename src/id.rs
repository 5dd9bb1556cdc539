//! Identifier generation for newly created addresses.

use uuid::Uuid;

/// Returns a fresh random identifier. No check is made against existing records,
/// collisions of v4 UUIDs are treated as impossible.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
