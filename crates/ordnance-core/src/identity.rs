//! Content-derived weapon identity.
//!
//! The identity is the idempotency key of the store: two records with the same
//! `(name, category, notes)` always land on the same row.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
pub const IDENTITY_LEN: usize = 16;

/// Derive the identity for a `(name, category, notes)` triple.
///
/// Stable across runs and processes. Collisions between distinct triples are
/// possible in principle and are not detected.
pub fn weapon_identity(name: &str, category: &str, notes: &str) -> String {
  let digest = Sha256::digest(format!("{name}-{category}-{notes}").as_bytes());
  let mut id = hex::encode(digest);
  id.truncate(IDENTITY_LEN);
  id
}
