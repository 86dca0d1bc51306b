//! BLAKE3 helpers for catalog fingerprints and cheap revision ids.

use blake3::Hasher;

use crate::catalog::CatalogItem;

#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Used for revision markers, where a collision only means one missed rebuild that
/// the next content change or an explicit invalidation repairs. Content identity
/// uses the full 32-byte [`fingerprint_catalog`] instead.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Content fingerprint of an ordered catalog.
///
/// Every field is length-prefixed so `("ab", "c")` and `("a", "bc")` differ. Item
/// order is part of the fingerprint because ranking ties resolve by position.
pub fn fingerprint_catalog(items: &[CatalogItem]) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(items.len() as u64).to_le_bytes());
    for item in items {
        for field in [
            item.id.as_str(),
            item.title.as_str(),
            item.description.as_str(),
            item.category.as_str(),
        ] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
    }
    *hasher.finalize().as_bytes()
}
