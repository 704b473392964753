//! Short, shareable list identifiers.
//!
//! List ids end up in URLs people paste to each other, so they are short
//! alphanumeric strings rather than UUIDs. Uniqueness is enforced by the
//! store, which asks for a fresh id whenever one collides.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Alphabet for generated list ids.
pub const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size that fits in a byte; bytes at or
/// above it are discarded so every character is equally likely.
const UNBIASED_LIMIT: u8 = 248;

/// Byte offsets in a UUID v4 carrying the fixed version and variant bits.
const UUID_FIXED_BYTES: [usize; 2] = [6, 8];

/// Produces candidate list ids.
pub trait IdGenerator: Send + Sync {
    /// Return a new candidate id. Callers must still check for collisions.
    fn next_id(&self) -> String;
}

/// Uniformly random alphanumeric ids backed by the OS RNG (via UUID v4).
#[derive(Debug, Clone, Copy)]
pub struct ShortIdGenerator {
    length: usize,
}

impl ShortIdGenerator {
    /// Generator for ids of `length` characters.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for ShortIdGenerator {
    fn default() -> Self {
        Self::new(5)
    }
}

impl IdGenerator for ShortIdGenerator {
    fn next_id(&self) -> String {
        let mut id = String::with_capacity(self.length);
        while id.len() < self.length {
            let bytes = Uuid::new_v4().into_bytes();
            for (idx, byte) in bytes.into_iter().enumerate() {
                if UUID_FIXED_BYTES.contains(&idx) || byte >= UNBIASED_LIMIT {
                    continue;
                }
                id.push(char::from(ID_ALPHABET[usize::from(byte) % ID_ALPHABET.len()]));
                if id.len() == self.length {
                    break;
                }
            }
        }
        id
    }
}

/// Deterministic generator that hands out scripted ids, then `"{prefix}{n}"`.
///
/// Scripted ids let tests force collisions.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    scripted: Vec<String>,
    prefix: String,
    counter: AtomicU64,
}

impl SequenceIdGenerator {
    /// Counter-only generator: `list1`, `list2`, ...
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::scripted(prefix, Vec::new())
    }

    /// Emit `scripted` in order first, then fall back to the counter.
    #[must_use]
    pub fn scripted(prefix: impl Into<String>, scripted: Vec<String>) -> Self {
        Self {
            scripted,
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        usize::try_from(n)
            .ok()
            .and_then(|idx| self.scripted.get(idx).cloned())
            .unwrap_or_else(|| {
                let offset = u64::try_from(self.scripted.len()).unwrap_or(u64::MAX);
                format!("{}{}", self.prefix, n.saturating_sub(offset) + 1)
            })
    }
}
