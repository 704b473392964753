//! Item activity state machine.
//!
//! An item starts checked ("still doing it") and the goal is to uncheck it.
//! An avoid-until deadline blocks unchecking until it passes, and keeps an
//! unchecked item active while it is still in the future.
//!
//! The two predicates deliberately use opposite boundaries: at exactly
//! `now == avoid_until` the item may be unchecked, and an unchecked item is
//! no longer active.

use chrono::{DateTime, Utc};

/// Whether the item still needs the user's attention.
#[must_use]
pub fn is_active(is_checked: bool, avoid_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    is_checked || avoid_until.is_some_and(|deadline| now < deadline)
}

/// Whether the item may transition to unchecked at `now`.
#[must_use]
pub fn can_uncheck(avoid_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    avoid_until.is_none_or(|deadline| now >= deadline)
}
