//! Nullable infrastructure for deterministic testing.
//!
//! The election core only knows "who is calling" and "emit this event".
//! This crate provides test-friendly stand-ins for both collaborators:
//! - [`NullEventLog`] records every event instead of delivering it
//! - [`NullPrincipals`] hands out predictable, already-authenticated principals
//!
//! Usage: subscribe a `NullEventLog` listener to a session and assert on
//! what was recorded.

pub mod events;
pub mod principals;

pub use events::NullEventLog;
pub use principals::NullPrincipals;
