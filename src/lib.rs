//! Fixed-capacity event log for runtime diagnostics on no-std embedded targets.
//!
//! # Highlights
//! - Pre-allocated ring of `N` entries (default 32); no allocation, no dynamic dispatch.
//! - Each entry is a four-byte [`Tag`] plus four `u32` parameters.
//! - Writes never fail or block: once full, the oldest entry is overwritten.
//! - Retrieval runs newest first.
//! - Locking is injected through [`ExclusiveScope`], so the same log works behind
//!   interrupt masking, a spin lock, or nothing at all.
//!
//! # Quick start
//! ```
//! use ph_ringlog::{Group, SharedRingLog, SpinScope, Tag, log_event};
//!
//! static LOG: SharedRingLog<SpinScope, 16> = SharedRingLog::new(SpinScope::new());
//! const ACTIVE: u32 = Group::UART.union(Group::TIMER).bits();
//!
//! LOG.record(Tag::new("BOOT"), 1, 0, 0, 0);
//! log_event!(LOG, ACTIVE, Group::UART, Tag::new("RX  "), 0x41, 0, 0, 0);
//! log_event!(LOG, ACTIVE, Group::VIDEO, Tag::new("VSYN"), 0, 0, 0, 0); // masked out
//!
//! LOG.begin_retrieval();
//! assert_eq!(LOG.next_entry().map(|e| e.tag), Some(Tag::new("RX  ")));
//! assert_eq!(LOG.next_entry().map(|e| e.tag), Some(Tag::new("BOOT")));
//! assert_eq!(LOG.next_entry(), None);
//! ```
//!
//! # No-std
//! The crate is `#![no_std]`. Tests require `std`.
//!
//! # Features
//! - `enabled` (default): the log exists. Without it [`SharedRingLog`] holds no
//!   storage, every operation is a no-op and [`log_event!`] expands to nothing.
//! - `critical-section`: provides [`CriticalSectionScope`].
//! - `portable-atomic`, `portable-atomic-unsafe-assume-single-core`,
//!   `portable-atomic-critical-section`: back [`SpinScope`] with `portable-atomic`
//!   on targets without native compare-and-swap.
//!
//! # Semantics
//! - `count()` saturates at `N`; only `clear`/`initialize` bring it back to zero.
//! - While disabled, `record` drops entries silently. Retrieval, `count` and
//!   `clear` keep working.
//! - There is one implicit retrieval cursor. Call `begin_retrieval` before each
//!   pass; without it `next_entry` resumes the previous pass. [`Cursor`] gives a
//!   consumer its own pass instead.
//! - A pass over a [`SharedRingLog`] is not atomic across calls; use
//!   [`SharedRingLog::snapshot_into`] for a consistent copy.
#![no_std]

/// Diagnostics about the log itself, routed to the `log` facade.
macro_rules! diag {
    ($level:ident, $($arg:tt)+) => {
        if cfg!(feature = "enabled") {
            ::log::$level!($($arg)+);
        }
    };
}

mod atomic;
pub mod group;
pub mod ring_log;
pub mod scope;
pub mod shared;
pub mod tag;

pub use group::{DEFAULT_ACTIVE_GROUPS, Group, Producer};
pub use ring_log::{Cursor, DEFAULT_CAPACITY, Entries, LogEntry, RingLog};
#[cfg(feature = "critical-section")]
pub use scope::CriticalSectionScope;
pub use scope::{ExclusiveScope, LocalScope, SpinScope};
pub use shared::SharedRingLog;
pub use tag::{Tag, TagError};

#[cfg(test)]
extern crate std;
