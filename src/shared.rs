//! Process-wide ring log guarded by an injected exclusive scope.
//!
//! [`SharedRingLog`] wraps a [`RingLog`] and runs every operation inside one
//! [`ExclusiveScope::enter`] call, so producers in interrupt handlers and the
//! diagnostic consumer can share a single `static` instance.
//!
//! Each operation is atomic on its own. A pass built from repeated
//! [`SharedRingLog::next_entry`] calls is not: entries recorded between two
//! calls shift the ring under the cursor, so a pass may repeat or skip entries.
//! [`SharedRingLog::snapshot_into`] copies a pass in one go when that matters.
//!
//! Without the `enabled` feature the type holds no storage and every operation
//! is a no-op that reports an empty, disabled log.

use core::cell::UnsafeCell;
#[cfg(not(feature = "enabled"))]
use core::marker::PhantomData;

use crate::ring_log::{Cursor, DEFAULT_CAPACITY, LogEntry, RingLog};
use crate::scope::ExclusiveScope;
use crate::tag::Tag;

pub struct SharedRingLog<S: ExclusiveScope, const N: usize = { DEFAULT_CAPACITY }> {
    #[cfg(feature = "enabled")]
    scope: S,
    #[cfg(feature = "enabled")]
    log: UnsafeCell<RingLog<N>>,
    #[cfg(not(feature = "enabled"))]
    _scope: PhantomData<(S, UnsafeCell<RingLog<N>>)>,
}

// SAFETY: every access to `log` goes through `with_log`, which holds the scope.
unsafe impl<S: ExclusiveScope + Sync, const N: usize> Sync for SharedRingLog<S, N> {}

impl<S: ExclusiveScope, const N: usize> SharedRingLog<S, N> {
    #[cfg(feature = "enabled")]
    pub const fn new(scope: S) -> Self {
        Self {
            scope,
            log: UnsafeCell::new(RingLog::new()),
        }
    }

    #[cfg(not(feature = "enabled"))]
    pub const fn new(scope: S) -> Self {
        core::mem::forget(scope);
        Self {
            _scope: PhantomData,
        }
    }

    #[cfg(feature = "enabled")]
    #[inline]
    fn with_log<R: Default>(&self, f: impl FnOnce(&mut RingLog<N>) -> R) -> R {
        self.scope.enter(|| {
            // SAFETY: the scope excludes every other `with_log` call, and none of
            // the closures passed here call back into `self`.
            f(unsafe { &mut *self.log.get() })
        })
    }

    #[cfg(not(feature = "enabled"))]
    #[inline(always)]
    fn with_log<R: Default>(&self, _f: impl FnOnce(&mut RingLog<N>) -> R) -> R {
        R::default()
    }

    /// Reset to the empty state; the enable gate is kept.
    pub fn initialize(&self) {
        let discarded = self.with_log(|log| {
            let live = log.count();
            log.initialize();
            live
        });
        diag!(debug, "ring log initialized: {} slots, {} entries discarded", N, discarded);
    }

    #[inline]
    pub fn record(&self, tag: Tag, p1: u32, p2: u32, p3: u32, p4: u32) {
        self.with_log(|log| log.record(tag, p1, p2, p3, p4));
    }

    #[inline]
    pub fn record_entry(&self, entry: LogEntry) {
        self.with_log(|log| log.record_entry(entry));
    }

    #[inline]
    pub fn begin_retrieval(&self) {
        self.with_log(|log| log.begin_retrieval());
    }

    #[inline]
    pub fn next_entry(&self) -> Option<LogEntry> {
        self.with_log(|log| log.next_entry())
    }

    #[inline]
    pub fn cursor(&self) -> Cursor<N> {
        self.with_log(|log| log.cursor())
    }

    #[inline]
    pub fn next_with(&self, cursor: &mut Cursor<N>) -> Option<LogEntry> {
        self.with_log(|log| log.next_with(cursor))
    }

    #[inline]
    pub fn latest(&self) -> Option<LogEntry> {
        self.with_log(|log| log.latest())
    }

    /// Copy up to `out.len()` entries, newest first, under a single scope entry.
    /// Returns how many were written. The implicit cursor is not touched.
    pub fn snapshot_into(&self, out: &mut [LogEntry]) -> usize {
        self.with_log(|log| {
            let mut written = 0;
            for (slot, entry) in out.iter_mut().zip(log.iter()) {
                *slot = entry;
                written += 1;
            }
            written
        })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.with_log(|log| log.count())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&self) {
        let discarded = self.with_log(|log| {
            let live = log.count();
            log.clear();
            live
        });
        diag!(debug, "ring log cleared, {} entries discarded", discarded);
    }

    pub fn set_enabled(&self, enabled: bool) {
        let was = self.with_log(|log| {
            let was = log.is_enabled();
            log.set_enabled(enabled);
            was
        });
        if was != enabled {
            diag!(info, "ring log {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.with_log(|log| log.is_enabled())
    }
}


#[cfg(all(test, not(feature = "enabled")))]
mod disabled_tests {
    use super::SharedRingLog;
    use crate::group::Group;
    use crate::ring_log::LogEntry;
    use crate::scope::LocalScope;
    use crate::tag::Tag;

    #[test]
    fn every_operation_is_a_noop() {
        let log = SharedRingLog::<_, 4>::new(LocalScope::new());
        log.initialize();
        log.set_enabled(true);
        log.record(Tag::new("AAAA"), 0, 0, 0, 0);
        log.record_entry(LogEntry::new(Tag::new("BBBB"), 1, 2, 3, 4));
        assert_eq!(log.count(), 0);
        assert!(log.is_empty());
        assert!(!log.is_enabled());
        assert_eq!(log.capacity(), 4);

        log.begin_retrieval();
        assert_eq!(log.next_entry(), None);
        assert_eq!(log.latest(), None);

        let mut cursor = log.cursor();
        assert_eq!(log.next_with(&mut cursor), None);
        assert_eq!(cursor.consumed(), 0);

        let mut out = [LogEntry::EMPTY; 4];
        assert_eq!(log.snapshot_into(&mut out), 0);
        assert_eq!(out, [LogEntry::EMPTY; 4]);

        log.clear();
        assert_eq!(log.count(), 0);

        assert_eq!(core::mem::size_of::<SharedRingLog<LocalScope, 4>>(), 0);
    }

    #[test]
    fn log_event_expands_to_nothing() {
        let log = SharedRingLog::<_, 4>::new(LocalScope::new());
        let mut evaluated = 0;
        crate::log_event!(log, u32::MAX, Group::UART, Tag::new("RX  "), {
            evaluated += 1;
            0
        }, 0, 0, 0);
        assert_eq!(evaluated, 0);
        assert_eq!(log.count(), 0);
    }
}
