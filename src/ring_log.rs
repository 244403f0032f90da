//! Fixed-capacity overwrite-oldest event log.
//!
//! # Overview
//! - `N` pre-allocated [`LogEntry`] slots; nothing is allocated after construction.
//! - Writes never fail: once full, each new entry overwrites the oldest one.
//! - Retrieval walks backwards from the newest entry to the oldest live one.
//! - An enable gate drops inserts silently while off.
//!
//! # Layout
//! `write_idx` is the next slot to be written. The newest entry lives at
//! `(write_idx - 1) mod N` and the oldest live entry at `(write_idx - live) mod N`.
//! `live` saturates at `N` and only goes back to zero on [`RingLog::clear`].
//!
//! # Retrieval cursor
//! The log carries one implicit cursor, driven by [`RingLog::begin_retrieval`] and
//! [`RingLog::next_entry`]. Skipping `begin_retrieval` resumes whatever pass ran
//! last. Consumers that need their own pass take a [`Cursor`] from
//! [`RingLog::cursor`] and step it with [`RingLog::next_with`].
//!
//! This type is not synchronized. See [`crate::SharedRingLog`] for the version
//! that runs every operation inside an injected exclusive scope.

use crate::tag::Tag;

/// Capacity used when `N` is not given.
pub const DEFAULT_CAPACITY: usize = 32;

/// One recorded event: a tag plus four caller-defined parameters.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LogEntry {
    pub tag: Tag,
    pub params: [u32; 4],
}

impl LogEntry {
    pub const EMPTY: LogEntry = LogEntry {
        tag: Tag::EMPTY,
        params: [0; 4],
    };

    #[inline]
    pub const fn new(tag: Tag, p1: u32, p2: u32, p3: u32, p4: u32) -> Self {
        Self {
            tag,
            params: [p1, p2, p3, p4],
        }
    }
}

/// Retrieval position: the last slot handed out and how many entries have been
/// consumed in the current pass.
///
/// A cursor carries the capacity of the log it was taken from, so it only steps
/// logs of that capacity:
///
/// ```compile_fail
/// use ph_ringlog::RingLog;
///
/// let big = RingLog::<8>::new();
/// let small = RingLog::<4>::new();
/// let mut cursor = big.cursor();
/// small.next_with(&mut cursor);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor<const N: usize = { DEFAULT_CAPACITY }> {
    read_idx: usize,
    consumed: usize,
}

impl<const N: usize> Cursor<N> {
    /// Entries handed out since this cursor was started.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

pub struct RingLog<const N: usize = { DEFAULT_CAPACITY }> {
    entries: [LogEntry; N],
    write_idx: usize,
    live: usize,
    enabled: bool,
    cursor: Cursor<N>,
}

impl<const N: usize> RingLog<N> {
    const CAPACITY: usize = {
        assert!(N > 0, "RingLog capacity must be > 0");
        N
    };

    /// Empty, enabled log. `const` so it can back a `static`.
    ///
    /// A zero capacity is rejected at compile time:
    ///
    /// ```compile_fail
    /// let log = ph_ringlog::RingLog::<0>::new();
    /// ```
    pub const fn new() -> Self {
        let _ = Self::CAPACITY;
        Self {
            entries: [LogEntry::EMPTY; N],
            write_idx: 0,
            live: 0,
            enabled: true,
            cursor: Cursor {
                read_idx: 0,
                consumed: 0,
            },
        }
    }

    #[inline(always)]
    const fn next_idx(idx: usize) -> usize {
        if idx + 1 == N { 0 } else { idx + 1 }
    }

    #[inline(always)]
    const fn prev_idx(idx: usize) -> usize {
        if idx == 0 { N - 1 } else { idx - 1 }
    }

    /// Reset to the empty state. Same as [`RingLog::clear`]; the enable gate is kept.
    #[inline]
    pub fn initialize(&mut self) {
        self.clear();
    }

    /// Record one event. Dropped silently while disabled.
    #[inline]
    pub fn record(&mut self, tag: Tag, p1: u32, p2: u32, p3: u32, p4: u32) {
        self.record_entry(LogEntry::new(tag, p1, p2, p3, p4));
    }

    pub fn record_entry(&mut self, entry: LogEntry) {
        if !self.enabled {
            return;
        }

        self.entries[self.write_idx] = entry;
        self.write_idx = Self::next_idx(self.write_idx);
        if self.live < N {
            self.live += 1;
        }

        debug_assert!(self.write_idx < N);
        debug_assert!(self.live <= N);
    }

    /// Point the implicit cursor at the newest entry.
    #[inline]
    pub fn begin_retrieval(&mut self) {
        self.cursor = self.cursor();
    }

    /// Next entry of the implicit pass, newest first.
    /// Returns `None` once every live entry has been handed out; asking again is harmless.
    #[inline]
    pub fn next_entry(&mut self) -> Option<LogEntry> {
        let mut cursor = self.cursor;
        let entry = self.next_with(&mut cursor);
        self.cursor = cursor;
        entry
    }

    /// A fresh cursor positioned before the newest entry.
    #[inline]
    pub fn cursor(&self) -> Cursor<N> {
        Cursor {
            read_idx: self.write_idx,
            consumed: 0,
        }
    }

    /// Step `cursor` one entry towards the oldest.
    pub fn next_with(&self, cursor: &mut Cursor<N>) -> Option<LogEntry> {
        if cursor.consumed >= self.live {
            return None;
        }

        cursor.read_idx = Self::prev_idx(cursor.read_idx);
        cursor.consumed += 1;
        Some(self.entries[cursor.read_idx])
    }

    /// Newest entry, without touching any cursor.
    #[inline]
    pub fn latest(&self) -> Option<LogEntry> {
        if self.live == 0 {
            return None;
        }
        Some(self.entries[Self::prev_idx(self.write_idx)])
    }

    /// Live entries, newest first.
    #[inline]
    pub fn iter(&self) -> Entries<'_, N> {
        Entries {
            log: self,
            cursor: self.cursor(),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Forget every entry. Slots keep their old bytes until overwritten and the
    /// retrieval cursor is left alone.
    #[inline]
    pub fn clear(&mut self) {
        self.write_idx = 0;
        self.live = 0;
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<const N: usize> Default for RingLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> IntoIterator for &'a RingLog<N> {
    type Item = LogEntry;
    type IntoIter = Entries<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Newest-first iterator returned by [`RingLog::iter`].
pub struct Entries<'a, const N: usize> {
    log: &'a RingLog<N>,
    cursor: Cursor<N>,
}

impl<const N: usize> Iterator for Entries<'_, N> {
    type Item = LogEntry;

    #[inline]
    fn next(&mut self) -> Option<LogEntry> {
        self.log.next_with(&mut self.cursor)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.log.live - self.cursor.consumed;
        (left, Some(left))
    }
}

impl<const N: usize> ExactSizeIterator for Entries<'_, N> {}
