//! Subsystem groups and call-site gating.
//!
//! Every producer belongs to a [`Group`]. An active mask decides which groups
//! reach the log at all. The mask is a constant, either the `MASK` parameter of a
//! [`Producer`] or the mask passed to [`log_event!`](crate::log_event), so a call
//! from a masked-out group folds away at compile time.

use crate::scope::ExclusiveScope;
use crate::shared::SharedRingLog;
use crate::tag::Tag;

/// One or more subsystem bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Group(u32);

impl Group {
    pub const I2C: Group = Group::bit(0);
    pub const UART: Group = Group::bit(1);
    pub const FW_UPDATE: Group = Group::bit(2);
    pub const VIDEO: Group = Group::bit(3);
    pub const TIMER: Group = Group::bit(4);

    /// Group for bit `n`. Bits 0..=4 are taken by the predefined groups.
    ///
    /// # Panics
    /// Panics if `n >= 32`.
    pub const fn bit(n: u32) -> Self {
        assert!(n < 32, "group bit out of range");
        Group(1 << n)
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Group(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn union(self, other: Group) -> Self {
        Group(self.0 | other.0)
    }

    /// True if every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Group) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `mask` lets at least one bit of `self` through.
    #[inline(always)]
    pub const fn permitted_by(self, mask: u32) -> bool {
        mask & self.0 != 0
    }
}

impl core::ops::BitOr for Group {
    type Output = Group;

    fn bitor(self, rhs: Group) -> Group {
        self.union(rhs)
    }
}

/// Groups that log when nothing else is configured.
pub const DEFAULT_ACTIVE_GROUPS: u32 = Group::UART
    .union(Group::TIMER)
    .union(Group::I2C)
    .bits();

/// Producer handle that drops events from groups outside `MASK`.
pub struct Producer<
    'a,
    S: ExclusiveScope,
    const N: usize,
    const MASK: u32 = { DEFAULT_ACTIVE_GROUPS },
> {
    log: &'a SharedRingLog<S, N>,
}

impl<S: ExclusiveScope, const N: usize, const MASK: u32> Clone for Producer<'_, S, N, MASK> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ExclusiveScope, const N: usize, const MASK: u32> Copy for Producer<'_, S, N, MASK> {}

impl<S: ExclusiveScope, const N: usize, const MASK: u32> Producer<'_, S, N, MASK> {
    #[inline(always)]
    pub const fn permits(group: Group) -> bool {
        group.permitted_by(MASK)
    }

    /// Record `tag` and its parameters if `group` is active.
    #[inline(always)]
    pub fn log_event(&self, group: Group, tag: Tag, p1: u32, p2: u32, p3: u32, p4: u32) {
        if Self::permits(group) {
            self.log.record(tag, p1, p2, p3, p4);
        }
    }
}

impl<S: ExclusiveScope, const N: usize> SharedRingLog<S, N> {
    /// Producer handle gated by `MASK`.
    #[inline]
    pub fn producer<const MASK: u32>(&self) -> Producer<'_, S, N, MASK> {
        Producer { log: self }
    }
}

/// Record an event if its group is in the active mask.
///
/// `log_event!(log, mask, group, tag, p1, p2, p3, p4)` where `log` is anything
/// with a `record(Tag, u32, u32, u32, u32)` method. `mask` (a `u32`) and `group`
/// (a [`Group`]) must be constant expressions: the test runs in a `const` item,
/// so a masked-out call leaves no code behind and its arguments are never
/// evaluated.
///
/// Without the `enabled` feature the macro expands to nothing.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! log_event {
    ($log:expr, $mask:expr, $group:expr, $tag:expr, $p1:expr, $p2:expr, $p3:expr, $p4:expr $(,)?) => {{
        const PERMITTED: bool = $crate::Group::permitted_by($group, $mask);
        if PERMITTED {
            $log.record($tag, $p1, $p2, $p3, $p4);
        }
    }};
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! log_event {
    ($($ignored:tt)*) => {{}};
}

#[cfg(all(test, feature = "enabled"))]
mod tests {
    use super::{DEFAULT_ACTIVE_GROUPS, Group, Producer};
    use crate::ring_log::RingLog;
    use crate::scope::LocalScope;
    use crate::shared::SharedRingLog;
    use crate::tag::Tag;

    #[test]
    fn predefined_bits() {
        assert_eq!(Group::I2C.bits(), 1);
        assert_eq!(Group::UART.bits(), 2);
        assert_eq!(Group::FW_UPDATE.bits(), 4);
        assert_eq!(Group::VIDEO.bits(), 8);
        assert_eq!(Group::TIMER.bits(), 16);
    }

    #[test]
    fn default_mask() {
        let active = Group::from_bits(DEFAULT_ACTIVE_GROUPS);
        assert!(active.contains(Group::I2C | Group::UART | Group::TIMER));
        assert!(!active.contains(Group::VIDEO));
        assert!(!Group::FW_UPDATE.permitted_by(DEFAULT_ACTIVE_GROUPS));
    }

    #[test]
    fn producer_drops_inactive_groups() {
        const MASK: u32 = Group::UART.union(Group::bit(9)).bits();
        let log = SharedRingLog::<_, 8>::new(LocalScope::new());
        let producer = log.producer::<MASK>();

        producer.log_event(Group::UART, Tag::new("RX  "), 1, 0, 0, 0);
        producer.log_event(Group::VIDEO, Tag::new("VSYN"), 2, 0, 0, 0);
        producer.log_event(Group::bit(9), Tag::new("USR9"), 3, 0, 0, 0);

        assert_eq!(log.count(), 2);
        assert_eq!(log.latest().map(|e| e.tag), Some(Tag::new("USR9")));
        assert!(Producer::<LocalScope, 8, MASK>::permits(Group::UART));
        assert!(!Producer::<LocalScope, 8, MASK>::permits(Group::TIMER));
    }

    #[test]
    fn default_producer_mask() {
        let log = SharedRingLog::<_, 8>::new(LocalScope::new());
        let producer: Producer<'_, _, 8> = log.producer();
        producer.log_event(Group::TIMER, Tag::new("TICK"), 0, 0, 0, 0);
        producer.log_event(Group::FW_UPDATE, Tag::new("FLSH"), 0, 0, 0, 0);
        assert_eq!(log.count(), 1);
    }

    #[test]
    fn macro_skips_masked_group_without_evaluating() {
        const MASK: u32 = Group::I2C.bits();
        let log = SharedRingLog::<_, 4>::new(LocalScope::new());
        let mut evaluated = 0;

        crate::log_event!(log, MASK, Group::VIDEO, Tag::new("VSYN"), {
            evaluated += 1;
            0
        }, 0, 0, 0);
        assert_eq!(evaluated, 0);
        assert_eq!(log.count(), 0);

        crate::log_event!(log, MASK, Group::I2C, Tag::new("I2C "), {
            evaluated += 1;
            0x50
        }, 1, 2, 3);
        assert_eq!(evaluated, 1);
        assert_eq!(log.latest().map(|e| e.params), Some([0x50, 1, 2, 3]));
    }

    #[test]
    fn macro_works_on_bare_ring_log() {
        let mut log = RingLog::<4>::new();
        crate::log_event!(log, DEFAULT_ACTIVE_GROUPS, Group::UART, Tag::new("TX  "), 1, 2, 3, 4,);
        assert_eq!(log.count(), 1);
    }
}
