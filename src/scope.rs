//! Exclusive execution scopes.
//!
//! The log never masks interrupts or takes locks on its own. Whoever embeds it
//! picks an [`ExclusiveScope`] and every operation on a [`crate::SharedRingLog`]
//! runs inside exactly one [`ExclusiveScope::enter`] call.
//!
//! Provided scopes:
//! - [`LocalScope`]: a single execution context, no synchronization at all.
//! - [`SpinScope`]: a test-and-set spin lock.
//! - [`CriticalSectionScope`] (feature `critical-section`): the platform critical
//!   section registered with the `critical-section` crate, usually interrupt masking.

use core::marker::PhantomData;

use crate::atomic::{AtomicBool, Ordering};

/// Mutual exclusion for the duration of a closure.
///
/// # Safety
/// While `f` runs inside [`ExclusiveScope::enter`], no other `enter` call on the
/// same scope value may be running `f` in any execution context, including
/// interrupt handlers that can preempt the caller. Nested `enter` calls made from
/// inside `f` must not hand out overlapping access either; the log never nests.
pub unsafe trait ExclusiveScope {
    fn enter<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// Scope for a log that is only ever touched from one execution context.
///
/// `!Send` and `!Sync`, so a log guarded by it cannot leave the context that
/// created it.
#[derive(Default)]
pub struct LocalScope {
    _not_send: PhantomData<*const ()>,
}

impl LocalScope {
    pub const fn new() -> Self {
        Self {
            _not_send: PhantomData,
        }
    }
}

// SAFETY: LocalScope is !Sync and !Send, so every `enter` happens on the one
// context that owns it, and the log never re-enters.
unsafe impl ExclusiveScope for LocalScope {
    #[inline(always)]
    fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }
}

/// Test-and-set spin lock.
///
/// Suitable between threads, or between cores. Do not use it where an interrupt
/// handler may log while the code it preempted holds the lock on the same core;
/// the handler would spin forever. Use [`CriticalSectionScope`] there.
pub struct SpinScope {
    locked: AtomicBool,
}

impl SpinScope {
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    #[inline]
    fn lock(&self) -> SpinGuard<'_> {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
        SpinGuard { scope: self }
    }
}

impl Default for SpinScope {
    fn default() -> Self {
        Self::new()
    }
}

struct SpinGuard<'a> {
    scope: &'a SpinScope,
}

impl Drop for SpinGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.scope.locked.store(false, Ordering::Release);
    }
}

// SAFETY: the Acquire CAS admits one holder at a time and the guard's Release
// store hands the protected state to the next holder.
unsafe impl ExclusiveScope for SpinScope {
    #[inline]
    fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock();
        f()
    }
}

/// Scope backed by the platform critical section from the `critical-section` crate.
#[cfg(feature = "critical-section")]
#[derive(Copy, Clone, Debug, Default)]
pub struct CriticalSectionScope;

// SAFETY: `critical_section::with` guarantees exclusion across every context the
// registered implementation covers. Nesting is allowed by the crate but the log
// never nests.
#[cfg(feature = "critical-section")]
unsafe impl ExclusiveScope for CriticalSectionScope {
    #[inline]
    fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}

#[cfg(test)]
mod tests {
    use super::{ExclusiveScope, LocalScope, SpinScope};
    use crate::atomic::Ordering;

    #[test]
    fn local_scope_runs_closure() {
        let scope = LocalScope::new();
        assert_eq!(scope.enter(|| 7), 7);
    }

    #[test]
    fn spin_scope_releases_after_enter() {
        let scope = SpinScope::new();
        assert_eq!(scope.enter(|| 1), 1);
        assert!(!scope.locked.load(Ordering::Relaxed));
        assert_eq!(scope.enter(|| 2), 2);
    }

    #[test]
    fn spin_scope_is_held_inside_enter() {
        let scope = SpinScope::new();
        let held = scope.enter(|| scope.locked.load(Ordering::Relaxed));
        assert!(held);
    }

    #[cfg(feature = "critical-section")]
    #[test]
    fn critical_section_scope_runs_closure() {
        let scope = super::CriticalSectionScope;
        assert_eq!(scope.enter(|| 3), 3);
    }
}
