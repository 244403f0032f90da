//! Atomics backend: `core::sync::atomic` by default, `portable-atomic` for
//! targets without native compare-and-swap.

#[cfg(not(feature = "portable-atomic"))]
pub(crate) use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "portable-atomic")]
pub(crate) use portable_atomic::{AtomicBool, Ordering};
