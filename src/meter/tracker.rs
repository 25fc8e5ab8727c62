//! Elapsed-time tracking over the free-running hardware timer.
//!
//! The hardware side (Timer0 plus the overflow interrupt) lives in
//! `hal::timer`. This module holds the capability trait and the tick
//! arithmetic, which is where the timing contract actually lives:
//! elapsed time is `overflows * MS_PER_OVERFLOW + ticks / TICKS_PER_MS`.

use crate::config::{MS_PER_OVERFLOW, TICKS_PER_MS};

/// Start/stop millisecond stopwatch capability.
///
/// `elapsed_ms` is only meaningful between `start` and `stop`; both
/// `start` and `stop` reset the reading to zero so a stale value can
/// never leak into the next measurement.
pub trait Stopwatch {
    fn start(&mut self);
    fn stop(&mut self);
    fn elapsed_ms(&self) -> f32;
}

/// Compose a millisecond reading from a coherent snapshot of the
/// overflow count and the live tick counter.
///
/// The two values must be captured together (on hardware, inside one
/// critical section with the overflow interrupt masked); composing a
/// count from one overflow era with ticks from another produces the
/// torn readings this design exists to rule out.
#[inline]
pub fn compose_elapsed_ms(overflows: u32, ticks: u8) -> f32 {
    overflows as f32 * MS_PER_OVERFLOW + ticks as f32 / TICKS_PER_MS
}

/// Fold an unserviced overflow into a snapshot taken with the overflow
/// interrupt masked.
///
/// The counter keeps running inside a critical section. If it wraps
/// before the ticks are read, the hardware overflow flag is set, the
/// handler has not run, and the accumulator is one wrap behind the
/// ticks it is being paired with; composing them raw would step the
/// reading backwards by a full wrap. A pending flag next to a
/// max-value tick count means the wrap happened after the ticks were
/// read, so nothing is owed.
#[inline]
pub fn reconcile_pending_overflow(overflows: u32, ticks: u8, overflow_pending: bool) -> u32 {
    if overflow_pending && ticks < u8::MAX {
        overflows.wrapping_add(1)
    } else {
        overflows
    }
}
