//! Direct-reading conversions: one sample in, one quantity out.

use crate::config::{MILLIAMPS_PER_COUNT, VOLTS_PER_COUNT};

#[inline]
pub fn to_voltage(sample: u16) -> f32 {
    sample as f32 * VOLTS_PER_COUNT
}

#[inline]
pub fn to_milliamps(sample: u16) -> f32 {
    sample as f32 * MILLIAMPS_PER_COUNT
}
