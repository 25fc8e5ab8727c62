//! Measurement core: transient timing, direct readings, mode dispatch.
//!
//! Everything in this module is hardware-independent. The AVR HAL
//! implements the capability traits below; tests drive the same code
//! with simulated hardware.

pub mod mode;
pub mod reading;
pub mod tracker;
pub mod transient;

#[cfg(test)]
pub(crate) mod testutil;

pub use mode::{dispatch, Mode, Outcome};
pub use tracker::Stopwatch;
pub use transient::{measure_transient, ThresholdEdge, TransientProfile};

/// ADC input channel (single-ended)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum AdcChannel {
    Adc0 = 0,
    Adc1 = 1,
    Adc2 = 2,
    Adc3 = 3,
    Adc4 = 4,
    Adc5 = 5,
    Adc6 = 6,
    Adc7 = 7,
}

/// Blocking analog conversion capability.
///
/// A call selects the channel, runs one conversion and returns the raw
/// 10-bit sample. There is no completion timeout; a conversion that
/// never finishes blocks the caller.
pub trait AnalogSource {
    fn sample(&mut self, channel: AdcChannel) -> u16;
}

/// Conditions the meter reports instead of hanging on
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MeterError {
    /// Mode code outside the supported set
    InvalidMode,
    /// Charge control line could not be driven
    Probe,
    /// A polling phase exceeded its opt-in time bound
    Timeout,
}
