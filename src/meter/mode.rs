//! Mode selection and dispatch.
//!
//! The host picks a mode with a single digit once per session; the
//! dispatcher wires that mode to either a transient measurement or a
//! direct reading and tags the result with its unit.

use embedded_hal::digital::v2::OutputPin;

use super::reading::{to_milliamps, to_voltage};
use super::tracker::Stopwatch;
use super::transient::{measure_transient, TransientProfile};
use super::{AdcChannel, AnalogSource, MeterError};

// Probe wiring per mode
pub const VOLTAGE_CHANNEL: AdcChannel = AdcChannel::Adc0;
pub const CURRENT_CHANNEL: AdcChannel = AdcChannel::Adc1;
pub const CAPACITANCE_CHANNEL: AdcChannel = AdcChannel::Adc2;
pub const RESISTANCE_CHANNEL: AdcChannel = AdcChannel::Adc3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Idle,
    Voltage,
    Resistance,
    Capacitance,
    Current,
}

impl Mode {
    /// Parse the single ASCII digit the host sends.
    pub fn from_digit(digit: u8) -> Result<Mode, MeterError> {
        match digit {
            b'0' => Ok(Mode::Idle),
            b'1' => Ok(Mode::Voltage),
            b'2' => Ok(Mode::Resistance),
            b'3' => Ok(Mode::Capacitance),
            b'4' => Ok(Mode::Current),
            _ => Err(MeterError::InvalidMode),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Voltage => "voltage",
            Mode::Resistance => "resistance",
            Mode::Capacitance => "capacitance",
            Mode::Current => "current",
        }
    }
}

/// One dispatch result.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Outcome {
    Reading { value: f32, unit: &'static str },
    Idle,
    Invalid,
}

/// Run the measurement the mode code selects.
///
/// Unknown codes return `Outcome::Invalid` without touching any
/// hardware. `limit_ms` is forwarded to the transient engine; the
/// firmware binary always passes `None`.
pub fn dispatch<A, P, S>(
    code: u8,
    limit_ms: Option<f32>,
    adc: &mut A,
    charge_line: &mut P,
    clock: &mut S,
) -> Result<Outcome, MeterError>
where
    A: AnalogSource,
    P: OutputPin,
    S: Stopwatch,
{
    let mode = match Mode::from_digit(code) {
        Ok(mode) => mode,
        Err(_) => return Ok(Outcome::Invalid),
    };

    let outcome = match mode {
        Mode::Idle => Outcome::Idle,
        Mode::Voltage => Outcome::Reading {
            value: to_voltage(adc.sample(VOLTAGE_CHANNEL)),
            unit: "V",
        },
        Mode::Current => Outcome::Reading {
            value: to_milliamps(adc.sample(CURRENT_CHANNEL)),
            unit: "mA",
        },
        Mode::Capacitance => {
            let mut profile = TransientProfile::capacitance(CAPACITANCE_CHANNEL);
            profile.limit_ms = limit_ms;
            Outcome::Reading {
                value: measure_transient(&profile, adc, charge_line, clock)?,
                unit: "uF",
            }
        }
        Mode::Resistance => {
            let mut profile = TransientProfile::resistance(RESISTANCE_CHANNEL);
            profile.limit_ms = limit_ms;
            Outcome::Reading {
                value: measure_transient(&profile, adc, charge_line, clock)?,
                unit: "kOhm",
            }
        }
    };
    Ok(outcome)
}
