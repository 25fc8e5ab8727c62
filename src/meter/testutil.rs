//! Simulated hardware for host-side tests: an ideal first-order RC
//! network shared between a fake ADC, the charge line, and a stopwatch,
//! all advancing one common simulated clock.

use std::cell::RefCell;
use std::rc::Rc;

use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

use super::tracker::Stopwatch;
use super::{AdcChannel, AnalogSource};
use crate::config::MAX_SAMPLE;

#[derive(Clone, Copy)]
enum Direction {
    Rising,
    Falling,
}

struct Inner {
    now_ms: f32,
    tau_ms: f32,
    sample_period_ms: f32,
    direction: Direction,
    charging: bool,
    charge_started_ms: f32,
    clock_running: bool,
    clock_started_ms: f32,
}

/// Handle to one simulated measurement setup. Clones share state.
#[derive(Clone)]
pub struct RcNetwork {
    inner: Rc<RefCell<Inner>>,
}

impl RcNetwork {
    fn new(tau_ms: f32, sample_period_ms: f32, direction: Direction) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                now_ms: 0.0,
                tau_ms,
                sample_period_ms,
                direction,
                charging: false,
                charge_started_ms: 0.0,
                clock_running: false,
                clock_started_ms: 0.0,
            })),
        }
    }

    /// Capacitance-style wiring: sampled node rises from ground.
    pub fn rising(tau_ms: f32, sample_period_ms: f32) -> Self {
        Self::new(tau_ms, sample_period_ms, Direction::Rising)
    }

    /// Resistance-style wiring: sampled node falls from supply.
    pub fn falling(tau_ms: f32, sample_period_ms: f32) -> Self {
        Self::new(tau_ms, sample_period_ms, Direction::Falling)
    }

    pub fn adc(&self) -> NetAdc {
        NetAdc { net: self.clone() }
    }

    pub fn charging(&self) -> bool {
        self.inner.borrow().charging
    }
}

/// ADC reading the simulated curve; every conversion costs one sample
/// period of simulated time.
pub struct NetAdc {
    net: RcNetwork,
}

impl AnalogSource for NetAdc {
    fn sample(&mut self, _channel: AdcChannel) -> u16 {
        let mut s = self.net.inner.borrow_mut();
        s.now_ms += s.sample_period_ms;

        let full = MAX_SAMPLE as f32;
        let level = if s.charging {
            let t = s.now_ms - s.charge_started_ms;
            let fraction = 1.0 - (-t / s.tau_ms).exp();
            match s.direction {
                Direction::Rising => full * fraction,
                Direction::Falling => full * (1.0 - fraction),
            }
        } else {
            match s.direction {
                Direction::Rising => 0.0,
                Direction::Falling => full,
            }
        };
        level as u16
    }
}

/// ADC pinned at one value (open or shorted probe); still advances the
/// simulated clock so bounded waits can expire.
pub struct StuckAdc {
    net: RcNetwork,
    value: u16,
}

impl StuckAdc {
    pub fn new(net: &RcNetwork, value: u16) -> Self {
        Self {
            net: net.clone(),
            value,
        }
    }
}

impl AnalogSource for StuckAdc {
    fn sample(&mut self, _channel: AdcChannel) -> u16 {
        let mut s = self.net.inner.borrow_mut();
        s.now_ms += s.sample_period_ms;
        self.value
    }
}

/// Charge control line wired into the simulation.
pub struct SimPin {
    net: RcNetwork,
}

impl SimPin {
    pub fn new(net: &RcNetwork) -> Self {
        Self { net: net.clone() }
    }
}

impl OutputPin for SimPin {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut s = self.net.inner.borrow_mut();
        s.charging = true;
        let now = s.now_ms;
        s.charge_started_ms = now;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.net.inner.borrow_mut().charging = false;
        Ok(())
    }
}

/// Stopwatch reading the simulated clock.
pub struct SimClock {
    net: RcNetwork,
}

impl SimClock {
    pub fn new(net: &RcNetwork) -> Self {
        Self { net: net.clone() }
    }
}

impl Stopwatch for SimClock {
    fn start(&mut self) {
        let mut s = self.net.inner.borrow_mut();
        s.clock_running = true;
        let now = s.now_ms;
        s.clock_started_ms = now;
    }

    fn stop(&mut self) {
        let mut s = self.net.inner.borrow_mut();
        s.clock_running = false;
        let now = s.now_ms;
        s.clock_started_ms = now;
    }

    fn elapsed_ms(&self) -> f32 {
        let s = self.net.inner.borrow();
        if s.clock_running {
            s.now_ms - s.clock_started_ms
        } else {
            0.0
        }
    }
}

/// ADC returning one fixed value without any simulation behind it.
pub struct FixedAdc(pub u16);

impl AnalogSource for FixedAdc {
    fn sample(&mut self, _channel: AdcChannel) -> u16 {
        self.0
    }
}

/// ADC that must never be consulted.
pub struct PanicAdc;

impl AnalogSource for PanicAdc {
    fn sample(&mut self, _channel: AdcChannel) -> u16 {
        panic!("measurement routine ran for a mode that must not measure");
    }
}

/// Stopwatch for paths that never time anything.
pub struct NullClock;

impl Stopwatch for NullClock {
    fn start(&mut self) {}
    fn stop(&mut self) {}
    fn elapsed_ms(&self) -> f32 {
        0.0
    }
}
