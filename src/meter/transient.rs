//! Transient measurement engine.
//!
//! One routine covers both component measurements: discharge the
//! network, then time how long the charging curve takes to cross 63.2%
//! of full scale. That crossing happens at exactly one RC time
//! constant, so dividing the elapsed milliseconds by the known
//! reference component isolates the unknown one.

use embedded_hal::digital::v2::OutputPin;

use super::tracker::Stopwatch;
use super::{AdcChannel, AnalogSource, MeterError};
use crate::config::{MAX_SAMPLE, REF_CAPACITOR_UF, REF_RESISTOR_KOHM, TAU_THRESHOLD};

/// Direction the sampled node moves during the charge phase.
///
/// Capacitance wiring samples the capacitor itself, which rises from
/// ground. Resistance wiring samples the far side of the divider, which
/// sits at supply while discharged and falls as the reference capacitor
/// charges.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ThresholdEdge {
    Rising,
    Falling,
}

impl ThresholdEdge {
    /// True once the network has settled at its discharged level.
    #[inline]
    fn at_rest(self, sample: u16) -> bool {
        match self {
            ThresholdEdge::Rising => sample == 0,
            ThresholdEdge::Falling => sample == MAX_SAMPLE,
        }
    }

    /// True once the sample has crossed one time constant's worth of
    /// the charging curve.
    #[inline]
    fn crossed(self, sample: u16) -> bool {
        match self {
            ThresholdEdge::Rising => sample >= TAU_THRESHOLD,
            ThresholdEdge::Falling => sample <= MAX_SAMPLE - TAU_THRESHOLD,
        }
    }
}

/// Configuration for one transient measurement.
#[derive(Clone, Copy, Debug)]
pub struct TransientProfile {
    pub channel: AdcChannel,
    pub edge: ThresholdEdge,
    /// Reference component value; tau in ms divided by this is the
    /// reported quantity.
    pub divisor: f32,
    /// Opt-in bound on each polling phase. `None` keeps the faithful
    /// behavior: a probe that never settles or never crosses hangs the
    /// instrument.
    pub limit_ms: Option<f32>,
}

impl TransientProfile {
    /// Capacitance against the reference resistor; uF out.
    pub const fn capacitance(channel: AdcChannel) -> Self {
        Self {
            channel,
            edge: ThresholdEdge::Rising,
            divisor: REF_RESISTOR_KOHM,
            limit_ms: None,
        }
    }

    /// Resistance against the reference capacitor; kOhm out.
    pub const fn resistance(channel: AdcChannel) -> Self {
        Self {
            channel,
            edge: ThresholdEdge::Falling,
            divisor: REF_CAPACITOR_UF,
            limit_ms: None,
        }
    }

    pub const fn with_limit(mut self, limit_ms: f32) -> Self {
        self.limit_ms = Some(limit_ms);
        self
    }
}

/// Run one discharge/charge cycle and convert the timed constant.
///
/// Returns `tau / divisor`, or `MeterError::Timeout` when a phase
/// exceeds the profile's opt-in bound.
pub fn measure_transient<A, P, S>(
    profile: &TransientProfile,
    adc: &mut A,
    charge_line: &mut P,
    clock: &mut S,
) -> Result<f32, MeterError>
where
    A: AnalogSource,
    P: OutputPin,
    S: Stopwatch,
{
    // Discharge until the network rests at its starting level. The
    // stopwatch only runs here when a bound was requested.
    charge_line.set_low().map_err(|_| MeterError::Probe)?;
    if profile.limit_ms.is_some() {
        clock.start();
    }
    while !profile.edge.at_rest(adc.sample(profile.channel)) {
        if expired(profile.limit_ms, clock) {
            clock.stop();
            return Err(MeterError::Timeout);
        }
    }
    if profile.limit_ms.is_some() {
        clock.stop();
    }

    // Timed charge up to the 63.2% crossing.
    clock.start();
    charge_line.set_high().map_err(|_| MeterError::Probe)?;
    while !profile.edge.crossed(adc.sample(profile.channel)) {
        if expired(profile.limit_ms, clock) {
            clock.stop();
            charge_line.set_low().map_err(|_| MeterError::Probe)?;
            return Err(MeterError::Timeout);
        }
    }
    let tau_ms = clock.elapsed_ms();
    clock.stop();
    charge_line.set_low().map_err(|_| MeterError::Probe)?;

    Ok(tau_ms / profile.divisor)
}

#[inline]
fn expired<S: Stopwatch>(limit_ms: Option<f32>, clock: &S) -> bool {
    match limit_ms {
        Some(limit) => clock.elapsed_ms() > limit,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TICKS_PER_MS;
    use crate::meter::testutil::{NullClock, RcNetwork, SimClock, SimPin, StuckAdc};
    use embedded_hal_mock::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    const ONE_TICK_MS: f32 = 1.0 / TICKS_PER_MS;

    #[test]
    fn rising_crossing_lands_within_one_sample_of_tau() {
        let tau_ms = 50.0;
        let sample_period_ms = 0.05;
        let net = RcNetwork::rising(tau_ms, sample_period_ms);
        let mut adc = net.adc();
        let mut pin = SimPin::new(&net);
        let mut clock = SimClock::new(&net);

        let profile = TransientProfile {
            channel: AdcChannel::Adc2,
            edge: ThresholdEdge::Rising,
            divisor: 1.0,
            limit_ms: None,
        };
        let measured = measure_transient(&profile, &mut adc, &mut pin, &mut clock).unwrap();

        // Crossing resolution: one sample period, one tick, plus the
        // rounding of 647/1023 against the exact 1 - 1/e level.
        let threshold_bias = tau_ms * 0.001;
        assert!(
            (measured - tau_ms).abs() <= sample_period_ms + ONE_TICK_MS + threshold_bias,
            "measured {} for tau {}",
            measured,
            tau_ms
        );
        assert!(!net.charging(), "charge line must end low");
    }

    #[test]
    fn falling_edge_measures_the_same_constant() {
        let tau_ms = 20.0;
        let sample_period_ms = 0.02;
        let net = RcNetwork::falling(tau_ms, sample_period_ms);
        let mut adc = net.adc();
        let mut pin = SimPin::new(&net);
        let mut clock = SimClock::new(&net);

        let profile = TransientProfile {
            channel: AdcChannel::Adc3,
            edge: ThresholdEdge::Falling,
            divisor: 1.0,
            limit_ms: None,
        };
        let measured = measure_transient(&profile, &mut adc, &mut pin, &mut clock).unwrap();

        let threshold_bias = tau_ms * 0.001;
        assert!(
            (measured - tau_ms).abs() <= sample_period_ms + ONE_TICK_MS + threshold_bias,
            "measured {} for tau {}",
            measured,
            tau_ms
        );
    }

    #[test]
    fn hundred_microfarads_against_ten_kilohm_reference() {
        // 10k * 100uF = 1000ms time constant.
        let tau_ms = 1000.0;
        let net = RcNetwork::rising(tau_ms, 1.0);
        let mut adc = net.adc();
        let mut pin = SimPin::new(&net);
        let mut clock = SimClock::new(&net);

        let profile = TransientProfile::capacitance(AdcChannel::Adc2);
        let microfarads = measure_transient(&profile, &mut adc, &mut pin, &mut clock).unwrap();

        assert!(
            (microfarads - 100.0).abs() < 1.0,
            "reported {} uF",
            microfarads
        );
    }

    #[test]
    fn conversion_divides_tau_by_the_reference_exactly() {
        // Same curve measured with two divisors must differ by exactly
        // the divisor ratio; the conversion itself adds no error.
        let net = RcNetwork::rising(100.0, 0.1);
        let mut adc = net.adc();
        let mut pin = SimPin::new(&net);
        let mut clock = SimClock::new(&net);
        let raw = measure_transient(
            &TransientProfile {
                divisor: 1.0,
                ..TransientProfile::capacitance(AdcChannel::Adc2)
            },
            &mut adc,
            &mut pin,
            &mut clock,
        )
        .unwrap();

        let net = RcNetwork::rising(100.0, 0.1);
        let mut adc = net.adc();
        let mut pin = SimPin::new(&net);
        let mut clock = SimClock::new(&net);
        let scaled =
            measure_transient(&TransientProfile::capacitance(AdcChannel::Adc2), &mut adc, &mut pin, &mut clock)
                .unwrap();

        assert_eq!(scaled, raw / REF_RESISTOR_KOHM);
    }

    #[test]
    fn open_probe_times_out_when_bounded() {
        // An open input reads ground forever: discharge succeeds
        // immediately, the charge phase never crosses. With a bound the
        // engine reports instead of hanging.
        let net = RcNetwork::rising(1.0, 0.1);
        let mut adc = StuckAdc::new(&net, 0);
        let mut pin = SimPin::new(&net);
        let mut clock = SimClock::new(&net);

        let profile = TransientProfile::capacitance(AdcChannel::Adc2).with_limit(10.0);
        let result = measure_transient(&profile, &mut adc, &mut pin, &mut clock);

        assert_eq!(result, Err(MeterError::Timeout));
        assert!(!net.charging(), "charge line must end low after timeout");
    }

    #[test]
    fn charge_line_follows_the_low_high_low_sequence() {
        // Discharged on the first sample, crossed on the second, so the
        // pin transactions reduce to exactly: park low, charge, park.
        struct StepAdc(u32);
        impl crate::meter::AnalogSource for StepAdc {
            fn sample(&mut self, _channel: AdcChannel) -> u16 {
                self.0 += 1;
                if self.0 == 1 {
                    0
                } else {
                    1023
                }
            }
        }

        let mut pin = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut clock = NullClock;
        let profile = TransientProfile::capacitance(AdcChannel::Adc2);
        let value = measure_transient(&profile, &mut StepAdc(0), &mut pin, &mut clock).unwrap();
        assert_eq!(value, 0.0);
        pin.done();
    }

    #[test]
    fn stuck_discharge_times_out_too() {
        let net = RcNetwork::rising(1.0, 0.1);
        // Stuck high: discharge target of zero is never reached.
        let mut adc = StuckAdc::new(&net, 1023);
        let mut pin = SimPin::new(&net);
        let mut clock = SimClock::new(&net);

        let profile = TransientProfile::capacitance(AdcChannel::Adc2).with_limit(5.0);
        assert_eq!(
            measure_transient(&profile, &mut adc, &mut pin, &mut clock),
            Err(MeterError::Timeout)
        );
    }
}
