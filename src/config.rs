//! Configuration constants for the RC-transient component meter

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// ADC reference voltage in millivolts
pub const ADC_VREF_MV: u16 = 5000;

/// Full-scale 10-bit ADC sample
pub const MAX_SAMPLE: u16 = 1023;

/// ADC count at 63.2% of full scale, round(0.632 * 1023).
/// A first-order RC charge reaches this level after exactly one
/// time constant.
pub const TAU_THRESHOLD: u16 = 647;

/// Timer0 ticks per millisecond (16MHz / 64 prescale = 250kHz)
pub const TICKS_PER_MS: f32 = 250.0;

/// Ticks in one full 8-bit timer wrap
pub const TICKS_PER_OVERFLOW: u16 = 256;

/// Milliseconds accumulated per timer overflow
pub const MS_PER_OVERFLOW: f32 = TICKS_PER_OVERFLOW as f32 / TICKS_PER_MS;

/// Volts per ADC count (AVCC reference, full scale = 5.000V)
pub const VOLTS_PER_COUNT: f32 = 5.0 / MAX_SAMPLE as f32;

/// Milliamps per ADC count through the 1 ohm shunt
pub const MILLIAMPS_PER_COUNT: f32 = 5000.0 / MAX_SAMPLE as f32;

/// Reference resistor for capacitance measurement, in kilo-ohms.
/// tau[ms] / R[kOhm] = C[uF]
pub const REF_RESISTOR_KOHM: f32 = 10.0;

/// Reference capacitor for resistance measurement, in microfarads.
/// tau[ms] / C[uF] = R[kOhm]
pub const REF_CAPACITOR_UF: f32 = 1.0;
