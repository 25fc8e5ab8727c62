use crate::hal::gpio::board::{LedCapacitance, LedCurrent, LedResistance, LedVoltage};
use crate::meter::Mode;

/// One indicator LED per measurement mode.
pub struct ModeLeds {
    voltage: LedVoltage,
    resistance: LedResistance,
    capacitance: LedCapacitance,
    current: LedCurrent,
}

impl ModeLeds {
    pub fn new() -> Self {
        ModeLeds {
            voltage: LedVoltage::default().into_output(),
            resistance: LedResistance::default().into_output(),
            capacitance: LedCapacitance::default().into_output(),
            current: LedCurrent::default().into_output(),
        }
    }

    pub fn clear(&mut self) {
        self.voltage.set_low();
        self.resistance.set_low();
        self.capacitance.set_low();
        self.current.set_low();
    }

    /// Light the LED for the active mode, all off for idle.
    pub fn show(&mut self, mode: Mode) {
        self.clear();
        match mode {
            Mode::Idle => {}
            Mode::Voltage => self.voltage.set_high(),
            Mode::Resistance => self.resistance.set_high(),
            Mode::Capacitance => self.capacitance.set_high(),
            Mode::Current => self.current.set_high(),
        }
    }
}

impl Default for ModeLeds {
    fn default() -> Self {
        Self::new()
    }
}
