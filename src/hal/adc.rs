use avr_device::atmega128a::ADC;

use crate::meter::{AdcChannel, AnalogSource};

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum AdcReference {
    Aref = 0,          // External AREF
    Avcc = 1,          // AVCC with external cap at AREF
    Internal2_56V = 3, // Internal 2.56V with external cap at AREF
}

pub struct Adc {
    _private: (),
}

impl Adc {
    pub fn new() -> Self {
        unsafe {
            let p = ADC::ptr();
            // Enable ADC, prescaler div128 (125kHz @ 16MHz)
            (*p).adcsra.write(|w| w.bits(0x87));
            // Reference voltage = AVCC
            (*p).admux.write(|w| w.bits(0x40));
        }
        Self { _private: () }
    }

    pub fn set_reference(&mut self, reference: AdcReference) {
        unsafe {
            let p = ADC::ptr();
            (*p).admux
                .modify(|r, w| w.bits((r.bits() & 0x3F) | ((reference as u8) << 6)));
        }
    }

    /// One blocking conversion. Busy-waits on the start bit clearing;
    /// there is no completion timeout.
    pub fn read_channel(&mut self, channel: AdcChannel) -> u16 {
        unsafe {
            let p = ADC::ptr();

            // Select channel
            (*p).admux
                .modify(|r, w| w.bits((r.bits() & 0xE0) | (channel as u8)));

            // Start conversion
            (*p).adcsra.modify(|r, w| w.bits(r.bits() | 0x40));

            // Wait for completion
            while (*p).adcsra.read().bits() & 0x40 != 0 {}

            // Read result (ADCL must be read first)
            let low = (*p).adcl.read().bits() as u16;
            let high = (*p).adch.read().bits() as u16;

            (high << 8) | low
        }
    }
}

impl AnalogSource for Adc {
    fn sample(&mut self, channel: AdcChannel) -> u16 {
        self.read_channel(channel)
    }
}

impl Default for Adc {
    fn default() -> Self {
        Self::new()
    }
}
