use core::convert::Infallible;

use embedded_hal::serial::{Read, Write};

use crate::hal::Uart;

pub struct SerialConsole {
    uart: Uart,
}

impl SerialConsole {
    pub fn new() -> Self {
        Self { uart: Uart::new() }
    }

    pub fn write_str(&mut self, s: &str) {
        self.uart.write_str(s);
    }

    pub fn write_line(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        match self.uart.read() {
            Ok(byte) => Some(byte),
            Err(nb::Error::WouldBlock) => None,
            Err(nb::Error::Other(e)) => match e {},
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        // TX buffering never blocks, so this resolves immediately.
        nb::block!(self.uart.write(byte)).ok();
    }

    /// Print a reading with two fractional digits. No float formatting
    /// on this target, so scale into integer hundredths first.
    pub fn write_fixed(&mut self, value: f32) {
        let mut value = value;
        if value < 0.0 {
            self.write_byte(b'-');
            value = -value;
        }
        let hundredths = (value * 100.0 + 0.5) as u32;
        let whole = hundredths / 100;
        let frac = hundredths % 100;
        ufmt::uwrite!(self, "{}", whole).ok();
        self.write_byte(b'.');
        self.write_byte(b'0' + (frac / 10) as u8);
        self.write_byte(b'0' + (frac % 10) as u8);
    }

    /// One result line: `value unit`
    pub fn write_reading(&mut self, value: f32, unit: &str) {
        self.write_fixed(value);
        self.write_byte(b' ');
        self.write_line(unit);
    }
}

impl ufmt::uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.uart.write_str(s);
        Ok(())
    }
}

impl Default for SerialConsole {
    fn default() -> Self {
        Self::new()
    }
}
