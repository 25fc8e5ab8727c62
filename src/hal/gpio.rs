use avr_device::atmega128a::{PORTA, PORTB};
use core::convert::Infallible;
use core::marker::PhantomData;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8, MODE> Default for Pin<PORT, P, MODE> {
    fn default() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                // Set DDRx bit
                unsafe {
                    (*$PORT::ptr())
                        .$port
                        .ddr
                        .modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }

            pub fn into_input(self) -> Pin<$PORT, P, Input> {
                // Clear DDRx bit and disable pull-up
                unsafe {
                    (*$PORT::ptr())
                        .$port
                        .ddr
                        .modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr())
                        .$port
                        .port
                        .modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }
        }
    };
}

// Only the ports this board actually wires up
impl_port!(PORTA, porta);
impl_port!(PORTB, portb);

// Output pin implementation
impl<PORT, const P: u8> Pin<PORT, P, Output> {
    #[inline]
    pub fn set_high(&mut self)
    where
        Self: PinOps,
    {
        unsafe {
            self.port_ptr().port.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
    }

    #[inline]
    pub fn set_low(&mut self)
    where
        Self: PinOps,
    {
        unsafe {
            self.port_ptr().port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
        }
    }
}

// Input pin implementation
impl<PORT, const P: u8> Pin<PORT, P, Input> {
    #[inline]
    pub fn is_high(&self) -> bool
    where
        Self: PinOps,
    {
        unsafe { (self.port_ptr().pin.read().bits() & (1 << P)) != 0 }
    }

    #[inline]
    pub fn is_low(&self) -> bool
    where
        Self: PinOps,
    {
        !self.is_high()
    }
}

// The measurement engine drives the charge line through this trait.
impl<PORT, const P: u8> embedded_hal::digital::v2::OutputPin for Pin<PORT, P, Output>
where
    Self: PinOps,
{
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        Pin::set_high(self);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        Pin::set_low(self);
        Ok(())
    }
}

// Internal trait for port operations
pub trait PinOps {
    type PORT;
    fn port_ptr(&self) -> &Self::PORT;
}

macro_rules! impl_pin_ops {
    ($PORT:ident) => {
        impl<const P: u8, MODE> PinOps for Pin<$PORT, P, MODE> {
            type PORT = $PORT;
            #[inline]
            fn port_ptr(&self) -> &Self::PORT {
                unsafe { &*$PORT::ptr() }
            }
        }
    };
}

impl_pin_ops!(PORTA);
impl_pin_ops!(PORTB);

// Meter board wiring
pub mod board {
    use super::*;

    /// Drives the RC network toward supply when high, parks it at
    /// ground when low.
    pub type ChargeLine = Pin<PORTB, 0, Output>;

    // Mode indicator LEDs (PORTA)
    pub type LedVoltage = Pin<PORTA, 0, Output>;
    pub type LedResistance = Pin<PORTA, 1, Output>;
    pub type LedCapacitance = Pin<PORTA, 2, Output>;
    pub type LedCurrent = Pin<PORTA, 3, Output>;
}
