//! RC-transient component meter for the ATmega128.
//!
//! The measurement core in [`meter`] is portable and runs against
//! capability traits (analog source, charge line, stopwatch) so it can
//! be unit tested on the host. The register-level HAL and the serial
//! console only exist on the AVR target.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod config;
pub mod meter;

#[cfg(target_arch = "avr")]
pub mod hal;

#[cfg(target_arch = "avr")]
pub mod drivers;
