pub mod adc;
pub mod gpio;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use adc::Adc;
pub use gpio::board;
pub use gpio::{Input, Output, Pin};
pub use timer::{delay_ms, Prescaler, Timer0, TransientTimer};
pub use uart::Uart;
