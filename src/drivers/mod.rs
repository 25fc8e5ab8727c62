pub mod mode_led;
pub mod serial_console;

pub use mode_led::ModeLeds;
pub use serial_console::SerialConsole;
