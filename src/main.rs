#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use avr_device::atmega128a::Peripherals;
    use avr_device::interrupt::{self, Mutex};
    use core::cell::RefCell;

    use rc_meter::drivers::{ModeLeds, SerialConsole};
    use rc_meter::hal::{board, delay_ms, Adc, TransientTimer};
    use rc_meter::meter::{dispatch, Mode, Outcome};

    // Claimed once at startup so nothing else can take the peripherals
    static GLOBAL_PERIPHERALS: Mutex<RefCell<Option<Peripherals>>> =
        Mutex::new(RefCell::new(None));

    /// Pause between readings in a running session
    const READING_INTERVAL_MS: u16 = 500;

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        interrupt::free(|cs| {
            GLOBAL_PERIPHERALS.borrow(cs).replace(Some(dp));
        });

        let mut console = SerialConsole::new();
        let mut adc = Adc::new();
        let mut clock = TransientTimer::new();
        let mut charge_line = board::ChargeLine::default().into_output();
        let mut leds = ModeLeds::new();
        leds.clear();

        // Enable interrupts globally
        unsafe { avr_device::interrupt::enable() };

        console.write_line("RC Component Meter v0.1.0");
        console.write_line("0 - Idle");
        console.write_line("1 - Voltage (V)");
        console.write_line("2 - Resistance (kOhm)");
        console.write_line("3 - Capacitance (uF)");
        console.write_line("4 - Current (mA)");
        console.write_str("Select mode: ");

        // One mode per session; a new selection needs a reset.
        let code = loop {
            if let Some(byte) = console.read_byte() {
                break byte;
            }
        };
        console.write_byte(code);
        console.write_line("");

        match Mode::from_digit(code) {
            Ok(mode) => {
                console.write_str("Mode: ");
                console.write_line(mode.label());
                leds.show(mode);
            }
            Err(_) => {
                console.write_line("Invalid selection");
                loop {}
            }
        }

        loop {
            if let Ok(Outcome::Reading { value, unit }) =
                dispatch(code, None, &mut adc, &mut charge_line, &mut clock)
            {
                console.write_reading(value, unit);
            }
            delay_ms(READING_INTERVAL_MS);
        }
    }
}

// The firmware image only exists for the AVR target; host builds get a
// stub so `cargo test` can link the workspace.
#[cfg(not(target_arch = "avr"))]
fn main() {}
