use avr_device::atmega128a::TC0;
use avr_device::interrupt::{self, Mutex};
use core::cell::Cell;

use crate::meter::tracker::{compose_elapsed_ms, reconcile_pending_overflow, Stopwatch};

#[derive(Clone, Copy)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

const PRESCALER_MASK: u8 = 0x07;

/// Raw Timer0 control in normal (free-running) mode.
pub struct Timer0 {
    _private: (),
}

impl Timer0 {
    pub fn new() -> Self {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr.write(|w| w.bits(0));
            (*p).tcnt.write(|w| w.bits(0));
        }
        Self { _private: () }
    }

    pub fn start(&mut self, prescaler: Prescaler) {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr.modify(|r, w| {
                w.bits((r.bits() & !PRESCALER_MASK) | (prescaler as u8 & PRESCALER_MASK))
            });
        }
    }

    pub fn stop(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr.modify(|r, w| w.bits(r.bits() & !PRESCALER_MASK));
        }
    }

    pub fn set_counter(&mut self, value: u8) {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt.write(|w| w.bits(value));
        }
    }

    pub fn get_counter(&self) -> u8 {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt.read().bits()
        }
    }

    pub fn enable_overflow_interrupt(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).timsk.modify(|r, w| w.bits(r.bits() | 1));
        }
    }

    pub fn disable_overflow_interrupt(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).timsk.modify(|r, w| w.bits(r.bits() & !1));
        }
    }

    /// TOV0 set: the counter wrapped but the handler has not run yet
    /// (set while the interrupt is masked or still queued).
    pub fn overflow_pending(&self) -> bool {
        unsafe {
            let p = TC0::ptr();
            (*p).tifr.read().bits() & 1 != 0
        }
    }

    /// Clear TOV0 (written as one on AVR).
    pub fn clear_overflow_flag(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).tifr.write(|w| w.bits(1));
        }
    }
}

impl Default for Timer0 {
    fn default() -> Self {
        Self::new()
    }
}

// Written only by TIMER0_OVF, read only through interrupt::free.
// A u32 cannot be read atomically on AVR, so every access goes through
// a critical section; an elapsed-time read can never observe a torn
// count or pair the count with ticks from a different overflow era.
static OVERFLOW_COUNT: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    interrupt::free(|cs| {
        let count = OVERFLOW_COUNT.borrow(cs);
        // One full wrap of the counter per event; the ticks since the
        // wrap are still in TCNT0 and are picked up at read time.
        count.set(count.get().wrapping_add(1));
    });
}

/// Millisecond stopwatch for the transient engine: Timer0 at Div64
/// (250 ticks/ms) plus the overflow accumulator above.
pub struct TransientTimer {
    timer: Timer0,
}

impl TransientTimer {
    pub fn new() -> Self {
        Self {
            timer: Timer0::new(),
        }
    }
}

impl Default for TransientTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch for TransientTimer {
    fn start(&mut self) {
        interrupt::free(|cs| OVERFLOW_COUNT.borrow(cs).set(0));
        self.timer.set_counter(0);
        // A flag left over from the previous run would count as a
        // phantom wrap on the first read.
        self.timer.clear_overflow_flag();
        self.timer.enable_overflow_interrupt();
        self.timer.start(Prescaler::Div64);
    }

    fn stop(&mut self) {
        self.timer.stop();
        self.timer.disable_overflow_interrupt();
        // Zero everything so a stale reading cannot leak into the next
        // measurement.
        self.timer.set_counter(0);
        interrupt::free(|cs| OVERFLOW_COUNT.borrow(cs).set(0));
    }

    fn elapsed_ms(&self) -> f32 {
        // Snapshot the accumulator and the live counter in one
        // critical section. The counter still runs in here; a wrap
        // that beat the handler shows up as a set TOV0 flag and gets
        // folded in before composing.
        interrupt::free(|cs| {
            let overflows = OVERFLOW_COUNT.borrow(cs).get();
            let ticks = self.timer.get_counter();
            let overflows =
                reconcile_pending_overflow(overflows, ticks, self.timer.overflow_pending());
            compose_elapsed_ms(overflows, ticks)
        })
    }
}

// Millisecond delay using Timer0 (16MHz/64 = 250kHz, 250 ticks = 1ms)
pub fn delay_ms(ms: u16) {
    let mut timer = Timer0::new();

    timer.set_counter(0);
    timer.start(Prescaler::Div64);

    for _ in 0..ms {
        while timer.get_counter() < 250 {}
        timer.set_counter(0);
    }

    timer.stop();
}
