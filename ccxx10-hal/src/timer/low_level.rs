//! Timer 3 free-running driver

use core::convert::Infallible;

use super::{Config, Error, T3Mode, TimerRegisters, T3_COUNTER_STEPS};
use crate::rcc::{ClockRegisters, RefClk};
use crate::time::Hertz;

/// Timer 3 in free-running mode: counts 0x00..=0xFF and flags an overflow on
/// every wrap.
pub struct Timer3<'d, R: ClockRegisters + TimerRegisters> {
    regs: &'d mut R,
    ref_freq: Hertz,
    config: Config,
}

impl<'d, R: ClockRegisters + TimerRegisters> Timer3<'d, R> {
    /// Set the tick divider, then clear and start Timer 3 in free-running mode.
    ///
    /// The tick divider must not be faster than the current system clock divider.
    pub fn new_free_running(
        regs: &'d mut R,
        ref_clk: &'d RefClk,
        config: Config,
    ) -> Result<Self, Error> {
        let clkspd = regs.read_clkcon().clkspd();
        if config.tick.to_bits() < clkspd.to_bits() {
            return Err(Error::TickFasterThanSysclk {
                tick: config.tick,
                sysclk: clkspd,
            });
        }

        regs.modify_clkcon(|w| w.set_tickspd(config.tick));

        // Single write: prescaler, start, overflow interrupt, counter clear, mode.
        regs.modify_t3ctl(|w| {
            w.set_div(config.prescaler);
            w.set_start(true);
            w.set_ovfim(config.overflow_interrupt);
            w.set_clr(true);
            w.set_mode(T3Mode::FreeRunning);
        });

        if config.overflow_interrupt {
            regs.modify_ien1(|w| w.set_t3ie(true));
            regs.modify_ien0(|w| w.set_ea(true));
        }

        let timer = Self {
            regs,
            ref_freq: ref_clk.frequency(),
            config,
        };
        debug!(
            "timer3: tick = {} Hz, overflow every {} us",
            timer.tick_frequency().0,
            timer.overflow_period_us()
        );
        Ok(timer)
    }

    /// Tick clock feeding the prescaler.
    pub fn tick_frequency(&self) -> Hertz {
        self.ref_freq / self.config.tick
    }

    /// Time between two overflows, in microseconds (rounded down).
    pub fn overflow_period_us(&self) -> u32 {
        let cycles = T3_COUNTER_STEPS as u64
            * self.config.tick.divisor() as u64
            * self.config.prescaler.divisor() as u64;
        (cycles * 1_000_000 / self.ref_freq.0 as u64) as u32
    }

    /// Overflow interrupt body.
    ///
    /// Returns `true` if an overflow was pending and has been acknowledged.
    pub fn on_overflow(&mut self) -> bool {
        if !self.regs.read_timif().t3ovfif() {
            return false;
        }
        // T3IF is level triggered: clear the module flag first or it is raised again.
        self.regs.clear_t3ovfif();
        self.regs.clear_t3if();
        true
    }

    /// Non-blocking overflow poll, for use with interrupts disabled.
    pub fn wait_overflow(&mut self) -> nb::Result<(), Infallible> {
        if self.on_overflow() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Stop the counter. The overflow interrupt stays configured.
    pub fn stop(&mut self) {
        self.regs.modify_t3ctl(|w| w.set_start(false));
    }

    /// Resume counting from the current value.
    pub fn start(&mut self) {
        self.regs.modify_t3ctl(|w| w.set_start(true));
    }

    pub fn is_running(&self) -> bool {
        self.regs.read_t3ctl().start()
    }
}
