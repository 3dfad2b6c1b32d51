//! Timer 3, 8-bit, driven by the timer tick clock.
//!
//! The tick clock is the reference frequency divided by CLKCON.TICKSPD, so the timer
//! can only be set up once the system clock has settled. [`Timer3`] takes a
//! [`RefClk`](crate::rcc::RefClk) token for that reason.

mod low_level;
pub use low_level::*;


pub use crate::pac::vals::{ClockSpeed, T3Mode, T3Prescaler, TickSpeed};
use crate::pac::regs::{Ien0, Ien1, Ircon, T3ctl, Timif};

/// Counter width of Timer 3.
pub const T3_COUNTER_STEPS: u32 = 256;

/// Access to the Timer 3 control register and the interrupt flag/enable registers
/// it touches.
pub trait TimerRegisters {
    fn read_t3ctl(&self) -> T3ctl;
    fn write_t3ctl(&mut self, val: T3ctl);

    fn read_timif(&self) -> Timif;
    fn write_timif(&mut self, val: Timif);

    fn read_ircon(&self) -> Ircon;
    fn write_ircon(&mut self, val: Ircon);

    fn read_ien0(&self) -> Ien0;
    fn write_ien0(&mut self, val: Ien0);

    fn read_ien1(&self) -> Ien1;
    fn write_ien1(&mut self, val: Ien1);

    /// Clear TIMIF.T3OVFIF and nothing else. TIMIF also holds the Timer 3 channel
    /// and Timer 4 flags; a read-modify-write can drop one raised in between.
    fn clear_t3ovfif(&mut self);

    /// Clear IRCON.T3IF and nothing else, same constraint as
    /// [`clear_t3ovfif`](Self::clear_t3ovfif).
    fn clear_t3if(&mut self);

    fn modify_t3ctl<F: FnOnce(&mut T3ctl)>(&mut self, f: F) {
        let mut val = self.read_t3ctl();
        f(&mut val);
        self.write_t3ctl(val);
    }

    fn modify_timif<F: FnOnce(&mut Timif)>(&mut self, f: F) {
        let mut val = self.read_timif();
        f(&mut val);
        self.write_timif(val);
    }

    fn modify_ircon<F: FnOnce(&mut Ircon)>(&mut self, f: F) {
        let mut val = self.read_ircon();
        f(&mut val);
        self.write_ircon(val);
    }

    fn modify_ien0<F: FnOnce(&mut Ien0)>(&mut self, f: F) {
        let mut val = self.read_ien0();
        f(&mut val);
        self.write_ien0(val);
    }

    fn modify_ien1<F: FnOnce(&mut Ien1)>(&mut self, f: F) {
        let mut val = self.read_ien1();
        f(&mut val);
        self.write_ien1(val);
    }
}

/// Free-running timer configuration.
///
/// Defaults give a 203.125 kHz tick on 26 MHz parts and an overflow every
/// ~161 ms.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// CLKCON.TICKSPD, shared with every timer.
    pub tick: TickSpeed,
    pub prescaler: T3Prescaler,
    /// Enable the overflow interrupt (T3CTL.OVFIM, IEN1.T3IE and IEN0.EA).
    pub overflow_interrupt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: TickSpeed::Div128,
            prescaler: T3Prescaler::Div128,
            overflow_interrupt: true,
        }
    }
}

/// Timer error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// TICKSPD would select a faster clock than the system clock.
    TickFasterThanSysclk { tick: TickSpeed, sysclk: ClockSpeed },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::TickFasterThanSysclk { tick, sysclk } => write!(
                f,
                "tick divider {:?} is faster than system clock divider {:?}",
                tick, sysclk
            ),
        }
    }
}
