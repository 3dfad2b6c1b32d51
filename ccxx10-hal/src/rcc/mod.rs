//! High-speed oscillator control.
//!
//! The HS RCOSC comes out of reset uncalibrated. Calibration of both the HS RCOSC
//! and the LS RCOSC starts automatically once the HS XOSC becomes the system clock,
//! and the hardware refuses to switch back to the RC until it has finished
//! (about 65 us + 2 ms). [`ensure_calibrated_internal_oscillator_active`] walks
//! through that sequence and leaves the system on the calibrated RC with the
//! crystal powered down.

use critical_section::CriticalSection;
use embedded_hal_1::delay::DelayNs;

mod clock;
pub use clock::*;
mod clock_config;
pub use clock_config::*;
mod clock_read;
pub use clock_read::*;
mod token;
pub use token::*;

#[cfg(test)]
mod tests;

use crate::pac::regs::{Clkcon, Sleep};

/// Access to the clock control and sleep registers.
///
/// Implemented by the platform register file ([`crate::pac::Xreg`]) and by the
/// simulator. Reads must always hit the hardware: CLKCON.OSC and the SLEEP
/// stability flags are status bits.
pub trait ClockRegisters {
    fn read_clkcon(&self) -> Clkcon;

    fn write_clkcon(&mut self, val: Clkcon);

    fn read_sleep(&self) -> Sleep;

    /// Read-only SLEEP bits in `val` are ignored by the hardware.
    fn write_sleep(&mut self, val: Sleep);

    fn modify_clkcon<F: FnOnce(&mut Clkcon)>(&mut self, f: F) {
        let mut val = self.read_clkcon();
        f(&mut val);
        self.write_clkcon(val);
    }

    fn modify_sleep<F: FnOnce(&mut Sleep)>(&mut self, f: F) {
        let mut val = self.read_sleep();
        f(&mut val);
        self.write_sleep(val);
    }
}

impl<T: ClockRegisters> ClockRegisters for &mut T {
    fn read_clkcon(&self) -> Clkcon {
        T::read_clkcon(self)
    }

    fn write_clkcon(&mut self, val: Clkcon) {
        T::write_clkcon(self, val)
    }

    fn read_sleep(&self) -> Sleep {
        T::read_sleep(self)
    }

    fn write_sleep(&mut self, val: Sleep) {
        T::write_sleep(self, val)
    }
}

/// Wait that did not complete within [`Config::timeout_us`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// SLEEP.XOSC_STB never set after powering up the crystal.
    CrystalStable,
    /// CLKCON.OSC never read back the crystal.
    SwitchToCrystal,
    /// CLKCON.OSC never read back the RC: calibration did not finish.
    SwitchToInternal,
}

/// RCC error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An oscillator did not become stable in time. The system clock is not
    /// trustworthy; treat as a fatal boot failure.
    OscillatorStabilizationTimeout { stage: Stage, waited_us: u32 },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OscillatorStabilizationTimeout { stage, waited_us } => write!(
                f,
                "oscillator stabilization timeout at {:?} after {} us",
                stage, waited_us
            ),
        }
    }
}

/// Switch the system clock to the calibrated HS RCOSC at [`TARGET_SYSCLK_FREQ`]
/// and power down the HS XOSC.
///
/// Blocks for about 2 ms on a cold boot. Runs the full sequence even if the RC
/// was calibrated before; every step is harmless when the hardware already
/// matches.
///
/// Interrupts are not masked. Nothing else may touch CLKCON or SLEEP while this
/// runs; [`crate::init`] calls it inside a critical section.
pub fn ensure_calibrated_internal_oscillator_active<R, D>(
    regs: &mut R,
    delay: &mut D,
    config: &Config,
) -> Result<ClockControl, Error>
where
    R: ClockRegisters,
    D: DelayNs,
{
    clock_config::run_switch_sequence(regs, delay, config)
}

/// Same as [`ensure_calibrated_internal_oscillator_active`], for callers that
/// already hold a critical section.
pub fn ensure_calibrated_internal_oscillator_active_with_cs<R, D>(
    _cs: CriticalSection,
    regs: &mut R,
    delay: &mut D,
    config: &Config,
) -> Result<ClockControl, Error>
where
    R: ClockRegisters,
    D: DelayNs,
{
    clock_config::run_switch_sequence(regs, delay, config)
}

pub fn print_clocks<R: ClockRegisters>(regs: &R) {
    let clocks = read_clocks_from_hw(regs);
    info!("Clock frequencies: {:?}", clocks);
}
