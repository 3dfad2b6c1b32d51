//! Clock configuration and the oscillator switch sequence.

use core::marker::PhantomData;

use embedded_hal_1::delay::DelayNs;

use super::{ClockControl, ClockRegisters, Error, Osc, Stage};
use super::{DEFAULT_POLL_INTERVAL_US, DEFAULT_TIMEOUT_US, TARGET_CLKSPD, TARGET_SYSCLK_FREQ};
use crate::utils::blocking_wait_timeout;

/// Clock configuration
///
/// Only the wait bounds are configurable: the source and the divider of the
/// final system clock are fixed.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    /// Upper bound for each stabilization wait.
    ///
    /// The hardware guarantees completion within ~2.065 ms. Real hardware that
    /// never sets the expected flag would otherwise hang the boot forever.
    pub timeout_us: u32,
    /// Delay between two reads of a status flag.
    pub poll_interval_us: u32,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub const fn new() -> Self {
        Self {
            timeout_us: DEFAULT_TIMEOUT_US,
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
        }
    }

    pub const fn with_timeout_us(mut self, timeout_us: u32) -> Self {
        self.timeout_us = timeout_us;
        self
    }

    pub const fn with_poll_interval_us(mut self, poll_interval_us: u32) -> Self {
        self.poll_interval_us = poll_interval_us;
        self
    }

    /// Validate the configuration at compile time.
    ///
    /// Panics with a descriptive message if the configuration is invalid.
    /// Use inside `const { }` blocks to get compile-time errors.
    ///
    /// Note: Uses `::core::panic!` so it stays usable in const context.
    pub const fn check(&self) {
        if self.poll_interval_us == 0 {
            ::core::panic!("poll interval must not be zero");
        }
        if self.timeout_us == 0 {
            ::core::panic!("timeout must not be zero");
        }
        if self.poll_interval_us > self.timeout_us {
            ::core::panic!("poll interval exceeds the timeout");
        }
    }

    /// Validate and return a [`Config`]. Use in `const { }` blocks for compile-time checking.
    ///
    /// ```rust,ignore
    /// const { rcc::ConfigBuilder::new().with_timeout_us(5_000).checked() }
    /// ```
    pub const fn checked(self) -> Config {
        self.check();
        Config(self)
    }
}

/// A validated clock configuration.
///
/// Can only be constructed via [`ConfigBuilder::checked()`], which validates at
/// compile time when used inside a `const { }` block.
#[derive(Debug, Clone, Copy)]
pub struct Config(pub(crate) ConfigBuilder);

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new().checked()
    }
}

impl Config {
    pub const fn timeout_us(&self) -> u32 {
        self.0.timeout_us
    }

    pub const fn poll_interval_us(&self) -> u32 {
        self.0.poll_interval_us
    }
}

// =============================================================================
// Switch sequence
// =============================================================================

/// Typestate markers for [`Switch`]. Each one is the post-condition of the step
/// that produces it.
mod state {
    /// Nothing assumed.
    pub struct Start;
    /// HS XOSC powered and stable.
    pub struct XoscStable;
    /// HS XOSC is the system clock, calibration running.
    pub struct OnXosc;
    /// Calibrated HS RCOSC is the system clock.
    pub struct OnRcosc;
}

use state::{OnRcosc, OnXosc, Start, XoscStable};

/// One pass through the switch sequence. Steps can only run in order, and the
/// crystal can only be powered down from [`OnRcosc`].
struct Switch<'a, R, D, S> {
    regs: &'a mut R,
    delay: &'a mut D,
    config: &'a Config,
    _state: PhantomData<S>,
}

impl<'a, R: ClockRegisters, D: DelayNs, S> Switch<'a, R, D, S> {
    fn into_state<T>(self) -> Switch<'a, R, D, T> {
        Switch {
            regs: self.regs,
            delay: self.delay,
            config: self.config,
            _state: PhantomData,
        }
    }

    /// Poll until `ready` holds, bounded by the configured timeout.
    fn wait_until<F>(&mut self, stage: Stage, mut ready: F) -> Result<(), Error>
    where
        F: FnMut(&R) -> bool,
    {
        let regs = &*self.regs;
        match blocking_wait_timeout(
            &mut *self.delay,
            || !ready(regs),
            self.config.timeout_us(),
            self.config.poll_interval_us(),
        ) {
            Ok(waited_us) => {
                trace!("rcc: {:?} after {} us", stage, waited_us);
                Ok(())
            }
            Err(timeout) => {
                error!("rcc: {:?} timed out after {} us", stage, timeout.waited_us);
                Err(Error::OscillatorStabilizationTimeout {
                    stage,
                    waited_us: timeout.waited_us,
                })
            }
        }
    }
}

impl<'a, R: ClockRegisters, D: DelayNs> Switch<'a, R, D, Start> {
    fn new(regs: &'a mut R, delay: &'a mut D, config: &'a Config) -> Self {
        Switch {
            regs,
            delay,
            config,
            _state: PhantomData,
        }
    }

    /// Power up the crystal and wait until it is stable.
    fn power_up_xosc(mut self) -> Result<Switch<'a, R, D, XoscStable>, Error> {
        self.regs.modify_sleep(|w| w.set_osc_pd(false));
        self.wait_until(Stage::CrystalStable, |r| r.read_sleep().xosc_stb())?;
        Ok(self.into_state())
    }
}

impl<'a, R: ClockRegisters, D: DelayNs> Switch<'a, R, D, XoscStable> {
    /// Select the crystal. Becoming the system clock starts RC calibration.
    fn select_xosc(mut self) -> Result<Switch<'a, R, D, OnXosc>, Error> {
        self.regs.modify_clkcon(|w| w.set_osc(Osc::Xosc));
        self.wait_until(Stage::SwitchToCrystal, |r| {
            r.read_clkcon().osc() == Osc::Xosc
        })?;
        Ok(self.into_state())
    }
}

impl<'a, R: ClockRegisters, D: DelayNs> Switch<'a, R, D, OnXosc> {
    /// Select the RC and the target divider in a single CLKCON write.
    ///
    /// The read-back of OSC=RC certifies that calibration of both RC oscillators
    /// has finished, that the RC is stable (SLEEP.HFRC_STB) and that the switch
    /// took effect.
    fn select_calibrated_rcosc(mut self) -> Result<Switch<'a, R, D, OnRcosc>, Error> {
        self.regs.modify_clkcon(|w| {
            w.set_osc(Osc::Rcosc);
            w.set_clkspd(TARGET_CLKSPD);
        });
        self.wait_until(Stage::SwitchToInternal, |r| {
            r.read_clkcon().osc() == Osc::Rcosc
        })?;
        Ok(self.into_state())
    }
}

impl<'a, R: ClockRegisters, D: DelayNs> Switch<'a, R, D, OnRcosc> {
    /// Power down the now unused crystal.
    fn power_down_xosc(self) -> ClockControl {
        self.regs.modify_sleep(|w| w.set_osc_pd(true));
        ClockControl::new()
    }
}

pub(crate) fn run_switch_sequence<R, D>(
    regs: &mut R,
    delay: &mut D,
    config: &Config,
) -> Result<ClockControl, Error>
where
    R: ClockRegisters,
    D: DelayNs,
{
    debug!("rcc: start, clkcon={:?} sleep={:?}", regs.read_clkcon(), regs.read_sleep());

    let clocks = Switch::new(regs, delay, config)
        .power_up_xosc()?
        .select_xosc()?
        .select_calibrated_rcosc()?
        .power_down_xosc();

    info!("rcc: calibrated HS RCOSC active, sysclk = {} Hz", TARGET_SYSCLK_FREQ.0);
    Ok(clocks)
}
