#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]
#![allow(unsafe_op_in_unsafe_fn)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod macros;

mod utils;

pub mod pac;
pub mod rcc;
pub mod time;
pub mod timer;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

use embedded_hal_1::delay::DelayNs;

/// HAL configuration for CCxx10 parts
pub mod config {
    use crate::rcc;

    /// HAL configuration passed when initializing.
    #[non_exhaustive]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Config {
        pub rcc: rcc::Config,
    }

    impl Config {
        pub const fn new(rcc: rcc::Config) -> Self {
            Self { rcc }
        }
    }
}
pub use config::Config;

/// Bring the system clock up on the calibrated internal RC oscillator.
///
/// Runs the switch sequence with interrupts masked, so no handler can observe
/// the crystal as system clock or reprogram CLKCON halfway through. Call once at
/// startup, before any timer, radio or UART is configured.
///
/// ```rust,ignore
/// let mut regs = unsafe { ccxx10_hal::pac::Xreg::ccxx10() };
/// let clocks = ccxx10_hal::init(&mut regs, &mut delay, Default::default())?;
/// ```
pub fn init<R, D>(
    regs: &mut R,
    delay: &mut D,
    config: Config,
) -> Result<rcc::ClockControl, rcc::Error>
where
    R: rcc::ClockRegisters,
    D: DelayNs,
{
    let clocks = critical_section::with(|cs| {
        rcc::ensure_calibrated_internal_oscillator_active_with_cs(cs, regs, delay, &config.rcc)
    })?;
    rcc::print_clocks(&*regs);
    Ok(clocks)
}
