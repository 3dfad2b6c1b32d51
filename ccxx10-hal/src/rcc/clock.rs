//! Clock types and constants.

pub use crate::pac::vals::{ClockSpeed, Osc, TickSpeed};

use crate::time::Hertz;
use core::ops;

// =============================================================================
// Constants
// =============================================================================

#[cfg(any(
    all(feature = "cc1110", any(feature = "cc2510", feature = "cc1111", feature = "cc2511")),
    all(feature = "cc2510", any(feature = "cc1111", feature = "cc2511")),
    all(feature = "cc1111", feature = "cc2511"),
))]
compile_error!("You may enable at most one chip feature (cc1110, cc2510, cc1111, cc2511).");

cfg_if::cfg_if! {
    if #[cfg(any(feature = "cc1111", feature = "cc2511"))] {
        /// Reference frequency divided by CLKSPD and TICKSPD (48 MHz HS XOSC, halved).
        pub const CLK_REF_FREQ: Hertz = Hertz(24_000_000);
    } else {
        /// Reference frequency divided by CLKSPD and TICKSPD (26 MHz HS XOSC).
        ///
        /// CC1110 and CC2510, also used when no chip feature is enabled.
        pub const CLK_REF_FREQ: Hertz = Hertz(26_000_000);
    }
}

/// HS XOSC as seen by the system clock mux.
pub const CLK_XOSC_FREQ: Hertz = CLK_REF_FREQ;
// NOTE: requires calibration to be accurate
pub const CLK_HSRC_FREQ: Hertz = Hertz(CLK_REF_FREQ.0 / 2);

/// System clock divider applied once the calibrated RC is active.
pub const TARGET_CLKSPD: ClockSpeed = ClockSpeed::Div8;
/// System clock frequency guaranteed after a successful bring-up.
pub const TARGET_SYSCLK_FREQ: Hertz = Hertz(CLK_REF_FREQ.0 >> TARGET_CLKSPD.to_bits());

/// HS RCOSC calibration time after the crystal becomes the system clock.
pub const HSRC_CALIBRATION_US: u32 = 65;
/// LS RCOSC calibration time; the switch back waits for both.
pub const LSRC_CALIBRATION_US: u32 = 2_000;
/// Worst case from selecting the crystal until the RC may be selected again.
pub const CALIBRATION_WORST_CASE_US: u32 = HSRC_CALIBRATION_US + LSRC_CALIBRATION_US;

/// Default bound for a single stabilization wait, 10x the documented worst case.
pub const DEFAULT_TIMEOUT_US: u32 = 10 * CALIBRATION_WORST_CASE_US;
/// Default pause between two status reads.
pub const DEFAULT_POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// Divider operator impls
// =============================================================================

#[allow(clippy::suspicious_arithmetic_impl)]
impl ops::Div<ClockSpeed> for Hertz {
    type Output = Hertz;
    fn div(self, rhs: ClockSpeed) -> Self::Output {
        Hertz(self.0 >> rhs.to_bits())
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl ops::Div<TickSpeed> for Hertz {
    type Output = Hertz;
    fn div(self, rhs: TickSpeed) -> Self::Output {
        Hertz(self.0 >> rhs.to_bits())
    }
}

// =============================================================================
// Clocks struct
// =============================================================================

/// Snapshot of the clock configuration, as read back from the registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clocks {
    /// Active high-speed source (CLKCON.OSC read-back).
    pub source: Osc,
    pub sysclk: Hertz,
    /// Timer tick clock (CLKCON.TICKSPD).
    pub tick: Hertz,
    /// HS XOSC powered, either selected or not powered down.
    pub xosc_powered: bool,
    pub xosc_stable: bool,
    pub hsrc_stable: bool,
}

impl Clocks {
    /// `true` when the registers show the post-condition of a bring-up:
    /// RC selected at the target divider and the crystal powered down.
    pub fn is_calibrated_rc_target(&self) -> bool {
        self.source == Osc::Rcosc && self.sysclk == TARGET_SYSCLK_FREQ && !self.xosc_powered
    }
}
