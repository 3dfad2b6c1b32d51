use super::{CLK_REF_FREQ, TARGET_SYSCLK_FREQ};
use crate::time::Hertz;

macro_rules! define_clock_token {
    ($(#[$meta:meta])* $name:ident, $freq:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            _private: (),
        }
        impl $name {
            pub(crate) fn new() -> Self {
                Self { _private: () }
            }
            pub fn frequency(&self) -> Hertz {
                $freq
            }
        }
    };
}

define_clock_token!(
    /// System clock, running from the calibrated HS RCOSC at [`TARGET_SYSCLK_FREQ`].
    SysClk,
    TARGET_SYSCLK_FREQ
);
define_clock_token!(
    /// Reference clock divided by CLKCON.TICKSPD to produce the timer tick.
    RefClk,
    CLK_REF_FREQ
);

/// Clock tokens handed out by a successful oscillator bring-up.
///
/// Each field is a ZST token. They can only be obtained from
/// [`super::ensure_calibrated_internal_oscillator_active`], so anything that
/// derives timing from the system clock and takes one of these by reference
/// cannot be set up before the clock is stable.
#[derive(Debug)]
pub struct ClockControl {
    pub sysclk: SysClk,
    pub ref_clk: RefClk,
}

impl ClockControl {
    pub(crate) fn new() -> Self {
        Self {
            sysclk: SysClk::new(),
            ref_clk: RefClk::new(),
        }
    }
}
