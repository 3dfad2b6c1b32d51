//! Hardware clock frequency read functions.
//!
//! These functions read the current clock configuration directly from the registers.
//! Nothing is cached: CLKCON.OSC is the only authority on the active source.

use super::{ClockRegisters, Clocks, Osc, CLK_HSRC_FREQ, CLK_REF_FREQ, CLK_XOSC_FREQ};
use crate::time::Hertz;

/// Get the active high-speed source.
pub fn get_clk_source<R: ClockRegisters>(regs: &R) -> Osc {
    regs.read_clkcon().osc()
}

/// Get current system clock frequency.
///
/// CLKSPD divides the reference frequency; the RC cannot run faster than its own
/// nominal rate, so CLKSPD=000 with the RC selected saturates at [`CLK_HSRC_FREQ`].
pub fn get_sysclk_freq<R: ClockRegisters>(regs: &R) -> Hertz {
    let clkcon = regs.read_clkcon();
    let divided = CLK_REF_FREQ / clkcon.clkspd();
    match clkcon.osc() {
        Osc::Xosc => divided.min(CLK_XOSC_FREQ),
        Osc::Rcosc => divided.min(CLK_HSRC_FREQ),
    }
}

/// Get current timer tick frequency.
pub fn get_tick_freq<R: ClockRegisters>(regs: &R) -> Hertz {
    CLK_REF_FREQ / regs.read_clkcon().tickspd()
}

/// HS XOSC is running: it is either the system clock or not powered down.
pub fn is_xosc_powered<R: ClockRegisters>(regs: &R) -> bool {
    get_clk_source(regs) == Osc::Xosc || !regs.read_sleep().osc_pd()
}

/// Read the current clock configuration and build a `Clocks` snapshot.
pub fn read_clocks_from_hw<R: ClockRegisters>(regs: &R) -> Clocks {
    let sleep = regs.read_sleep();
    Clocks {
        source: get_clk_source(regs),
        sysclk: get_sysclk_freq(regs),
        tick: get_tick_freq(regs),
        xosc_powered: is_xosc_powered(regs),
        xosc_stable: sleep.xosc_stb(),
        hsrc_stable: sleep.hfrc_stb(),
    }
}
