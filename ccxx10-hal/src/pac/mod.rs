//! Peripheral access for the CC1110/CC1111/CC2510/CC2511 registers this crate uses.
//!
//! On these parts the SFR space (0x80..=0xFF) is mirrored in XDATA at
//! `0xDF00 + sfr`, so every register here is reachable with a plain volatile
//! byte access.

pub mod regs;
pub mod vals;

use crate::rcc::ClockRegisters;
use crate::timer::TimerRegisters;
use regs::{Clkcon, Ien0, Ien1, Ircon, Sleep, T3ctl, Timif};

/// XDATA address of SFR 0x00. Only 0x80..=0xFF are populated.
pub const XREG_SFR_BASE: usize = 0xDF00;

/// SFR addresses.
pub mod sfr {
    pub const IEN0: u8 = 0xA8;
    pub const IEN1: u8 = 0xB8;
    pub const SLEEP: u8 = 0xBE;
    pub const IRCON: u8 = 0xC0;
    pub const CLKCON: u8 = 0xC6;
    pub const T3CTL: u8 = 0xCB;
    pub const TIMIF: u8 = 0xD8;
}

/// Register file backed by volatile byte accesses at `base + sfr`.
///
/// XDATA has no bit access, so [`TimerRegisters::clear_t3ovfif`] and
/// [`TimerRegisters::clear_t3if`] are read-modify-writes here: a TIMIF or IRCON
/// flag raised between the read and the write is lost. Firmware that also
/// services Timer 1/2/4, DMA, port 0 or sleep timer interrupts should implement
/// [`TimerRegisters`] on bit-addressable SFR access instead.
pub struct Xreg {
    base: *mut u8,
}

impl Xreg {
    /// # Safety
    ///
    /// `base + 0x80 ..= base + 0xFF` must be valid for volatile reads and writes
    /// for as long as the returned value is used, and no other code may access the
    /// registers this crate manages in the meantime.
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self { base }
    }

    /// The XDATA SFR mirror of the chip.
    ///
    /// # Safety
    ///
    /// Only one `Xreg` may be in use at a time.
    pub const unsafe fn ccxx10() -> Self {
        Self::new(XREG_SFR_BASE as *mut u8)
    }

    #[inline(always)]
    fn read(&self, sfr: u8) -> u8 {
        unsafe { core::ptr::read_volatile(self.base.add(sfr as usize)) }
    }

    #[inline(always)]
    fn write(&mut self, sfr: u8, val: u8) {
        unsafe { core::ptr::write_volatile(self.base.add(sfr as usize), val) }
    }
}

impl ClockRegisters for Xreg {
    fn read_clkcon(&self) -> Clkcon {
        Clkcon(self.read(sfr::CLKCON))
    }

    fn write_clkcon(&mut self, val: Clkcon) {
        self.write(sfr::CLKCON, val.0)
    }

    fn read_sleep(&self) -> Sleep {
        Sleep(self.read(sfr::SLEEP))
    }

    fn write_sleep(&mut self, val: Sleep) {
        self.write(sfr::SLEEP, val.0)
    }
}

impl TimerRegisters for Xreg {
    fn read_t3ctl(&self) -> T3ctl {
        T3ctl(self.read(sfr::T3CTL))
    }

    fn write_t3ctl(&mut self, val: T3ctl) {
        self.write(sfr::T3CTL, val.0)
    }

    fn read_timif(&self) -> Timif {
        Timif(self.read(sfr::TIMIF))
    }

    fn write_timif(&mut self, val: Timif) {
        self.write(sfr::TIMIF, val.0)
    }

    fn read_ircon(&self) -> Ircon {
        Ircon(self.read(sfr::IRCON))
    }

    fn write_ircon(&mut self, val: Ircon) {
        self.write(sfr::IRCON, val.0)
    }

    fn read_ien0(&self) -> Ien0 {
        Ien0(self.read(sfr::IEN0))
    }

    fn write_ien0(&mut self, val: Ien0) {
        self.write(sfr::IEN0, val.0)
    }

    fn read_ien1(&self) -> Ien1 {
        Ien1(self.read(sfr::IEN1))
    }

    fn write_ien1(&mut self, val: Ien1) {
        self.write(sfr::IEN1, val.0)
    }

    fn clear_t3ovfif(&mut self) {
        self.modify_timif(|w| w.set_t3ovfif(false))
    }

    fn clear_t3if(&mut self) {
        self.modify_ircon(|w| w.set_t3if(false))
    }
}

#[cfg(test)]
mod tests {
    use super::vals::{ClockSpeed, Osc, TickSpeed};
    use super::*;

    #[test]
    fn xreg_hits_sfr_offsets() {
        let mut window = [0u8; 256];
        window[sfr::CLKCON as usize] = Clkcon::RESET.0;
        window[sfr::SLEEP as usize] = 0b0100_0100; // XOSC_STB | OSC_PD

        let mut regs = unsafe { Xreg::new(window.as_mut_ptr()) };
        assert_eq!(regs.read_clkcon().osc(), Osc::Rcosc);
        assert!(regs.read_sleep().xosc_stb());

        regs.modify_clkcon(|w| {
            w.set_osc(Osc::Xosc);
            w.set_clkspd(ClockSpeed::Div8);
        });
        regs.modify_sleep(|w| w.set_osc_pd(false));
        regs.modify_t3ctl(|w| w.set_start(true));
        drop(regs);

        // OSC32K=1, OSC=0, TICKSPD=001, CLKSPD=011
        assert_eq!(window[sfr::CLKCON as usize], 0b1000_1011);
        assert_eq!(window[sfr::SLEEP as usize], 0b0100_0000);
        assert_eq!(window[sfr::T3CTL as usize], 0b0001_0000);
    }

    #[test]
    fn xreg_flag_clears_keep_neighbour_bits() {
        let mut window = [0u8; 256];
        window[sfr::TIMIF as usize] = 0b0100_1001; // OVFIM | T4OVFIF | T3OVFIF
        window[sfr::IRCON as usize] = 0b0000_1001; // T3IF | DMAIF

        let mut regs = unsafe { Xreg::new(window.as_mut_ptr()) };
        regs.clear_t3ovfif();
        regs.clear_t3if();
        drop(regs);

        assert_eq!(window[sfr::TIMIF as usize], 0b0100_1000);
        assert_eq!(window[sfr::IRCON as usize], 0b0000_0001);
    }

    #[test]
    fn clkcon_reset_value_decodes() {
        let clkcon = Clkcon::RESET;
        assert_eq!(clkcon.osc(), Osc::Rcosc);
        assert_eq!(clkcon.osc32k(), vals::Osc32k::Rcosc32k);
        assert_eq!(clkcon.tickspd(), TickSpeed::Div2);
        assert_eq!(clkcon.clkspd(), ClockSpeed::Div2);
    }

    #[test]
    fn field_writes_stay_in_their_bits() {
        let mut clkcon = Clkcon(0xFF);
        clkcon.set_clkspd(ClockSpeed::Div1);
        assert_eq!(clkcon.0, 0xF8);
        clkcon.set_tickspd(TickSpeed::Div1);
        assert_eq!(clkcon.0, 0xC0);
        clkcon.set_osc(Osc::Xosc);
        assert_eq!(clkcon.0, 0x80);

        let mut sleep = Sleep(0x00);
        sleep.set_osc_pd(true);
        assert_eq!(sleep.0, 0x04);
        assert!(!sleep.xosc_stb());
    }
}
