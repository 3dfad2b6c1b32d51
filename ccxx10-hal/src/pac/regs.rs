//! Register values.

use super::vals::{
    ClockSpeed, Osc, Osc32k, PowerMode, ResetCause, T3Mode, T3Prescaler, TickSpeed,
};

register!(
    /// Clock control.
    ///
    /// `osc` reads back the source that is currently active and stable, not the
    /// last requested one. A switch request is complete when the read-back matches.
    Clkcon,
    reset = 0xC9
);

impl Clkcon {
    reg_bit!(
        /// OSC32K: 32 kHz clock source, see [`Osc32k`].
        osc32k_bit, set_osc32k_bit, 7
    );

    reg_field!(
        /// OSC: high-speed system clock source.
        osc, set_osc, Osc, 6, 0x01
    );

    reg_field!(
        /// TICKSPD: timer tick output divider.
        tickspd, set_tickspd, TickSpeed, 3, 0x07
    );

    reg_field!(
        /// CLKSPD: system clock divider.
        clkspd, set_clkspd, ClockSpeed, 0, 0x07
    );

    #[inline(always)]
    pub const fn osc32k(&self) -> Osc32k {
        Osc32k::from_bits(self.osc32k_bit() as u8)
    }
}

register!(
    /// Sleep mode control. Also carries the oscillator power-down request and the
    /// oscillator stability flags.
    Sleep,
    reset = 0x04
);

impl Sleep {
    /// Bits the hardware owns; a write of this register leaves them untouched.
    pub const READ_ONLY_MASK: u8 = 0b0111_1000;

    reg_bit_ro!(
        /// XOSC_STB: HS XOSC is powered up and stable.
        xosc_stb, 6
    );

    reg_bit_ro!(
        /// HFRC_STB: HS RCOSC is powered up and stable.
        hfrc_stb, 5
    );

    reg_bit!(
        /// OSC_PD: power down the high-speed oscillator that is not selected by
        /// CLKCON.OSC. With the RC selected this is the crystal.
        osc_pd, set_osc_pd, 2
    );

    reg_field!(
        /// MODE: power mode.
        mode, set_mode, PowerMode, 0, 0x03
    );

    #[inline(always)]
    pub const fn rst(&self) -> ResetCause {
        ResetCause::from_bits((self.0 >> 3) & 0x03)
    }
}

register!(
    /// Timer 3 control.
    T3ctl,
    reset = 0x00
);

impl T3ctl {
    reg_field!(
        /// DIV: prescaler applied to the tick clock.
        div, set_div, T3Prescaler, 5, 0x07
    );

    reg_bit!(
        /// START: counter running.
        start, set_start, 4
    );

    reg_bit!(
        /// OVFIM: overflow interrupt mask.
        ovfim, set_ovfim, 3
    );

    reg_bit!(
        /// CLR: clear the counter. Always reads zero.
        clr, set_clr, 2
    );

    reg_field!(
        /// MODE: counting mode.
        mode, set_mode, T3Mode, 0, 0x03
    );
}

register!(
    /// Timer 1/3/4 interrupt flags.
    Timif,
    reset = 0x40
);

impl Timif {
    reg_bit!(
        /// T3OVFIF: Timer 3 overflow.
        t3ovfif, set_t3ovfif, 0
    );
}

register!(
    /// CPU interrupt flags 1. Also holds the DMA, Timer 1/2/4, port 0 and sleep
    /// timer flags.
    Ircon,
    reset = 0x00
);

impl Ircon {
    reg_bit!(
        /// T3IF: Timer 3 CPU interrupt flag.
        t3if, set_t3if, 3
    );

    reg_bit!(
        /// DMAIF: DMA complete. Shares the register with T3IF.
        dmaif, set_dmaif, 0
    );
}

register!(
    /// Interrupt enable 0.
    Ien0,
    reset = 0x00
);

impl Ien0 {
    reg_bit!(
        /// EA: global interrupt enable.
        ea, set_ea, 7
    );
}

register!(
    /// Interrupt enable 1.
    Ien1,
    reset = 0x00
);

impl Ien1 {
    reg_bit!(
        /// T3IE: Timer 3 interrupt enable.
        t3ie, set_t3ie, 3
    );
}
