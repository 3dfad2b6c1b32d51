//! Enumerated field values.

/// Power-of-two divider stored in a 3-bit field.
macro_rules! divider_enum {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $name {
            Div1 = 0,
            Div2 = 1,
            Div4 = 2,
            Div8 = 3,
            Div16 = 4,
            Div32 = 5,
            Div64 = 6,
            Div128 = 7,
        }

        impl $name {
            /// Every value, fastest first.
            pub const ALL: [Self; 8] = [
                Self::Div1,
                Self::Div2,
                Self::Div4,
                Self::Div8,
                Self::Div16,
                Self::Div32,
                Self::Div64,
                Self::Div128,
            ];

            #[inline(always)]
            pub const fn from_bits(val: u8) -> Self {
                Self::ALL[(val & 0x07) as usize]
            }

            #[inline(always)]
            pub const fn to_bits(self) -> u8 {
                self as u8
            }

            /// Division factor applied to the input clock.
            #[inline(always)]
            pub const fn divisor(self) -> u32 {
                1 << (self as u32)
            }
        }
    };
}

divider_enum!(
    /// CLKCON.CLKSPD: system clock divider, relative to the reference frequency.
    ClockSpeed
);

divider_enum!(
    /// CLKCON.TICKSPD: timer tick divider, relative to the reference frequency.
    ///
    /// Must not select a faster clock than CLKSPD.
    TickSpeed
);

divider_enum!(
    /// T3CTL.DIV: Timer 3 prescaler applied to the tick clock.
    T3Prescaler
);

/// CLKCON.OSC: high-speed system clock source.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Osc {
    /// HS XOSC, external crystal.
    Xosc = 0,
    /// HS RCOSC, internal RC oscillator.
    Rcosc = 1,
}

impl Osc {
    #[inline(always)]
    pub const fn from_bits(val: u8) -> Self {
        match val & 0x01 {
            0 => Self::Xosc,
            _ => Self::Rcosc,
        }
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u8 {
        self as u8
    }
}

/// CLKCON.OSC32K: 32 kHz clock source. Not managed by this crate, only preserved.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Osc32k {
    Xosc32k = 0,
    Rcosc32k = 1,
}

impl Osc32k {
    #[inline(always)]
    pub const fn from_bits(val: u8) -> Self {
        match val & 0x01 {
            0 => Self::Xosc32k,
            _ => Self::Rcosc32k,
        }
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u8 {
        self as u8
    }
}

/// SLEEP.MODE: power mode entered on the next `PCON.IDLE`.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    Pm0 = 0,
    Pm1 = 1,
    Pm2 = 2,
    Pm3 = 3,
}

impl PowerMode {
    #[inline(always)]
    pub const fn from_bits(val: u8) -> Self {
        match val & 0x03 {
            0 => Self::Pm0,
            1 => Self::Pm1,
            2 => Self::Pm2,
            _ => Self::Pm3,
        }
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u8 {
        self as u8
    }
}

/// SLEEP.RST: cause of the last reset.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetCause {
    PowerOn = 0,
    External = 1,
    Watchdog = 2,
    Reserved = 3,
}

impl ResetCause {
    #[inline(always)]
    pub const fn from_bits(val: u8) -> Self {
        match val & 0x03 {
            0 => Self::PowerOn,
            1 => Self::External,
            2 => Self::Watchdog,
            _ => Self::Reserved,
        }
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u8 {
        self as u8
    }
}

/// T3CTL.MODE: Timer 3 counting mode.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum T3Mode {
    /// Count 0x00..=0xFF, overflow back to 0x00.
    FreeRunning = 0,
    Down = 1,
    Modulo = 2,
    UpDown = 3,
}

impl T3Mode {
    #[inline(always)]
    pub const fn from_bits(val: u8) -> Self {
        match val & 0x03 {
            0 => Self::FreeRunning,
            1 => Self::Down,
            2 => Self::Modulo,
            _ => Self::UpDown,
        }
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u8 {
        self as u8
    }
}
