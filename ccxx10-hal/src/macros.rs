#![macro_use]

/// Single-bit field accessors on an 8-bit register value.
macro_rules! reg_bit {
    ($(#[$meta:meta])* $get:ident, $set:ident, $bit:expr) => {
        $(#[$meta])*
        #[inline(always)]
        pub const fn $get(&self) -> bool {
            (self.0 >> $bit) & 0x01 != 0
        }

        $(#[$meta])*
        #[inline(always)]
        pub fn $set(&mut self, val: bool) {
            self.0 = (self.0 & !(0x01 << $bit)) | ((val as u8) << $bit);
        }
    };
}

/// Read-only single-bit field. Writes through the register trait preserve
/// whatever the hardware reports.
macro_rules! reg_bit_ro {
    ($(#[$meta:meta])* $get:ident, $bit:expr) => {
        $(#[$meta])*
        #[inline(always)]
        pub const fn $get(&self) -> bool {
            (self.0 >> $bit) & 0x01 != 0
        }
    };
}

/// Multi-bit field backed by a `vals` enum with `from_bits`/`to_bits`.
macro_rules! reg_field {
    ($(#[$meta:meta])* $get:ident, $set:ident, $ty:ty, $offs:expr, $mask:expr) => {
        $(#[$meta])*
        #[inline(always)]
        pub const fn $get(&self) -> $ty {
            <$ty>::from_bits((self.0 >> $offs) & $mask)
        }

        $(#[$meta])*
        #[inline(always)]
        pub fn $set(&mut self, val: $ty) {
            self.0 = (self.0 & !($mask << $offs)) | ((val.to_bits() & $mask) << $offs);
        }
    };
}

/// Defines an 8-bit register value newtype with a reset value.
macro_rules! register {
    ($(#[$meta:meta])* $name:ident, reset = $reset:expr) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Eq, PartialEq)]
        pub struct $name(pub u8);

        impl $name {
            /// Hardware reset value.
            pub const RESET: Self = Self($reset);
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> $name {
                Self::RESET
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({:#04x})", stringify!($name), self.0)
            }
        }

        #[cfg(feature = "defmt")]
        impl defmt::Format for $name {
            fn format(&self, f: defmt::Formatter) {
                defmt::write!(f, "{}({=u8:#x})", stringify!($name), self.0)
            }
        }
    };
}
