//! Time units

/// Hertz
///
/// Divide by a [`ClockSpeed`](crate::rcc::ClockSpeed) or
/// [`TickSpeed`](crate::rcc::TickSpeed) to get a divided clock.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub u32);
