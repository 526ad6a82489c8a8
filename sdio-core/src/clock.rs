//! SDIO card clock negotiation
//!
//! The host controller derives the card clock as
//! `SDIO_CK = SDIOCLK / (CLKDIV + 2)`. These functions pick the smallest
//! divider that keeps the card clock at or below the requested rate.
//!
//! # Constraints
//!
//! - The card clock may not exceed 8/3 of PCLK2 (reference manual, SDIO
//!   adapter clock domain crossing)
//! - The adapter tops out at 48 MHz
//! - Card identification must run at 400 kHz or less

use sdio_hal::{ClockDivider, PeripheralClocks};

/// SDIO adapter clock ceiling (SDIOCLK)
pub const SDIO_MAX_CLOCK_HZ: u32 = 48_000_000;

/// Maximum card clock during identification
pub const IDENTIFICATION_CLOCK_HZ: u32 = 400_000;

/// Identification divider for a 48 MHz adapter clock: 48 MHz / (118 + 2) = 400 kHz
pub const INIT_CLOCK_DIVIDER: ClockDivider = ClockDivider(118);

/// Default transfer clock
pub const DEFAULT_TRANSFER_CLOCK_HZ: u32 = 18_000_000;

/// Width of the CLKDIV field in CLKCR
pub const CLKDIV_BITS: u32 = 8;

/// Highest card clock the hardware allows for these bus clocks
///
/// `min(target, pclk2 * 8 / 3, 48 MHz)`. Computed in 64 bits; the 8/3
/// product never overflows.
pub fn effective_target(target_hz: u32, clocks: PeripheralClocks) -> u32 {
    let pclk2_limit = (clocks.pclk2_hz as u64 * 8 / 3).min(u32::MAX as u64) as u32;
    target_hz.min(pclk2_limit).min(SDIO_MAX_CLOCK_HZ)
}

/// Compute the clock divider for a target card clock
///
/// Rounds the division up so the card is never clocked above what it
/// supports, then subtracts the 2 the hardware adds back. The result is the
/// smallest divider with `input / (divider + 2) <= effective target`.
///
/// Never fails. When the input is less than twice the target the divider
/// saturates at 0 (the lowest non-bypass setting). A zero effective target
/// (e.g. `pclk2_hz == 0`) yields the largest divider.
pub fn compute_divider(target_hz: u32, clocks: PeripheralClocks) -> ClockDivider {
    let target = effective_target(target_hz, clocks);
    if target == 0 {
        return ClockDivider(u32::MAX);
    }

    let ratio = clocks.input_hz.div_ceil(target);
    ClockDivider(ratio.saturating_sub(2))
}

/// Divider for the identification clock (400 kHz or less)
///
/// Identification only depends on the adapter clock, not on PCLK2. For
/// a 48 MHz adapter clock this is [`INIT_CLOCK_DIVIDER`]. Returns `None`
/// when the divider does not fit the CLKDIV field (adapter clock above
/// 257 × 400 kHz), since any value that fits would overclock the card.
pub fn identification_divider(input_hz: u32) -> Option<ClockDivider> {
    let ratio = input_hz.div_ceil(IDENTIFICATION_CLOCK_HZ);
    let divider = ClockDivider(ratio.saturating_sub(2));
    (divider.clamped(CLKDIV_BITS) == divider).then_some(divider)
}
