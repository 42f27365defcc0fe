#![cfg_attr(not(test), no_std)]

use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "board")]
use defmt_rtt as _; // global logger
#[cfg(feature = "board")]
use panic_probe as _;

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod export;
pub mod hw;
pub mod input;
pub mod painter;
pub mod session;
pub mod toolbar;

#[cfg(test)]
mod testing;

static TICKS: AtomicUsize = AtomicUsize::new(0);

#[cfg(feature = "defmt")]
defmt::timestamp!("{=usize}ms", uptime_ms());

/// Milliseconds since the poll timer started, as counted by scheduler ticks.
pub fn uptime_ms() -> usize {
    ticks_to_ms(TICKS.load(Ordering::Relaxed))
}

// wraps together with the tick counter instead of overflowing
fn ticks_to_ms(ticks: usize) -> usize {
    ticks.wrapping_mul(config::Timing::TICK_MS as usize)
}

// Cortex-M0+ has no atomic read-modify-write
pub(crate) fn advance_ticks() {
    let n = TICKS.load(Ordering::Relaxed);
    TICKS.store(n.wrapping_add(1), Ordering::Relaxed);
}

/// Stops the application for good, e.g. when the touch controller is missing.
#[cfg(feature = "board")]
pub fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
