//! Timing helpers for the hardware-sequenced send path.
//!
//! The chip finishes a transmission on its own; software only polls a status
//! flag. This module bounds that polling and estimates how long it should take:
//! - `poll_with_timeout`: drives an `nb` poll function with a `DelayNs` until it
//!   completes or a time budget runs out
//! - `transmit_time_us`: on-air time of a frame for a given bit rate
//! - `with_radio` and friends (feature `irq`): share a driver with an interrupt
//!   handler through `critical_section::Mutex`
//!
//! On-air time at the reference bit rate (125 kbps, 4 byte preamble):
//!
//! | Payload | On-air time |
//! |---------|-------------|
//! |       0 |      576 us |
//! |      16 |     1600 us |
//! |      64 |     4672 us |

use crate::units::bitrate_bps;

mod delay;
pub use delay::*;

#[cfg(feature = "irq")]
mod isr;
#[cfg_attr(feature = "irq", allow(unused_imports))]
#[cfg(feature = "irq")]
pub use isr::*;

/// Interval between two reads of the sequencer status while sending.
pub const SEND_POLL_INTERVAL_US: u32 = 100;

/// Sync word plus length byte plus CRC, in bytes.
const FRAME_OVERHEAD_BYTES: u32 = 2 + 1 + 2;

/// On-air time of one frame, in microseconds.
///
/// # Arguments
/// - `bitrate_code`: `RegBitrate` value (`FXOSC / bitrate`)
/// - `preamble_len`: preamble length in bytes
/// - `payload_len`: payload length in bytes, excluding the length byte
///
/// # Returns
/// The duration rounded up to the next microsecond, or `u32::MAX` for a zero bit rate.
pub fn transmit_time_us(bitrate_code: u16, preamble_len: u16, payload_len: usize) -> u32 {
    let bps = bitrate_bps(bitrate_code);
    if bps == 0 {
        return u32::MAX;
    }
    let bits = (u64::from(preamble_len) + u64::from(FRAME_OVERHEAD_BYTES) + payload_len as u64) * 8;
    let us = (bits * 1_000_000).div_ceil(u64::from(bps));
    u32::try_from(us).unwrap_or(u32::MAX)
}
