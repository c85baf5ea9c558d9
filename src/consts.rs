//! Constants used across the RFM69 driver.
//!
//! This module defines the chip identity, addressing, FIFO sizing and the
//! reference operating profile used by [`RadioConfig::default`](crate::config::RadioConfig).
//!
//! ## Key Concepts
//!
//! - **Identity**: the version register must read [`RFM69_VERSION`] before any
//!   other register is written.
//! - **Addressing**: the chip filters inbound frames on the node address or
//!   [`BROADCAST_ADDRESS`]; the driver never inspects an address byte itself.
//! - **Payload Limits**: the 66 byte FIFO holds the length byte plus at most
//!   [`MAX_PAYLOAD_LEN`] payload bytes in variable-length mode.
//! - **Band**: frequencies are clamped to the 863-870 MHz SRD860 sub-band and
//!   powers to the range of the PA1 amplifier stage.

/// Expected value of the version register (`RegVersion`, 0x10).
pub const RFM69_VERSION: u8 = 0x24;

/// Address accepted by every node's hardware address filter.
pub const BROADCAST_ADDRESS: u8 = u8::MAX;

/// Size of the chip FIFO in bytes.
pub const FIFO_SIZE: usize = 66;

/// Largest payload the driver will configure, send or accept by default.
///
/// In variable-length mode the length byte shares the FIFO with the payload,
/// so this is the largest payload that never overruns it.
pub const MAX_PAYLOAD_LEN: u8 = 64;

/// See [`MAX_PAYLOAD_LEN`](crate::consts::MAX_PAYLOAD_LEN)
pub const MAX_PAYLOAD_LEN_USIZE: usize = MAX_PAYLOAD_LEN as usize;

/// Largest length a length prefix byte can announce.
pub const PACKET_CAPACITY: usize = u8::MAX as usize;

/// Lower edge of the SRD860 sub-band, in kHz.
pub const FREQUENCY_MIN_KHZ: u32 = 863_000;

/// Upper edge of the SRD860 sub-band, in kHz.
pub const FREQUENCY_MAX_KHZ: u32 = 870_000;

/// Default carrier, centred in the 869.7-870.0 MHz sub-band.
pub const DEFAULT_FREQUENCY_KHZ: u32 = 869_850;

/// Lowest output power of the PA1 stage (0.6 mW).
pub const POWER_MIN_DBM: i8 = -2;

/// Highest output power of the PA1 stage (20 mW).
pub const POWER_MAX_DBM: i8 = 13;

/// Default output power.
pub const DEFAULT_POWER_DBM: i8 = 0;

/// Sync word transmitted after the preamble and matched by the receiver.
pub const SYNC_WORD: [u8; 2] = [0x2D, 0xD4];

/// Crystal oscillator frequency in Hz.
pub const FXOSC_HZ: u32 = 32_000_000;

/// RSSI level below which the channel counts as free, in dBm.
pub const CLEAR_CHANNEL_THRESHOLD_DBM: i16 = -80;
