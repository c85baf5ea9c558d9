//! Error type shared by every driver operation.

use thiserror::Error;

/// Errors reported by [`Rfm69`](crate::driver::Rfm69).
///
/// `E` is the error type of the underlying [`SpiDevice`](embedded_hal::spi::SpiDevice).
///
/// Only [`ChipNotDetected`](Error::ChipNotDetected) concerns configuration; the
/// packet-level variants are local to a single call and leave the driver usable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error<E> {
    /// The SPI transaction failed.
    #[error("SPI bus error")]
    Bus(E),

    /// The version register did not hold the expected chip identity.
    ///
    /// Nothing but the identity read has touched the chip, so configuration can
    /// simply be retried once the wiring is fixed.
    #[error("RFM69 not detected (version register read {found:#04x})")]
    ChipNotDetected {
        /// Value read from the version register
        found: u8,
    },

    /// An operation that needs a configured chip was called before
    /// [`configure`](crate::driver::Rfm69::configure) succeeded.
    #[error("radio has not been configured")]
    NotConfigured,

    /// A send or register change was requested while a packet is still in flight.
    #[error("a transmission is in progress")]
    Busy,

    /// The outbound payload exceeds the configured maximum payload length.
    #[error("payload of {len} bytes exceeds the {max} byte maximum")]
    PayloadTooLong {
        /// Requested payload length
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// The inbound length byte was zero.
    #[error("received frame announced an empty payload")]
    Truncated,

    /// The inbound length byte exceeded the caller's buffer size.
    #[error("received frame of {len} bytes exceeds the {max} byte limit")]
    Oversized {
        /// Announced payload length
        len: usize,
        /// Limit supplied by the caller
        max: usize,
    },

    /// The sequencer did not report the packet as sent within the timeout.
    #[error("transmission did not complete before the timeout")]
    SendTimeout,
}
