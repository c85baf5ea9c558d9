//! # rfm69-link
//!
//! A portable, no_std Rust driver for HopeRF RFM69 (SX1231) FSK transceivers on the
//! 868 MHz SRD band.
//!
//! The chip does the heavy lifting in hardware: preamble, sync word, whitening,
//! CRC and address filtering all happen in its packet engine. This crate
//! programs a fixed operating profile over SPI and moves length-prefixed
//! payloads through the 66-byte FIFO:
//! - `embedded-hal` 1.0 `SpiDevice` for register access
//! - the chip's auto-mode sequencer to transmit without software timing
//! - bounded completion polling with `embedded_hal::delay::DelayNs`
//! - optional interrupt-safe sharing of the driver with `critical-section`
//!
//! ## Crate features
//! | Feature         | Description |
//! |-----------------|-------------|
//! | `std`           | Disables `#![no_std]` support and replaces `heapless::Vec`s with
//! `std::vec::Vec`s |
//! | `irq` (default) | Helpers to share the driver with an interrupt handler via `critical_section::Mutex` |
//! | `defmt-0-3`     | Uses `defmt` logging |
//! | `log`           | Uses `log` logging |
//!
//! ## Radio profile
//!
//! - FSK, Gaussian BT = 0.5, 250 kHz channel filter with low-beta AFC
//! - sync word `2D D4`, 4 byte preamble
//! - variable-length frames up to 64 bytes, whitened, CRC-16 checked
//! - node and broadcast (`0xFF`) address filtering
//! - 863 to 870 MHz, -2 to +13 dBm on PA1
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rfm69_link::driver::Rfm69;
//!
//! let mut radio = Rfm69::new(spi_device);
//! radio.configure(0x05)?;
//!
//! // first byte addresses the receiver
//! radio.send(&[0xFF, 0x01, 0x02], &mut delay, 10_000)?;
//!
//! if radio.packet_available()? {
//!     let packet = radio.receive(64)?;
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - `SpiDevice` owns chip select; one register access is one transaction
//! - Only one operation may be in flight at a time; the driver reports
//!   [`Error::Busy`] instead of queueing
//! - DIO0 is not used by the driver; wire it to an interrupt and use
//!   [`timer::with_radio`] if polling `packet_available` is too slow
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "irq")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod config;
pub mod consts;
pub mod driver;
pub mod error;
pub mod interface;
pub mod registers;
pub mod timer;
pub mod units;

pub use config::RadioConfig;
pub use driver::{Packet, RadioMode, Rfm69};
pub use error::Error;
