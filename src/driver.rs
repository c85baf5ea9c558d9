//! RFM69 packet radio driver.
//!
//! This module provides the [`Rfm69`] struct, which programs an RFM69 into a
//! fixed FSK packet profile and exchanges length-prefixed frames through the
//! chip FIFO. The chip's packet handler does the framing work (preamble, sync
//! word, whitening, CRC, address filtering); the driver only moves bytes and
//! sequences operating modes.
//!
//! ## Operating modes
//!
//! Between operations the radio rests in [`RadioMode::Receiver`]. Sending goes
//! through the chip's auto-mode sequencer:
//!
//! 1. the driver switches to Standby and arms the sequencer with
//!    "enter Transmitter on FifoNotEmpty, exit on PacketSent"
//!    ([`RadioMode::ArmedForSend`]);
//! 2. writing the frame into the FIFO starts the transmission without any
//!    further software action ([`RadioMode::Transmitting`] once observed);
//! 3. when the sequencer drops out of its intermediate mode the driver
//!    re-enters Receiver.
//!
//! Reception needs no mode change: the chip raises PayloadReady and holds the
//! frame in the FIFO until it is read.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rfm69_link::driver::Rfm69;
//!
//! let mut radio = Rfm69::new(spi_device);
//! radio.configure(0x05)?;
//! let _ = radio.set_frequency(869_850)?;
//!
//! let timeout = 2 * radio.airtime_us(3) + 1_000;
//! radio.send(&[0x01, 0x02, 0x03], &mut delay, timeout)?;
//!
//! loop {
//!     if radio.packet_available()? {
//!         let packet = radio.receive(64)?;
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! The chip filters inbound frames on the byte following the length byte, so
//! the first payload byte of an outbound frame is the destination address.
//! The driver neither adds nor checks it.
//!
//! Nothing here is reentrant: every operation takes `&mut self`. To share the
//! driver with an interrupt handler see [`crate::timer::with_radio`].

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::config::RadioConfig;
use crate::consts::{PACKET_CAPACITY, RFM69_VERSION};
use crate::error::Error;
use crate::interface::RegisterInterface;
use crate::registers::{AutoModes, IrqFlags1, IrqFlags2, OpMode, Register};
use crate::timer::{SEND_POLL_INTERVAL_US, poll_with_timeout, transmit_time_us};
use crate::units::{clamp_frequency, clamp_power, decode_frequency, encode_frequency, encode_power};

/// A received payload, without its length byte.
#[cfg(not(feature = "std"))]
pub type Packet = Vec<u8, PACKET_CAPACITY>;

/// A received payload, without its length byte.
#[cfg(feature = "std")]
pub type Packet = Vec<u8>;

/// State of the chip as last commanded by the driver.
///
/// The nominal operating mode register does not tell the whole story once the
/// auto-mode sequencer is armed, so the armed conditions travel with the state.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RadioMode {
    /// Oscillator running, nothing on air. Power-on state of the chip.
    #[default]
    Standby,
    /// Listening with the sequencer off. The resting state between operations.
    Receiver,
    /// Sequencer armed and FIFO filled, transmission not yet observed.
    ArmedForSend(AutoModes),
    /// Sequencer observed in its Transmitter intermediate mode.
    Transmitting(AutoModes),
}

impl RadioMode {
    /// Whether a send is in flight.
    pub fn is_sending(&self) -> bool {
        matches!(self, RadioMode::ArmedForSend(_) | RadioMode::Transmitting(_))
    }
}

/// Driver for an RFM69 transceiver on an SPI bus.
///
/// ## Type Parameters
///
/// - `SPI`: An [`embedded_hal::spi::SpiDevice`] whose chip select drives the RFM69 `NSS`
///   pin, in SPI mode 0, MSB first, at up to 10 MHz.
///
/// ## Lifecycle
///
/// [`configure`](Rfm69::configure) must succeed before anything is sent or
/// received. Node address and profile are fixed until the next `configure`.
/// Power and frequency can be changed at any time in between, except while a
/// send is in flight.
#[derive(Debug)]
pub struct Rfm69<SPI> {
    regs: RegisterInterface<SPI>,
    mode: RadioMode,
    node_address: Option<u8>,
    max_payload: u8,
    power_dbm: i8,
    bitrate_code: u16,
    preamble_len: u16,
}

impl<SPI> Rfm69<SPI> {
    /// Creates an unconfigured driver. No bus traffic happens until
    /// [`configure`](Rfm69::configure) is called.
    pub fn new(spi: SPI) -> Self {
        let config = RadioConfig::default();
        Self {
            regs: RegisterInterface::new(spi),
            mode: RadioMode::Standby,
            node_address: None,
            max_payload: config.effective_max_payload(),
            power_dbm: config.power_dbm,
            bitrate_code: config.bitrate_code,
            preamble_len: config.preamble_len,
        }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.regs.release()
    }

    /// The state last commanded by the driver.
    pub fn mode(&self) -> RadioMode {
        self.mode
    }

    /// The node address, once configured.
    pub fn node_address(&self) -> Option<u8> {
        self.node_address
    }

    /// The output power last applied, in dBm.
    pub fn power(&self) -> i8 {
        self.power_dbm
    }

    /// The largest payload [`send`](Rfm69::send) accepts.
    pub fn max_payload(&self) -> usize {
        usize::from(self.max_payload)
    }

    /// Estimated on-air time of a payload with the configured bit rate and
    /// preamble, in microseconds. Useful for picking a `send` timeout.
    pub fn airtime_us(&self, payload_len: usize) -> u32 {
        transmit_time_us(self.bitrate_code, self.preamble_len, payload_len)
    }
}

impl<SPI> Rfm69<SPI>
where
    SPI: SpiDevice,
{
    /// Configures the chip with the reference profile and `node_address`.
    ///
    /// See [`configure_with`](Rfm69::configure_with).
    pub fn configure(&mut self, node_address: u8) -> Result<(), Error<SPI::Error>> {
        self.configure_with(node_address, &RadioConfig::default())
    }

    /// Configures the chip with a custom profile.
    ///
    /// # Behavior
    /// - Reads the version register. Anything but `0x24` fails with
    ///   [`Error::ChipNotDetected`] before a single register is written.
    /// - Writes the fixed profile (modulation, filters, sync word, packet
    ///   format, addressing, PA ramp, LNA), then power and frequency through
    ///   their clamping setters.
    /// - Leaves the radio in [`RadioMode::Receiver`].
    ///
    /// # Notes
    /// Re-running configuration is the only way to change the node address.
    /// An interrupted configuration leaves the driver unconfigured.
    pub fn configure_with(
        &mut self,
        node_address: u8,
        config: &RadioConfig,
    ) -> Result<(), Error<SPI::Error>> {
        let version = self.regs.read_register(Register::Version)?;
        if version != RFM69_VERSION {
            warn!("RFM69 not detected, version register reads {}", version);
            return Err(Error::ChipNotDetected { found: version });
        }
        debug!("RFM69 detected, version {}", version);

        self.node_address = None;
        for (reg, value) in config.register_profile(node_address) {
            self.regs.write_register(reg, value)?;
        }
        let _ = self.apply_power(config.power_dbm)?;
        let _ = self.apply_frequency(config.frequency_khz)?;
        self.max_payload = config.effective_max_payload();
        self.bitrate_code = config.bitrate_code;
        self.preamble_len = config.preamble_len;

        self.enter_receiver()?;
        self.node_address = Some(node_address);
        info!("RFM69 configured as node {}", node_address);
        Ok(())
    }

    /// Sets the output power.
    ///
    /// Requests outside -2..=13 dBm are clamped, not rejected.
    ///
    /// # Returns
    /// The power actually applied, in dBm.
    pub fn set_power(&mut self, dbm: i8) -> Result<i8, Error<SPI::Error>> {
        self.ensure_idle()?;
        self.apply_power(dbm)
    }

    /// Sets the carrier frequency.
    ///
    /// Requests outside 863 000..=870 000 kHz are clamped, not rejected.
    ///
    /// # Returns
    /// The frequency actually applied, in kHz.
    pub fn set_frequency(&mut self, khz: u32) -> Result<u32, Error<SPI::Error>> {
        self.ensure_idle()?;
        self.apply_frequency(khz)
    }

    /// Reads the carrier frequency back from the chip, in kHz.
    pub fn frequency(&mut self) -> Result<u32, Error<SPI::Error>> {
        let mut frf = [0u8; 3];
        self.regs.read(Register::FrfMsb, &mut frf)?;
        Ok(decode_frequency(frf))
    }

    /// Current RSSI in dBm. Only meaningful in [`RadioMode::Receiver`].
    pub fn rssi(&mut self) -> Result<i16, Error<SPI::Error>> {
        let raw = self.regs.read_register(Register::RssiValue)?;
        Ok(-i16::from(raw) / 2)
    }

    /// Whether the RSSI is below `threshold_dbm`, i.e. nobody else is transmitting.
    ///
    /// [`CLEAR_CHANNEL_THRESHOLD_DBM`](crate::consts::CLEAR_CHANNEL_THRESHOLD_DBM)
    /// is a reasonable threshold.
    pub fn channel_clear(&mut self, threshold_dbm: i16) -> Result<bool, Error<SPI::Error>> {
        self.ensure_idle()?;
        let rssi = self.rssi()?;
        trace!("channel RSSI {} dBm", rssi);
        Ok(rssi < threshold_dbm)
    }

    /// Sends a payload and blocks until the chip reports it sent, or `timeout_us` elapses.
    ///
    /// # Arguments
    /// - `payload`: At most [`max_payload`](Rfm69::max_payload) bytes. The
    ///   first byte is the destination address for the receiver's filter.
    /// - `delay`: Delay provider used between status polls.
    /// - `timeout_us`: Upper bound on the wait; see [`airtime_us`](Rfm69::airtime_us).
    ///
    /// # Errors
    /// - [`Error::PayloadTooLong`] before anything is written to the FIFO
    /// - [`Error::SendTimeout`] if the sequencer never exits; the transmission
    ///   is aborted, the FIFO flushed and the radio put back into Receiver
    /// - [`Error::Bus`] from any transfer; a send already handed to the
    ///   sequencer is aborted the same way before the error is returned
    pub fn send<D: DelayNs>(
        &mut self,
        payload: &[u8],
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<(), Error<SPI::Error>> {
        self.start_send(payload)?;
        match poll_with_timeout(delay, timeout_us, SEND_POLL_INTERVAL_US, || self.poll_send()) {
            Ok(Some(())) => Ok(()),
            Ok(None) => {
                warn!("send did not complete within {} us", timeout_us);
                self.abandon_send()?;
                Err(Error::SendTimeout)
            }
            Err(e) => {
                warn!("send failed while waiting for completion");
                let _ = self.abandon_send();
                Err(e)
            }
        }
    }

    /// Queues a payload and hands it to the sequencer without waiting.
    ///
    /// Completion is observed with [`poll_send`](Rfm69::poll_send).
    pub fn start_send(&mut self, payload: &[u8]) -> Result<(), Error<SPI::Error>> {
        self.ensure_idle()?;
        if payload.len() > self.max_payload() {
            return Err(Error::PayloadTooLong {
                len: payload.len(),
                max: self.max_payload(),
            });
        }

        self.enter_standby()?;
        // Armed before the FIFO fill: the enter condition is an edge.
        let auto = AutoModes::SEND;
        self.regs.write_register(Register::AutoModes, auto.bits())?;
        self.set_mode(RadioMode::ArmedForSend(auto));
        if let Err(e) = self.regs.write_fifo_frame(payload) {
            let _ = self.abandon_send();
            return Err(e);
        }
        trace!("queued {} byte payload", payload.len());
        Ok(())
    }

    /// Checks whether the send started by [`start_send`](Rfm69::start_send) has completed.
    ///
    /// # Returns
    /// - `Ok(())` once the packet is sent and the radio is back in Receiver,
    ///   or immediately if no send is in flight
    /// - `Err(nb::Error::WouldBlock)` while the chip is still busy
    ///
    /// On `Err(nb::Error::Other(_))` the send is still marked in flight; call
    /// [`abort_send`](Rfm69::abort_send) before the next operation.
    pub fn poll_send(&mut self) -> nb::Result<(), Error<SPI::Error>> {
        match self.mode {
            RadioMode::ArmedForSend(auto) => {
                if self.irq_flags1()?.contains(IrqFlags1::AUTO_MODE) {
                    self.set_mode(RadioMode::Transmitting(auto));
                    return Err(nb::Error::WouldBlock);
                }
                // Entered and left the intermediate mode between two polls.
                if !self.irq_flags2()?.contains(IrqFlags2::FIFO_NOT_EMPTY) {
                    self.finish_send()?;
                    return Ok(());
                }
                Err(nb::Error::WouldBlock)
            }
            RadioMode::Transmitting(_) => {
                if self.irq_flags1()?.contains(IrqFlags1::AUTO_MODE) {
                    return Err(nb::Error::WouldBlock);
                }
                self.finish_send()?;
                Ok(())
            }
            RadioMode::Standby | RadioMode::Receiver => Ok(()),
        }
    }

    /// Abandons an in-flight send: disarms the sequencer, flushes the FIFO and
    /// returns to Receiver. Does nothing if no send is in flight.
    pub fn abort_send(&mut self) -> Result<(), Error<SPI::Error>> {
        if !self.mode.is_sending() {
            return Ok(());
        }
        self.regs.write_register(Register::AutoModes, AutoModes::OFF.bits())?;
        self.regs.write_register(Register::IrqFlags2, IrqFlags2::FIFO_OVERRUN.bits())?;
        self.enter_receiver()
    }

    /// Aborts an in-flight send. If the abort itself fails the chip state is
    /// unknown, so the driver falls back to Standby; the next send rewrites
    /// both the operating mode and the sequencer anyway.
    fn abandon_send(&mut self) -> Result<(), Error<SPI::Error>> {
        let result = self.abort_send();
        if result.is_err() {
            self.set_mode(RadioMode::Standby);
        }
        result
    }

    /// Whether a complete payload is waiting in the FIFO.
    ///
    /// A plain status read; safe to call at any time.
    pub fn packet_available(&mut self) -> Result<bool, Error<SPI::Error>> {
        Ok(self.irq_flags2()?.contains(IrqFlags2::PAYLOAD_READY))
    }

    /// Reads the waiting payload out of the FIFO.
    ///
    /// Call after [`packet_available`](Rfm69::packet_available) returned `true`.
    ///
    /// # Errors
    /// - [`Error::Truncated`] if the length byte is zero
    /// - [`Error::Oversized`] if the length byte exceeds `max_size`; the
    ///   announced bytes are still drained so the next frame starts clean
    pub fn receive(&mut self, max_size: usize) -> Result<Packet, Error<SPI::Error>> {
        self.ensure_idle()?;
        let len = usize::from(self.regs.read_register(Register::Fifo)?);
        if len == 0 {
            warn!("dropping frame with zero length byte");
            return Err(Error::Truncated);
        }

        let mut buf = [0u8; PACKET_CAPACITY];
        self.regs.read_fifo(&mut buf[..len])?;
        if len > max_size {
            warn!("dropping {} byte frame, limit is {}", len, max_size);
            return Err(Error::Oversized { len, max: max_size });
        }
        to_packet(&buf[..len])
    }

    fn apply_power(&mut self, dbm: i8) -> Result<i8, Error<SPI::Error>> {
        let applied = clamp_power(dbm);
        if applied != dbm {
            warn!("power {} dBm out of range, using {} dBm", dbm, applied);
        }
        self.regs.write_register(Register::PaLevel, encode_power(applied))?;
        self.power_dbm = applied;
        Ok(applied)
    }

    fn apply_frequency(&mut self, khz: u32) -> Result<u32, Error<SPI::Error>> {
        let applied = clamp_frequency(khz);
        if applied != khz {
            warn!("frequency {} kHz out of band, using {} kHz", khz, applied);
        }
        // MSB, MID, LSB in one burst; the chip latches the carrier on the LSB.
        self.regs.write(Register::FrfMsb, &encode_frequency(applied))?;
        Ok(applied)
    }

    fn enter_receiver(&mut self) -> Result<(), Error<SPI::Error>> {
        self.regs.write_register(Register::OpMode, OpMode::Receiver.bits())?;
        self.regs.write_register(Register::AutoModes, AutoModes::OFF.bits())?;
        self.set_mode(RadioMode::Receiver);
        Ok(())
    }

    fn enter_standby(&mut self) -> Result<(), Error<SPI::Error>> {
        self.regs.write_register(Register::OpMode, OpMode::Standby.bits())?;
        self.set_mode(RadioMode::Standby);
        Ok(())
    }

    fn finish_send(&mut self) -> Result<(), Error<SPI::Error>> {
        debug!("packet sent");
        self.enter_receiver()
    }

    fn set_mode(&mut self, mode: RadioMode) {
        if self.mode != mode {
            debug!("mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn ensure_configured(&self) -> Result<(), Error<SPI::Error>> {
        match self.node_address {
            Some(_) => Ok(()),
            None => Err(Error::NotConfigured),
        }
    }

    fn ensure_idle(&self) -> Result<(), Error<SPI::Error>> {
        self.ensure_configured()?;
        if self.mode.is_sending() {
            return Err(Error::Busy);
        }
        Ok(())
    }

    fn irq_flags1(&mut self) -> Result<IrqFlags1, Error<SPI::Error>> {
        Ok(IrqFlags1::from_bits_truncate(
            self.regs.read_register(Register::IrqFlags1)?,
        ))
    }

    fn irq_flags2(&mut self) -> Result<IrqFlags2, Error<SPI::Error>> {
        Ok(IrqFlags2::from_bits_truncate(
            self.regs.read_register(Register::IrqFlags2)?,
        ))
    }
}

#[cfg(feature = "std")]
fn to_packet<E>(bytes: &[u8]) -> Result<Packet, Error<E>> {
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "std"))]
fn to_packet<E>(bytes: &[u8]) -> Result<Packet, Error<E>> {
    Packet::from_slice(bytes).map_err(|_| Error::Oversized {
        len: bytes.len(),
        max: PACKET_CAPACITY,
    })
}
