//! Operating profile programmed by [`Rfm69::configure`](crate::driver::Rfm69::configure).
//!
//! The defaults describe the reference link: packet mode FSK with Gaussian
//! shaping (BT = 0.5), a 250 kHz channel filter, the `2D D4` sync word,
//! whitening and CRC, variable-length frames filtered on node or broadcast
//! address, on 869.85 MHz at 0 dBm.
//!
//! Preamble length and the RSSI/AFC tuning values differ between deployments
//! and are not needed for interoperability, so they are exposed as setters.

use crate::consts::{
    BROADCAST_ADDRESS, DEFAULT_FREQUENCY_KHZ, DEFAULT_POWER_DBM, MAX_PAYLOAD_LEN, SYNC_WORD,
};
use crate::registers::{FIFO_THRESH_TX_START_NOT_EMPTY, Register};

/// Number of fixed register writes in [`RadioConfig::register_profile`].
pub const PROFILE_LEN: usize = 24;

/// `RegDataModul`: packet mode, FSK, Gaussian filter BT = 0.5.
const DATA_MODUL: u8 = (0 << 5) | (0 << 3) | 2;

/// `RegRxBw` / `RegAfcBw`: DccFreq = 2, RxBwMant = 16, RxBwExp = 1 (250 kHz).
const CHANNEL_FILTER_250KHZ: u8 = (2 << 5) | (0 << 3) | 1;

/// `RegAfcCtrl`: AfcLowBetaOn.
const AFC_LOW_BETA_ON: u8 = 1 << 5;

/// `RegSyncConfig`: sync on, FIFO filled on sync address, 2 byte sync word, no tolerance.
const SYNC_CONFIG: u8 = (1 << 7) | (0 << 6) | (((SYNC_WORD.len() as u8) - 1) << 3);

/// `RegPacketConfig1`: variable length, whitening, CRC on, CrcAutoClearOff = 0,
/// address filtering on node or broadcast address.
const PACKET_CONFIG1: u8 = (1 << 7) | (2 << 5) | (1 << 4) | (0 << 3) | (2 << 1);

/// `RegPacketConfig2`: inter-packet RX delay of 2^3 bits, AutoRxRestartOn.
const PACKET_CONFIG2: u8 = (3 << 4) | (1 << 1);

/// `RegLna`: 200 ohm input impedance, gain set by the AGC.
const LNA_200_OHM_AGC: u8 = 1 << 7;

/// Tunable parameters of the operating profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RadioConfig {
    /// Carrier frequency in kHz, clamped to the SRD860 band when applied
    pub frequency_khz: u32,
    /// Output power in dBm, clamped to the PA1 range when applied
    pub power_dbm: i8,
    /// `RegBitrate` code (`FXOSC / bitrate`)
    pub bitrate_code: u16,
    /// `RegFdev` code (`deviation / Fstep`)
    pub fdev_code: u16,
    /// Preamble length in bytes
    pub preamble_len: u16,
    /// Largest payload accepted on receive and allowed on send
    pub max_payload: u8,
    /// `RegRssiThresh` code (`-value / 2` dBm)
    pub rssi_threshold: u8,
    /// `RegTestAfc` low-beta AFC offset
    pub afc_low_beta_offset: u8,
    /// `RegTestDagc` fading margin setting
    pub dagc: u8,
    /// `RegPaRamp` code (9 is 40 us)
    pub pa_ramp: u8,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency_khz: DEFAULT_FREQUENCY_KHZ,
            power_dbm: DEFAULT_POWER_DBM,
            bitrate_code: 0x0100,
            fdev_code: 0x0200,
            preamble_len: 4,
            max_payload: MAX_PAYLOAD_LEN,
            rssi_threshold: 0xE4,
            afc_low_beta_offset: 25,
            dagc: 0x20,
            pa_ramp: 9,
        }
    }
}

impl RadioConfig {
    /// Sets the carrier frequency in kHz.
    pub fn with_frequency_khz(mut self, khz: u32) -> Self {
        self.frequency_khz = khz;
        self
    }

    /// Sets the output power in dBm.
    pub fn with_power_dbm(mut self, dbm: i8) -> Self {
        self.power_dbm = dbm;
        self
    }

    /// Sets the preamble length in bytes.
    pub fn with_preamble_len(mut self, bytes: u16) -> Self {
        self.preamble_len = bytes;
        self
    }

    /// Sets the maximum payload length, capped at [`MAX_PAYLOAD_LEN`].
    pub fn with_max_payload(mut self, len: u8) -> Self {
        self.max_payload = len.min(MAX_PAYLOAD_LEN);
        self
    }

    /// Sets the `RegRssiThresh` code.
    pub fn with_rssi_threshold(mut self, code: u8) -> Self {
        self.rssi_threshold = code;
        self
    }

    /// Sets the low-beta AFC offset.
    pub fn with_afc_low_beta_offset(mut self, offset: u8) -> Self {
        self.afc_low_beta_offset = offset;
        self
    }

    /// Maximum payload length after the FIFO cap.
    pub fn effective_max_payload(&self) -> u8 {
        self.max_payload.min(MAX_PAYLOAD_LEN)
    }

    /// Fixed register writes of the profile, in programming order.
    ///
    /// Power and frequency are not part of the table; they are applied through
    /// the clamping setters afterwards.
    pub fn register_profile(&self, node_address: u8) -> [(Register, u8); PROFILE_LEN] {
        let [bitrate_msb, bitrate_lsb] = self.bitrate_code.to_be_bytes();
        let [fdev_msb, fdev_lsb] = self.fdev_code.to_be_bytes();
        let [preamble_msb, preamble_lsb] = self.preamble_len.to_be_bytes();
        [
            (Register::DataModul, DATA_MODUL),
            (Register::BitrateMsb, bitrate_msb),
            (Register::BitrateLsb, bitrate_lsb),
            (Register::FdevMsb, fdev_msb),
            (Register::FdevLsb, fdev_lsb),
            (Register::RxBw, CHANNEL_FILTER_250KHZ),
            (Register::AfcBw, CHANNEL_FILTER_250KHZ),
            (Register::AfcCtrl, AFC_LOW_BETA_ON),
            (Register::TestDagc, self.dagc),
            (Register::TestAfc, self.afc_low_beta_offset),
            (Register::SyncConfig, SYNC_CONFIG),
            (Register::SyncValue1, SYNC_WORD[0]),
            (Register::SyncValue2, SYNC_WORD[1]),
            (Register::RssiThresh, self.rssi_threshold),
            (Register::PreambleMsb, preamble_msb),
            (Register::PreambleLsb, preamble_lsb),
            (Register::PaRamp, self.pa_ramp),
            (Register::PacketConfig1, PACKET_CONFIG1),
            (Register::PacketConfig2, PACKET_CONFIG2),
            (Register::PayloadLength, self.effective_max_payload()),
            (Register::NodeAddress, node_address),
            (Register::BroadcastAddress, BROADCAST_ADDRESS),
            (Register::FifoThresh, FIFO_THRESH_TX_START_NOT_EMPTY),
            (Register::Lna, LNA_200_OHM_AGC),
        ]
    }
}
