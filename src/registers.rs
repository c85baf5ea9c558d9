//! RFM69 register map and bit field definitions.
//!
//! Only the registers the driver touches are listed. Addresses are 7 bits
//! wide; the read/write bit is applied by
//! [`RegisterInterface`](crate::interface::RegisterInterface) and never by callers.

use bitflags::bitflags;

/// A register of the RFM69 register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// FIFO read/write access
    Fifo = 0x00,
    /// Operating mode and sequencer control
    OpMode = 0x01,
    /// Data processing mode, modulation type and shaping
    DataModul = 0x02,
    /// Bit rate setting, most significant bits
    BitrateMsb = 0x03,
    /// Bit rate setting, least significant bits
    BitrateLsb = 0x04,
    /// Frequency deviation, most significant bits
    FdevMsb = 0x05,
    /// Frequency deviation, least significant bits
    FdevLsb = 0x06,
    /// RF carrier frequency, most significant bits
    FrfMsb = 0x07,
    /// RF carrier frequency, intermediate bits
    FrfMid = 0x08,
    /// RF carrier frequency, least significant bits
    FrfLsb = 0x09,
    /// AFC control in low modulation index situations
    AfcCtrl = 0x0B,
    /// Chip version
    Version = 0x10,
    /// PA selection and output power
    PaLevel = 0x11,
    /// PA ramp time in FSK mode
    PaRamp = 0x12,
    /// LNA input impedance and gain
    Lna = 0x18,
    /// Channel filter bandwidth
    RxBw = 0x19,
    /// Channel filter bandwidth used during AFC
    AfcBw = 0x1A,
    /// RSSI value in -0.5 dBm steps
    RssiValue = 0x24,
    /// Mode and sequencer status flags
    IrqFlags1 = 0x27,
    /// FIFO and packet handler status flags
    IrqFlags2 = 0x28,
    /// RSSI trigger level
    RssiThresh = 0x29,
    /// Preamble length, most significant byte
    PreambleMsb = 0x2C,
    /// Preamble length, least significant byte
    PreambleLsb = 0x2D,
    /// Sync word recognition control
    SyncConfig = 0x2E,
    /// Sync word, first byte
    SyncValue1 = 0x2F,
    /// Sync word, second byte
    SyncValue2 = 0x30,
    /// Packet format, whitening, CRC and address filtering
    PacketConfig1 = 0x37,
    /// Maximum payload length in variable-length mode
    PayloadLength = 0x38,
    /// Node address for hardware address filtering
    NodeAddress = 0x39,
    /// Broadcast address for hardware address filtering
    BroadcastAddress = 0x3A,
    /// Automatic mode sequencer conditions
    AutoModes = 0x3B,
    /// TX start condition and FIFO threshold
    FifoThresh = 0x3C,
    /// Inter-packet RX delay and auto RX restart
    PacketConfig2 = 0x3D,
    /// Fading margin improvement
    TestDagc = 0x6F,
    /// AFC offset for low modulation index AFC
    TestAfc = 0x71,
}

impl Register {
    /// The 7-bit register address.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Operating modes written to `RegOpMode`, sequencer enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum OpMode {
    /// Lowest power, register contents retained
    Sleep,
    /// Crystal oscillator running
    Standby,
    /// Frequency synthesizer locked
    FrequencySynth,
    /// Transmitter active
    Transmitter,
    /// Receiver active
    Receiver,
}

impl OpMode {
    /// Register value for this mode with the automatic sequencer on and listen mode off.
    pub const fn bits(self) -> u8 {
        let mode: u8 = match self {
            OpMode::Sleep => 0b000,
            OpMode::Standby => 0b001,
            OpMode::FrequencySynth => 0b010,
            OpMode::Transmitter => 0b011,
            OpMode::Receiver => 0b100,
        };
        mode << 2
    }
}

bitflags! {
    /// `RegIrqFlags1` status bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags1: u8 {
        /// Operating mode change has completed
        const MODE_READY = 1 << 7;
        /// Receiver is ready
        const RX_READY = 1 << 6;
        /// Transmitter is ready
        const TX_READY = 1 << 5;
        /// PLL is locked
        const PLL_LOCK = 1 << 4;
        /// RSSI exceeded the threshold
        const RSSI = 1 << 3;
        /// RX timeout elapsed
        const TIMEOUT = 1 << 2;
        /// The auto-mode sequencer is in its intermediate mode
        const AUTO_MODE = 1 << 1;
        /// Sync word and address matched
        const SYNC_ADDRESS_MATCH = 1 << 0;
    }
}

bitflags! {
    /// `RegIrqFlags2` status bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags2: u8 {
        /// FIFO is full
        const FIFO_FULL = 1 << 7;
        /// FIFO holds at least one byte
        const FIFO_NOT_EMPTY = 1 << 6;
        /// FIFO level exceeds the threshold
        const FIFO_LEVEL = 1 << 5;
        /// FIFO overrun; writing a one clears the flag and empties the FIFO
        const FIFO_OVERRUN = 1 << 4;
        /// Complete packet has been sent
        const PACKET_SENT = 1 << 3;
        /// Complete payload received and ready in the FIFO
        const PAYLOAD_READY = 1 << 2;
        /// CRC of the received payload is valid
        const CRC_OK = 1 << 1;
    }
}

/// Event that moves the sequencer from the nominal mode into the intermediate mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum EnterCondition {
    /// Sequencer disabled
    Off,
    /// Rising edge of FifoNotEmpty
    FifoNotEmpty,
    /// Rising edge of FifoLevel
    FifoLevel,
    /// Rising edge of CrcOk
    CrcOk,
    /// Rising edge of PayloadReady
    PayloadReady,
    /// Rising edge of SyncAddress
    SyncAddress,
    /// Rising edge of PacketSent
    PacketSent,
    /// Falling edge of FifoNotEmpty
    FifoEmpty,
}

/// Event that returns the sequencer from the intermediate mode to the nominal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ExitCondition {
    /// Sequencer disabled
    Off,
    /// Falling edge of FifoNotEmpty
    FifoEmpty,
    /// Rising edge of FifoLevel or Timeout
    FifoLevel,
    /// Rising edge of CrcOk or Timeout
    CrcOk,
    /// Rising edge of PayloadReady or Timeout
    PayloadReady,
    /// Rising edge of SyncAddress or Timeout
    SyncAddress,
    /// Rising edge of PacketSent
    PacketSent,
    /// Rising edge of Timeout
    Timeout,
}

/// Mode the sequencer holds between the enter and exit conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum IntermediateMode {
    /// Sleep
    Sleep,
    /// Standby
    Standby,
    /// Receiver
    Receiver,
    /// Transmitter
    Transmitter,
}

/// An enter/exit condition pair for the auto-mode sequencer (`RegAutoModes`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct AutoModes {
    /// Condition that starts the intermediate mode
    pub enter: EnterCondition,
    /// Mode held until the exit condition
    pub intermediate: IntermediateMode,
    /// Condition that ends the intermediate mode
    pub exit: ExitCondition,
}

impl AutoModes {
    /// Sequencer disabled.
    pub const OFF: Self = Self {
        enter: EnterCondition::Off,
        intermediate: IntermediateMode::Sleep,
        exit: ExitCondition::Off,
    };

    /// Transmit as soon as the FIFO fills, fall back once the packet is sent.
    pub const SEND: Self = Self {
        enter: EnterCondition::FifoNotEmpty,
        intermediate: IntermediateMode::Transmitter,
        exit: ExitCondition::PacketSent,
    };

    /// Register encoding: enter in bits 7-5, exit in bits 4-2, intermediate mode in bits 1-0.
    pub const fn bits(self) -> u8 {
        let enter: u8 = match self.enter {
            EnterCondition::Off => 0b000,
            EnterCondition::FifoNotEmpty => 0b001,
            EnterCondition::FifoLevel => 0b010,
            EnterCondition::CrcOk => 0b011,
            EnterCondition::PayloadReady => 0b100,
            EnterCondition::SyncAddress => 0b101,
            EnterCondition::PacketSent => 0b110,
            EnterCondition::FifoEmpty => 0b111,
        };
        let exit: u8 = match self.exit {
            ExitCondition::Off => 0b000,
            ExitCondition::FifoEmpty => 0b001,
            ExitCondition::FifoLevel => 0b010,
            ExitCondition::CrcOk => 0b011,
            ExitCondition::PayloadReady => 0b100,
            ExitCondition::SyncAddress => 0b101,
            ExitCondition::PacketSent => 0b110,
            ExitCondition::Timeout => 0b111,
        };
        let intermediate: u8 = match self.intermediate {
            IntermediateMode::Sleep => 0b00,
            IntermediateMode::Standby => 0b01,
            IntermediateMode::Receiver => 0b10,
            IntermediateMode::Transmitter => 0b11,
        };
        (enter << 5) | (exit << 2) | intermediate
    }
}

/// `RegPaLevel`: PA1 enabled, the only stage the driver drives.
pub const PA_LEVEL_PA1_ON: u8 = 1 << 6;

/// `RegFifoThresh`: start transmitting as soon as the FIFO is not empty.
pub const FIFO_THRESH_TX_START_NOT_EMPTY: u8 = 1 << 7;
