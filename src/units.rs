//! Conversions between engineering units and register codes.
//!
//! The carrier frequency register holds `Frf = F / Fstep` with
//! `Fstep = FXOSC / 2^19` (about 61 Hz). With a 32 MHz crystal that reduces to
//! `Frf = kHz * 2048 / 125`, which stays inside `u32` across the whole band.
//!
//! Output power on the PA1 stage is `-18 dBm + OutputPower`.

use crate::consts::{
    FREQUENCY_MAX_KHZ, FREQUENCY_MIN_KHZ, FXOSC_HZ, POWER_MAX_DBM, POWER_MIN_DBM,
};
use crate::registers::PA_LEVEL_PA1_ON;

/// Offset between the `OutputPower` field and dBm on PA1.
const PA1_POWER_OFFSET_DBM: i8 = 18;

/// Clamps a requested power to the PA1 range.
pub fn clamp_power(dbm: i8) -> i8 {
    dbm.clamp(POWER_MIN_DBM, POWER_MAX_DBM)
}

/// `RegPaLevel` value for a power, clamped to the PA1 range first.
pub fn encode_power(dbm: i8) -> u8 {
    PA_LEVEL_PA1_ON | (clamp_power(dbm) + PA1_POWER_OFFSET_DBM) as u8
}

/// Clamps a requested carrier to the SRD860 sub-band.
pub fn clamp_frequency(khz: u32) -> u32 {
    khz.clamp(FREQUENCY_MIN_KHZ, FREQUENCY_MAX_KHZ)
}

/// 24-bit `Frf` code for a frequency, clamped to the band first, as MSB, MID, LSB.
pub fn encode_frequency(khz: u32) -> [u8; 3] {
    let frf = ((clamp_frequency(khz) * 2048) + 62) / 125;
    [(frf >> 16) as u8, (frf >> 8) as u8, frf as u8]
}

/// Carrier in kHz for a 24-bit `Frf` code, rounded to the nearest kHz.
pub fn decode_frequency(frf: [u8; 3]) -> u32 {
    let code = u32::from(frf[0]) << 16 | u32::from(frf[1]) << 8 | u32::from(frf[2]);
    ((code * 125) + 1024) / 2048
}

/// Bit rate in bits per second for a `RegBitrate` code.
pub const fn bitrate_bps(code: u16) -> u32 {
    if code == 0 {
        return 0;
    }
    FXOSC_HZ / code as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_clamps_to_pa1_range() {
        assert_eq!(clamp_power(-50), -2);
        assert_eq!(clamp_power(99), 13);
        assert_eq!(clamp_power(7), 7);
        for dbm in i8::MIN..=i8::MAX {
            let applied = clamp_power(dbm);
            assert!((POWER_MIN_DBM..=POWER_MAX_DBM).contains(&applied));
        }
    }

    #[test]
    fn test_power_encoding() {
        assert_eq!(encode_power(0), 0x52);
        assert_eq!(encode_power(-2), 0x50);
        assert_eq!(encode_power(13), 0x5F);
    }

    #[test]
    fn test_encoders_clamp_out_of_range_input() {
        assert_eq!(encode_power(120), 0x5F);
        assert_eq!(encode_power(i8::MIN), 0x50);
        assert_eq!(encode_frequency(3_000_000), [0xD9, 0x80, 0x00]);
        assert_eq!(encode_frequency(u32::MAX), [0xD9, 0x80, 0x00]);
        assert_eq!(encode_frequency(0), [0xD7, 0xC0, 0x00]);
    }

    #[test]
    fn test_frequency_clamps_to_band() {
        assert_eq!(clamp_frequency(800_000), 863_000);
        assert_eq!(clamp_frequency(900_000), 870_000);
        assert_eq!(clamp_frequency(869_850), 869_850);
        assert_eq!(clamp_frequency(0), 863_000);
        assert_eq!(clamp_frequency(u32::MAX), 870_000);
    }

    #[test]
    fn test_frequency_encoding_reference_values() {
        assert_eq!(encode_frequency(869_850), [0xD9, 0x76, 0x66]);
        assert_eq!(encode_frequency(863_000), [0xD7, 0xC0, 0x00]);
        assert_eq!(encode_frequency(870_000), [0xD9, 0x80, 0x00]);
    }

    #[test]
    fn test_frequency_code_recovers_the_band() {
        for khz in (FREQUENCY_MIN_KHZ..=FREQUENCY_MAX_KHZ).step_by(7) {
            assert_eq!(decode_frequency(encode_frequency(khz)), khz);
        }
    }

    #[test]
    fn test_bitrate_from_code() {
        assert_eq!(bitrate_bps(0x0100), 125_000);
        assert_eq!(bitrate_bps(0x1A0B), 4_799);
        assert_eq!(bitrate_bps(0), 0);
    }
}
