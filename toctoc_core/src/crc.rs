/*!
# Toc Toc: CRC-16
*/

use crc::{
	Crc,
	CRC_16_XMODEM,
};



/// # CRC-16/CCITT.
///
/// Polynomial `0x1021`, zero init, no reflection. CD-Text stores the
/// _inverted_ result.
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// # PACK Size.
pub(crate) const PACK_SIZE: usize = 18;

/// # PACK Checksum Offset.
const PACK_CRC_AT: usize = PACK_SIZE - 2;



#[must_use]
/// # CRC-16.
///
/// Return the inverted CRC-16/CCITT checksum of `data`, as used by CD-Text.
///
/// ```
/// assert_eq!(toctoc_core::crc16(b"123456789"), 0xCE3C);
/// ```
pub fn crc16(data: &[u8]) -> u16 { ! CRC16.checksum(data) }

#[must_use]
/// # PACK CRC.
///
/// Return the checksum of the first sixteen bytes of a PACK.
pub fn pack_crc(pack: &[u8; PACK_SIZE]) -> u16 { crc16(&pack[..PACK_CRC_AT]) }

/// # Stamp PACK.
///
/// Compute the checksum and write it, big-endian, to the last two bytes.
pub fn stamp_pack(pack: &mut [u8; PACK_SIZE]) {
	let crc = pack_crc(pack);
	pack[PACK_CRC_AT..].copy_from_slice(&crc.to_be_bytes());
}

#[must_use]
/// # Verify PACK.
///
/// Returns `true` if the stored checksum matches the contents.
pub fn verify_pack(pack: &[u8; PACK_SIZE]) -> bool {
	pack_crc(pack).to_be_bytes() == pack[PACK_CRC_AT..]
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_crc16() {
		assert_eq!(crc16(b"123456789"), ! 0x31C3_u16, "Check value mismatch.");
		assert_eq!(crc16(&[]), 0xFFFF, "Empty checksum should be all ones.");
	}

	#[test]
	fn t_stamp() {
		let mut pack = [
			0x80, 0x00, 0x00, 0x00,
			b'A', b'l', b'b', b'u', b'm', 0, b'O', b'n', b'e', 0, b'T', b'w',
			0, 0,
		];
		assert!(! verify_pack(&pack), "Unstamped PACK should not verify.");

		stamp_pack(&mut pack);
		assert!(verify_pack(&pack), "Stamped PACK should verify.");
		assert_eq!(
			u16::from_be_bytes([pack[16], pack[17]]),
			crc16(&pack[..16]),
			"Checksum should be stored big-endian.",
		);

		pack[5] ^= 1;
		assert!(! verify_pack(&pack), "Altered PACK should not verify.");
	}
}
