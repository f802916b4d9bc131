/*!
# Toc Toc: Multi-Session Info (Format 0001b)
*/

use crate::{
	Codec,
	TocEntry,
	TocTocError,
	wire,
};



/// # Total Size.
const SIZE: usize = 12;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Session Info.
///
/// This holds the first and last complete session numbers, and the number
/// and position of the first track in the last complete session.
///
/// ```
/// use toctoc_core::{Codec, Sessions};
///
/// let raw = [0, 10, 1, 2, 0, 0x14, 13, 0, 0, 2, 0x97, 0xF2];
/// let sessions = Sessions::deserialize(&raw).unwrap();
/// assert!(sessions.is_multisession());
/// assert_eq!(sessions.track_number(), 13);
/// assert_eq!(sessions.lba(), 169_970);
/// ```
pub struct Sessions {
	first_session: u8,
	last_session: u8,
	track_number: u8,
	entry: TocEntry,
}

impl Codec for Sessions {
	fn deserialize(src: &[u8]) -> Result<Self, TocTocError> {
		let (first, last, payload) = wire::read_header(src, SIZE - wire::HEADER_SIZE)?;
		let &[_, ac, num, _, a, b, c, d] = payload else {
			return Err(TocTocError::Corrupted);
		};

		Ok(Self {
			first_session: first,
			last_session: last,
			track_number: num,
			entry: TocEntry::new(ac >> 4, ac, u32::from_be_bytes([a, b, c, d])),
		})
	}

	fn serialized_len(&self) -> Result<usize, TocTocError> { Ok(SIZE) }

	fn serialize_into(&self, dst: &mut [u8]) -> Result<usize, TocTocError> {
		let len = wire::check_capacity(dst, SIZE)?;
		wire::write_header(dst, SIZE - wire::HEADER_SIZE, self.first_session, self.last_session)?;

		let [a, b, c, d] = self.entry.lba().to_be_bytes();
		dst[wire::HEADER_SIZE..len].copy_from_slice(&[
			0,
			self.entry.adr() << 4 | self.entry.control(),
			self.track_number,
			0,
			a, b, c, d,
		]);

		Ok(len)
	}
}

impl Sessions {
	#[must_use]
	/// # New.
	pub const fn new(first_session: u8, last_session: u8, track_number: u8, entry: TocEntry)
	-> Self {
		Self { first_session, last_session, track_number, entry }
	}

	#[must_use]
	/// # First Session.
	pub const fn first_session(&self) -> u8 { self.first_session }

	#[must_use]
	/// # Last Session.
	pub const fn last_session(&self) -> u8 { self.last_session }

	#[must_use]
	/// # First Track of the Last Session.
	pub const fn track_number(&self) -> u8 { self.track_number }

	#[must_use]
	/// # Entry.
	///
	/// The ADR, control, and LBA of the first track of the last session.
	pub const fn entry(&self) -> TocEntry { self.entry }

	#[must_use]
	/// # ADR.
	pub const fn adr(&self) -> u8 { self.entry.adr() }

	#[must_use]
	/// # Control.
	pub const fn control(&self) -> u8 { self.entry.control() }

	#[must_use]
	/// # LBA.
	pub const fn lba(&self) -> u32 { self.entry.lba() }

	#[must_use]
	/// # Multi-Session?
	pub const fn is_multisession(&self) -> bool { self.first_session < self.last_session }
}



#[cfg(test)]
mod test {
	use super::*;

	const RAW: [u8; SIZE] = [0, 10, 1, 2, 0, 0x14, 13, 0, 0, 2, 0x97, 0xF2];

	#[test]
	fn t_sessions() {
		let s = Sessions::deserialize(&RAW).expect("Sessions failed.");
		assert_eq!(s.first_session(), 1);
		assert_eq!(s.last_session(), 2);
		assert_eq!(s.track_number(), 13);
		assert_eq!(s.adr(), 1);
		assert_eq!(s.control(), 4);
		assert!(s.entry().is_data());
		assert_eq!(s.lba(), 169_970);
		assert!(s.is_multisession());

		assert_eq!(s.serialize().as_deref(), Ok(&RAW[..]), "Round trip failed.");

		let mut buf = [0_u8; SIZE - 1];
		assert_eq!(s.serialize_into(&mut buf), Err(TocTocError::TooSmall(SIZE)));

		let single = Sessions::new(1, 1, 1, TocEntry::audio(0));
		assert!(! single.is_multisession());
	}

	#[test]
	fn t_sessions_bad() {
		assert_eq!(Sessions::deserialize(&RAW[..11]), Err(TocTocError::Truncated));

		// Two descriptors is too many.
		let mut raw = [0_u8; 20];
		raw[..SIZE].copy_from_slice(&RAW);
		raw[1] = 18;
		assert_eq!(Sessions::deserialize(&raw), Err(TocTocError::Corrupted));

		// Not a multiple.
		let mut raw = RAW;
		raw[1] = 9;
		assert_eq!(Sessions::deserialize(&raw), Err(TocTocError::Corrupted));

		// Empty.
		assert_eq!(Sessions::deserialize(&[0, 2, 1, 1]), Err(TocTocError::Corrupted));
	}
}
