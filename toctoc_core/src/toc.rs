/*!
# Toc Toc: Table of Contents (Format 0000b)
*/

use crate::{
	CD_LEADOUT_TRACK,
	CD_MAX_TRACK,
	Codec,
	CONTROL_DATA,
	Msf,
	TocTocError,
	TRACK_SLOTS,
	wire,
};



/// # Descriptor Size.
const DESCRIPTOR_SIZE: usize = 8;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # TOC Entry.
///
/// The ADR and control nibbles and starting LBA of a single track (or the
/// lead-out).
pub struct TocEntry {
	adr: u8,
	control: u8,
	lba: u32,
}

impl TocEntry {
	#[must_use]
	/// # New.
	///
	/// Only the low four bits of `adr` and `control` are kept.
	pub const fn new(adr: u8, control: u8, lba: u32) -> Self {
		Self {
			adr: adr & 0x0F,
			control: control & 0x0F,
			lba,
		}
	}

	#[must_use]
	/// # New Audio Entry.
	///
	/// ADR 1 (current position), no control flags.
	pub const fn audio(lba: u32) -> Self { Self::new(1, 0, lba) }

	#[must_use]
	/// # New Data Entry.
	///
	/// ADR 1 (current position), data control flag.
	pub const fn data(lba: u32) -> Self { Self::new(1, CONTROL_DATA, lba) }

	#[must_use]
	/// # ADR.
	pub const fn adr(self) -> u8 { self.adr }

	#[must_use]
	/// # Control.
	pub const fn control(self) -> u8 { self.control }

	#[must_use]
	/// # LBA.
	pub const fn lba(self) -> u32 { self.lba }

	#[must_use]
	/// # MSF.
	pub const fn msf(self) -> Msf { Msf::from_lba(self.lba) }

	#[must_use]
	/// # Is Data?
	pub const fn is_data(self) -> bool { CONTROL_DATA == self.control & CONTROL_DATA }

	#[must_use]
	/// # To Bytes.
	const fn to_bytes(self, num: u8) -> [u8; DESCRIPTOR_SIZE] {
		let [a, b, c, d] = self.lba.to_be_bytes();
		[0, self.adr << 4 | self.control, num, 0, a, b, c, d]
	}
}



#[derive(Debug, Clone, Eq, Hash, PartialEq)]
/// # Table of Contents.
///
/// This holds the basic track map of a disc: the first and last track
/// numbers, and the position of each track and the lead-out.
///
/// ```
/// use toctoc_core::{Codec, Toc, TocEntry};
///
/// let mut toc = Toc::new(1, 2).unwrap();
/// toc.set_track(1, TocEntry::audio(0)).unwrap();
/// toc.set_track(2, TocEntry::data(20_000)).unwrap();
/// toc.set_leadout(TocEntry::data(35_000));
///
/// assert_eq!(toc.serialized_len(), Ok(28));
/// assert_eq!(toc.audio_tracks().count(), 1);
/// ```
pub struct Toc {
	first_track: u8,
	last_track: u8,
	entries: [TocEntry; TRACK_SLOTS],
}

impl Codec for Toc {
	fn deserialize(src: &[u8]) -> Result<Self, TocTocError> {
		let (first, last, payload) = wire::read_header(src, DESCRIPTOR_SIZE)?;
		let mut out = Self::new(first, last).map_err(|_| TocTocError::Corrupted)?;

		for chunk in payload.chunks_exact(DESCRIPTOR_SIZE) {
			let &[_, ac, num, _, a, b, c, d] = chunk else {
				return Err(TocTocError::Internal);
			};
			let entry = TocEntry::new(ac >> 4, ac, u32::from_be_bytes([a, b, c, d]));
			let idx = out.slot(num).ok_or(TocTocError::Corrupted)?;
			out.entries[idx] = entry;
		}

		Ok(out)
	}

	fn serialized_len(&self) -> Result<usize, TocTocError> {
		Ok(wire::HEADER_SIZE + self.payload_len())
	}

	fn serialize_into(&self, dst: &mut [u8]) -> Result<usize, TocTocError> {
		let len = wire::check_capacity(dst, self.serialized_len()?)?;
		wire::write_header(dst, self.payload_len(), self.first_track, self.last_track)?;

		let descriptors = self.tracks()
			.chain(std::iter::once((CD_LEADOUT_TRACK, self.leadout())));
		for ((num, entry), chunk) in descriptors.zip(dst[wire::HEADER_SIZE..len].chunks_exact_mut(DESCRIPTOR_SIZE)) {
			chunk.copy_from_slice(&entry.to_bytes(num));
		}

		Ok(len)
	}
}

impl Toc {
	/// # New.
	///
	/// Create an empty table of contents for tracks `first..=last`.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if the numbers are outside `1..=99`
	/// or out of order.
	pub const fn new(first: u8, last: u8) -> Result<Self, TocTocError> {
		if first == 0 || CD_MAX_TRACK < last || last < first {
			return Err(TocTocError::BadArg);
		}

		Ok(Self {
			first_track: first,
			last_track: last,
			entries: [TocEntry::new(0, 0, 0); TRACK_SLOTS],
		})
	}

	/// # From LBAs.
	///
	/// Build an all-audio table of contents from a list of track starts and
	/// the lead-out, numbering the tracks from `first`.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if `lbas` is empty or the track
	/// numbers would exceed 99.
	pub fn from_lbas(first: u8, lbas: &[u32], leadout: u32) -> Result<Self, TocTocError> {
		let len = u8::try_from(lbas.len()).map_err(|_| TocTocError::BadArg)?;
		let last = len.checked_sub(1)
			.and_then(|n| first.checked_add(n))
			.ok_or(TocTocError::BadArg)?;

		let mut out = Self::new(first, last)?;
		for (num, &lba) in (first..=last).zip(lbas) {
			out.set_track(num, TocEntry::audio(lba))?;
		}
		out.set_leadout(TocEntry::audio(leadout));
		Ok(out)
	}

	/// # Set Track.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if `num` is not within the track
	/// range.
	pub fn set_track(&mut self, num: u8, entry: TocEntry) -> Result<(), TocTocError> {
		if self.contains(num) {
			self.entries[usize::from(num)] = entry;
			Ok(())
		}
		else { Err(TocTocError::BadArg) }
	}

	/// # Set Lead-out.
	pub fn set_leadout(&mut self, entry: TocEntry) { self.entries[0] = entry; }
}

impl Toc {
	#[must_use]
	/// # First Track.
	pub const fn first_track(&self) -> u8 { self.first_track }

	#[must_use]
	/// # Last Track.
	pub const fn last_track(&self) -> u8 { self.last_track }

	#[must_use]
	/// # Number of Tracks.
	pub const fn len(&self) -> u8 { self.last_track - self.first_track + 1 }

	#[must_use]
	/// # Is Empty?
	///
	/// A table of contents always has at least one track.
	pub const fn is_empty(&self) -> bool { false }

	#[must_use]
	/// # Track.
	///
	/// Return the entry for track `num`, if it is within range.
	pub const fn track(&self, num: u8) -> Option<TocEntry> {
		if self.contains(num) { Some(self.entries[num as usize]) }
		else { None }
	}

	#[must_use]
	/// # Lead-out.
	pub const fn leadout(&self) -> TocEntry { self.entries[0] }

	#[must_use]
	/// # Track Length.
	///
	/// Return the number of sectors between the start of track `num` and
	/// the start of the next one (or the lead-out).
	pub fn track_len(&self, num: u8) -> Option<u32> {
		let start = self.track(num)?.lba();
		let end =
			if num == self.last_track { self.leadout().lba() }
			else { self.track(num + 1)?.lba() };
		end.checked_sub(start)
	}

	/// # Tracks.
	///
	/// Iterate over the `(number, entry)` pairs of each track, excluding the
	/// lead-out.
	pub fn tracks(&self) -> impl Iterator<Item=(u8, TocEntry)> + '_ {
		(self.first_track..=self.last_track).map(|n| (n, self.entries[usize::from(n)]))
	}

	/// # Audio Tracks.
	///
	/// Same as [`Toc::tracks`], but skipping data tracks.
	pub fn audio_tracks(&self) -> impl Iterator<Item=(u8, TocEntry)> + '_ {
		self.tracks().filter(|(_, e)| ! e.is_data())
	}

	/// # Slot.
	///
	/// Map a wire track number to an entry index.
	fn slot(&self, num: u8) -> Option<usize> {
		if num == CD_LEADOUT_TRACK { Some(0) }
		else if self.contains(num) { Some(usize::from(num)) }
		else { None }
	}

	/// # Contains Track?
	const fn contains(&self, num: u8) -> bool {
		self.first_track <= num && num <= self.last_track
	}

	/// # Payload Length.
	fn payload_len(&self) -> usize { (usize::from(self.len()) + 1) * DESCRIPTOR_SIZE }
}
