/*!
# Toc Toc: CD-Text (Format 0101b)
*/

mod de;
mod kind;
mod ser;

pub use kind::CdTextField;

use crate::{
	CD_MAX_TRACK,
	Charset,
	Codec,
	Msf,
	TocTocError,
	TRACK_SLOTS,
};



/// # Number of Blocks.
pub(crate) const CDTEXT_BLOCKS: usize = 8;

/// # Number of Text Fields.
const CDTEXT_FIELDS: usize = CdTextField::ALL.len();

/// # Maximum Intervals Per Track.
const MAX_INTERVALS: usize = u8::MAX as usize;



#[derive(Debug, Clone, Default, Eq, Hash, PartialEq)]
/// # CD-Text.
///
/// CD-Text is split into as many as eight blocks, each with its own
/// language and character set, holding per-track strings for a handful of
/// [`CdTextField`]s. Track zero holds the album-wide value.
///
/// It can also carry an independent copy of the table of contents, along
/// with per-track playback intervals.
///
/// ```
/// use toctoc_core::{CdText, CdTextBlock, CdTextField, Charset, Codec};
///
/// let mut block = CdTextBlock::new(Charset::Latin1, 0x09, 1, 2).unwrap();
/// block.set(CdTextField::Title, 0, "Album").unwrap();
/// block.set(CdTextField::Title, 1, "One").unwrap();
/// block.set(CdTextField::Title, 2, "Two").unwrap();
///
/// let mut cdtext = CdText::default();
/// cdtext.set_block(0, block).unwrap();
///
/// let raw = cdtext.serialize().unwrap();
/// let parsed = CdText::deserialize(&raw).unwrap();
/// assert_eq!(parsed.get(CdTextField::Title, 2), Some("Two"));
/// assert_eq!(parsed, cdtext);
/// ```
pub struct CdText {
	blocks: [Option<CdTextBlock>; CDTEXT_BLOCKS],
	toc: Option<CdTextToc>,
}

impl Codec for CdText {
	#[inline]
	fn deserialize(src: &[u8]) -> Result<Self, TocTocError> { de::deserialize(src, false) }

	#[inline]
	fn serialized_len(&self) -> Result<usize, TocTocError> {
		ser::Plan::new(self).map(|p| p.len())
	}

	fn serialize_into(&self, dst: &mut [u8]) -> Result<usize, TocTocError> {
		let plan = ser::Plan::new(self)?;
		let len = crate::wire::check_capacity(dst, plan.len())?;
		ser::write(self, &plan, &mut dst[..len])?;
		Ok(len)
	}
}

impl CdText {
	/// # Deserialize (Strict).
	///
	/// Same as [`Codec::deserialize`], but PACKs with bad checksums are
	/// rejected instead of being used anyway.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::Corrupted`] for checksum mismatches, or any
	/// other error the lenient version might return.
	pub fn deserialize_strict(src: &[u8]) -> Result<Self, TocTocError> {
		de::deserialize(src, true)
	}
}

impl CdText {
	#[must_use]
	/// # Block.
	pub fn block(&self, idx: usize) -> Option<&CdTextBlock> {
		self.blocks.get(idx)?.as_ref()
	}

	#[must_use]
	/// # Block (Mutable).
	pub fn block_mut(&mut self, idx: usize) -> Option<&mut CdTextBlock> {
		self.blocks.get_mut(idx)?.as_mut()
	}

	/// # Blocks.
	///
	/// Iterate over the `(index, block)` pairs of each block present.
	pub fn blocks(&self) -> impl Iterator<Item=(usize, &CdTextBlock)> {
		self.blocks.iter()
			.enumerate()
			.filter_map(|(k, b)| b.as_ref().map(|b| (k, b)))
	}

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool {
		self.toc.is_none() && self.blocks.iter().all(Option::is_none)
	}

	#[must_use]
	/// # Get Value.
	///
	/// Return the value for the field/track from the first block that has
	/// one.
	pub fn get(&self, field: CdTextField, track: u8) -> Option<&str> {
		self.blocks().find_map(|(_, b)| b.get(field, track))
	}

	#[must_use]
	/// # TOC.
	pub const fn toc(&self) -> Option<&CdTextToc> { self.toc.as_ref() }

	/// # Set Block.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if the index is eight or more.
	pub fn set_block(&mut self, idx: usize, block: CdTextBlock) -> Result<(), TocTocError> {
		let slot = self.blocks.get_mut(idx).ok_or(TocTocError::BadArg)?;
		*slot = Some(block);
		Ok(())
	}

	/// # Remove Block.
	pub fn remove_block(&mut self, idx: usize) -> Option<CdTextBlock> {
		self.blocks.get_mut(idx)?.take()
	}

	/// # Set TOC.
	///
	/// Note that the TOC is carried by the first block, so cannot be
	/// serialized without one.
	pub fn set_toc(&mut self, toc: Option<CdTextToc>) { self.toc = toc; }
}



#[derive(Debug, Clone, Eq, Hash, PartialEq)]
/// # CD-Text Block.
///
/// The strings for a single language.
pub struct CdTextBlock {
	charset: Charset,
	language: u8,
	first_track: u8,
	last_track: u8,
	copyright: u8,
	fields: [Vec<Option<String>>; CDTEXT_FIELDS],
	discid: Option<String>,
	genre_code: u16,
	genre_name: Option<String>,
}

impl CdTextBlock {
	/// # New.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if the track numbers are outside
	/// `1..=99` or out of order.
	pub fn new(charset: Charset, language: u8, first: u8, last: u8)
	-> Result<Self, TocTocError> {
		if first == 0 || CD_MAX_TRACK < last || last < first {
			return Err(TocTocError::BadArg);
		}

		Ok(Self {
			charset,
			language,
			first_track: first,
			last_track: last,
			copyright: 0,
			fields: std::array::from_fn(|_| Vec::new()),
			discid: None,
			genre_code: 0,
			genre_name: None,
		})
	}

	#[must_use]
	/// # Character Set.
	pub const fn charset(&self) -> Charset { self.charset }

	#[must_use]
	/// # Language Code.
	pub const fn language(&self) -> u8 { self.language }

	#[must_use]
	/// # First Track.
	pub const fn first_track(&self) -> u8 { self.first_track }

	#[must_use]
	/// # Last Track.
	pub const fn last_track(&self) -> u8 { self.last_track }

	#[must_use]
	/// # Copyright Flags.
	///
	/// The raw SIZEINFO copyright byte.
	pub const fn copyright(&self) -> u8 { self.copyright }

	#[must_use]
	/// # Get Value.
	///
	/// Track zero is the album.
	pub fn get(&self, field: CdTextField, track: u8) -> Option<&str> {
		self.fields[field.index()].get(usize::from(track))?.as_deref()
	}

	#[must_use]
	/// # Disc ID.
	pub fn discid(&self) -> Option<&str> { self.discid.as_deref() }

	#[must_use]
	/// # Genre Code.
	pub const fn genre_code(&self) -> u16 { self.genre_code }

	#[must_use]
	/// # Genre Name.
	pub fn genre_name(&self) -> Option<&str> { self.genre_name.as_deref() }

	#[must_use]
	/// # Field Character Set.
	///
	/// UPC/ISRC is always single-byte; everything else uses the block's
	/// character set.
	pub const fn field_charset(&self, field: CdTextField) -> Charset {
		if field.is_single_byte() { Charset::Latin1 }
		else { self.charset }
	}

	/// # Has Field?
	fn has_field(&self, field: CdTextField) -> bool {
		! self.fields[field.index()].is_empty()
	}
}

impl CdTextBlock {
	/// # Set Value.
	///
	/// Set the value for the field/track, using track zero for the album.
	/// Empty strings clear the value.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if the track is out of range.
	pub fn set<S>(&mut self, field: CdTextField, track: u8, value: S)
	-> Result<(), TocTocError>
	where S: Into<String> {
		if track != 0 && (track < self.first_track || self.last_track < track) {
			return Err(TocTocError::BadArg);
		}

		self.set_raw(field, track, Some(value.into()));
		Ok(())
	}

	/// # Set Copyright Flags.
	pub fn set_copyright(&mut self, copyright: u8) { self.copyright = copyright; }

	/// # Set Disc ID.
	///
	/// Empty strings clear the value.
	pub fn set_discid<S>(&mut self, discid: S)
	where S: Into<String> {
		self.discid = Some(discid.into()).filter(|s| ! s.is_empty());
	}

	/// # Set Genre.
	///
	/// An empty name clears the name.
	pub fn set_genre<S>(&mut self, code: u16, name: S)
	where S: Into<String> {
		self.genre_code = code;
		self.genre_name = Some(name.into()).filter(|s| ! s.is_empty());
	}

	/// # Set Value (Unchecked).
	///
	/// Empty values are stored as `None`, and trailing `None`s are trimmed
	/// so that equivalent blocks compare equal.
	fn set_raw(&mut self, field: CdTextField, track: u8, value: Option<String>) {
		let values = &mut self.fields[field.index()];
		let idx = usize::from(track);
		match value.filter(|s| ! s.is_empty()) {
			Some(v) => {
				if values.len() <= idx { values.resize(idx + 1, None); }
				values[idx] = Some(v);
			},
			None => {
				if let Some(v) = values.get_mut(idx) { *v = None; }
				while matches!(values.last(), Some(None)) { values.pop(); }
			},
		}
	}
}



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # CD-Text Interval.
///
/// A start/end pair describing a playable region of a track.
pub struct CdTextInterval {
	start: Msf,
	end: Msf,
}

impl CdTextInterval {
	#[must_use]
	/// # New.
	pub const fn new(start: Msf, end: Msf) -> Self { Self { start, end } }

	#[must_use]
	/// # Start.
	pub const fn start(&self) -> Msf { self.start }

	#[must_use]
	/// # End.
	pub const fn end(&self) -> Msf { self.end }
}



#[derive(Debug, Clone, Eq, Hash, PartialEq)]
/// # CD-Text TOC.
///
/// A copy of the track offsets as recorded in the CD-Text, plus any
/// per-track intervals. Offset zero holds the lead-out.
pub struct CdTextToc {
	first_track: u8,
	last_track: u8,
	offsets: [Msf; TRACK_SLOTS],
	intervals: [Vec<CdTextInterval>; TRACK_SLOTS],
}

impl CdTextToc {
	/// # New.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if the track numbers are outside
	/// `1..=99` or out of order.
	pub fn new(first: u8, last: u8) -> Result<Self, TocTocError> {
		if first == 0 || CD_MAX_TRACK < last || last < first {
			return Err(TocTocError::BadArg);
		}

		Ok(Self {
			first_track: first,
			last_track: last,
			offsets: [Msf::default(); TRACK_SLOTS],
			intervals: std::array::from_fn(|_| Vec::new()),
		})
	}

	#[must_use]
	/// # First Track.
	pub const fn first_track(&self) -> u8 { self.first_track }

	#[must_use]
	/// # Last Track.
	pub const fn last_track(&self) -> u8 { self.last_track }

	#[must_use]
	/// # Lead-out.
	pub const fn leadout(&self) -> Msf { self.offsets[0] }

	#[must_use]
	/// # Track Offset.
	pub fn offset(&self, track: u8) -> Option<Msf> {
		if self.contains(track) { Some(self.offsets[usize::from(track)]) }
		else { None }
	}

	#[must_use]
	/// # Track Intervals.
	pub fn intervals(&self, track: u8) -> &[CdTextInterval] {
		if self.contains(track) { self.intervals[usize::from(track)].as_slice() }
		else { &[] }
	}

	/// # Set Lead-out.
	pub fn set_leadout(&mut self, msf: Msf) { self.offsets[0] = msf; }

	/// # Set Track Offset.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if the track is out of range.
	pub fn set_offset(&mut self, track: u8, msf: Msf) -> Result<(), TocTocError> {
		if self.contains(track) {
			self.offsets[usize::from(track)] = msf;
			Ok(())
		}
		else { Err(TocTocError::BadArg) }
	}

	/// # Add Interval.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::BadArg`] if the track is out of range or
	/// already has 255 intervals.
	pub fn push_interval(&mut self, track: u8, interval: CdTextInterval)
	-> Result<(), TocTocError> {
		if self.contains(track) {
			let list = &mut self.intervals[usize::from(track)];
			if list.len() < MAX_INTERVALS {
				list.push(interval);
				return Ok(());
			}
		}
		Err(TocTocError::BadArg)
	}

	/// # Contains Track?
	const fn contains(&self, track: u8) -> bool {
		self.first_track <= track && track <= self.last_track
	}

	/// # Has Intervals?
	fn has_intervals(&self) -> bool { self.intervals.iter().any(|v| ! v.is_empty()) }
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_block_set() {
		let mut block = CdTextBlock::new(Charset::Latin1, 9, 2, 3).expect("Block failed.");
		assert_eq!(block.set(CdTextField::Title, 1, "No"), Err(TocTocError::BadArg));
		assert_eq!(block.set(CdTextField::Title, 4, "No"), Err(TocTocError::BadArg));
		assert!(! block.has_field(CdTextField::Title));

		assert!(block.set(CdTextField::Title, 3, "Three").is_ok());
		assert_eq!(block.get(CdTextField::Title, 3), Some("Three"));
		assert_eq!(block.get(CdTextField::Title, 2), None);
		assert!(block.has_field(CdTextField::Title));

		// Clearing trims.
		assert!(block.set(CdTextField::Title, 3, "").is_ok());
		assert!(! block.has_field(CdTextField::Title), "Empty values should be trimmed.");
		assert_eq!(
			block,
			CdTextBlock::new(Charset::Latin1, 9, 2, 3).expect("Block failed."),
			"A cleared block should equal a new one.",
		);

		assert_eq!(block.field_charset(CdTextField::UpcIsrc), Charset::Latin1);
		let block = CdTextBlock::new(Charset::MsJis, 9, 1, 1).expect("Block failed.");
		assert_eq!(block.field_charset(CdTextField::Title), Charset::MsJis);
		assert_eq!(block.field_charset(CdTextField::UpcIsrc), Charset::Latin1);
	}

	#[test]
	fn t_toc() {
		let mut toc = CdTextToc::new(1, 2).expect("TOC failed.");
		assert!(toc.set_offset(2, Msf::new(3, 0, 0)).is_ok());
		assert_eq!(toc.set_offset(3, Msf::new(3, 0, 0)), Err(TocTocError::BadArg));
		assert_eq!(toc.offset(2), Some(Msf::new(3, 0, 0)));
		assert_eq!(toc.offset(0), None, "The lead-out has its own accessor.");

		let iv = CdTextInterval::new(Msf::new(0, 2, 0), Msf::new(0, 30, 0));
		assert!(! toc.has_intervals());
		assert!(toc.push_interval(1, iv).is_ok());
		assert!(toc.has_intervals());
		assert_eq!(toc.intervals(1), &[iv]);
		assert!(toc.intervals(5).is_empty());
	}

	#[test]
	fn t_cdtext_blocks() {
		let mut cdtext = CdText::default();
		assert!(cdtext.is_empty());

		let block = CdTextBlock::new(Charset::Ascii, 9, 1, 1).expect("Block failed.");
		assert_eq!(cdtext.set_block(8, block.clone()), Err(TocTocError::BadArg));
		assert!(cdtext.set_block(3, block).is_ok());
		assert!(! cdtext.is_empty());
		assert_eq!(cdtext.blocks().map(|(k, _)| k).collect::<Vec<_>>(), vec![3]);

		if let Some(b) = cdtext.block_mut(3) {
			assert!(b.set(CdTextField::Performer, 0, "Band").is_ok());
		}
		assert_eq!(cdtext.get(CdTextField::Performer, 0), Some("Band"));
		assert!(cdtext.remove_block(3).is_some());
		assert!(cdtext.is_empty());
	}
}
