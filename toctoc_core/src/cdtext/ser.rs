/*!
# Toc Toc: CD-Text Serialization

Serialization happens in two passes over the same emitter: the first
merely counts the bytes for each block/pack type, which determines the
SIZEINFO contents, the descriptor limits, and the total length; the second
writes the PACKs for real.
*/

use crate::{
	Charset,
	stamp_pack,
	TocTocError,
	wire,
};
use crate::crc::PACK_SIZE;
use super::{
	CDTEXT_BLOCKS,
	CdText,
	CdTextBlock,
	CdTextField,
	CdTextToc,
	de::{
		SIZEINFO_SIZE,
		TOC2_SIZE,
	},
	kind::{
		PACK_DISCID,
		PACK_GENRE,
		PACK_SIZEINFO,
		PACK_TOC,
		PACK_TOC2,
		PACK_TYPES,
	},
};



/// # PACK Payload Size.
const PAYLOAD_SIZE: usize = 12;

/// # Maximum PACKs Per Block.
const MAX_BLOCK_PACKS: usize = 256;

/// # Maximum PACKs.
const MAX_PACKS: usize = 2048;

/// # Maximum Character Position.
const MAX_CHARPOS: usize = 15;



/// # Serialization Plan.
///
/// The per-block, per-type PACK counts.
pub(super) struct Plan {
	/// # Counts.
	counts: [[usize; PACK_TYPES]; CDTEXT_BLOCKS],
}

impl Plan {
	/// # New.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::InvalidCDText`] if a TOC is present without
	/// any blocks, or the PACK limits are exceeded.
	pub(super) fn new(cdtext: &CdText) -> Result<Self, TocTocError> {
		let carrier = carrier(cdtext)?;

		let mut counts = [[0; PACK_TYPES]; CDTEXT_BLOCKS];
		let blank = [0_u8; SIZEINFO_SIZE];
		for (idx, block) in cdtext.blocks() {
			let mut counter = PackCounter::default();
			emit_block(&mut counter, block, toc_for(cdtext, carrier, idx), &blank);
			for (c, bytes) in counts[idx].iter_mut().zip(counter.bytes) {
				*c = bytes.div_ceil(PAYLOAD_SIZE);
			}
		}

		let out = Self { counts };
		if
			out.counts.iter().all(|c| c.iter().sum::<usize>() <= MAX_BLOCK_PACKS) &&
			out.packs() <= MAX_PACKS
		{
			Ok(out)
		}
		else { Err(TocTocError::InvalidCDText) }
	}

	/// # Total PACKs.
	fn packs(&self) -> usize { self.counts.iter().flatten().sum() }

	/// # Serialized Length.
	pub(super) fn len(&self) -> usize { wire::HEADER_SIZE + self.packs() * PACK_SIZE }

	/// # Size Info.
	///
	/// Build the SIZEINFO payload for a given block.
	#[allow(clippy::cast_possible_truncation)]
	fn sizeinfo(&self, idx: usize, block: &CdTextBlock, languages: &[u8; CDTEXT_BLOCKS])
	-> [u8; SIZEINFO_SIZE] {
		let mut out = [0_u8; SIZEINFO_SIZE];
		out[0] = block.charset.code();
		out[1] = block.first_track;
		out[2] = block.last_track;
		out[3] = block.copyright;

		// Counts are bounded by the limits checked in Plan::new.
		for (o, c) in out[4..20].iter_mut().zip(self.counts[idx]) {
			*o = c as u8;
		}
		for (o, c) in out[20..28].iter_mut().zip(self.counts.iter()) {
			*o = c.iter().sum::<usize>().saturating_sub(1) as u8;
		}
		out[28..].copy_from_slice(languages);

		out
	}
}



/// # Write.
///
/// Write the header and all PACKs to `dst`, which must be exactly
/// [`Plan::len`] bytes.
pub(super) fn write(cdtext: &CdText, plan: &Plan, dst: &mut [u8]) -> Result<(), TocTocError> {
	let carrier = carrier(cdtext)?;
	let (head, body) = dst.split_at_mut(wire::HEADER_SIZE);
	wire::write_header(head, body.len(), 0, 0)?;

	let mut languages = [0_u8; CDTEXT_BLOCKS];
	for (idx, block) in cdtext.blocks() { languages[idx] = block.language; }

	let mut writer = PackWriter::new(body);
	for (idx, block) in cdtext.blocks() {
		let info = plan.sizeinfo(idx, block, &languages);
		writer.set_block(idx);
		emit_block(&mut writer, block, toc_for(cdtext, carrier, idx), &info);
	}

	writer.finish()
}

/// # TOC Carrier.
///
/// Return the index of the block that will carry the TOC, if any.
fn carrier(cdtext: &CdText) -> Result<Option<usize>, TocTocError> {
	if cdtext.toc.is_none() { Ok(None) }
	else {
		cdtext.blocks()
			.next()
			.map(|(idx, _)| Some(idx))
			.ok_or(TocTocError::InvalidCDText)
	}
}

/// # TOC For Block.
fn toc_for(cdtext: &CdText, carrier: Option<usize>, idx: usize) -> Option<&CdTextToc> {
	if carrier == Some(idx) { cdtext.toc.as_ref() }
	else { None }
}



/// # PACK Sink.
///
/// Content is emitted one pack type at a time, one string at a time.
trait PackSink {
	/// # Begin Pack Type.
	fn begin(&mut self, kind: u8, dbcc: bool);

	/// # Begin String.
	///
	/// Set the track number for subsequent bytes and reset the character
	/// position.
	fn string(&mut self, track: u8);

	/// # Push Bytes.
	fn push(&mut self, src: &[u8]);

	/// # End Pack Type.
	fn end(&mut self);
}

#[derive(Debug, Default)]
/// # PACK Counter.
struct PackCounter {
	/// # Bytes By Type.
	bytes: [usize; PACK_TYPES],

	/// # Current Type.
	kind: usize,
}

impl PackSink for PackCounter {
	fn begin(&mut self, kind: u8, _dbcc: bool) { self.kind = usize::from(kind & 0x0F); }
	fn string(&mut self, _track: u8) {}
	fn push(&mut self, src: &[u8]) { self.bytes[self.kind] += src.len(); }
	fn end(&mut self) {}
}

/// # PACK Writer.
///
/// Buffer payload bytes twelve at a time, writing out complete PACKs with
/// their headers and checksums.
struct PackWriter<'a> {
	/// # Output.
	dst: std::slice::ChunksExactMut<'a, u8>,

	/// # Overflow?
	overflow: bool,

	/// # Block Number.
	block: u8,

	/// # Sequence Number.
	seq: u8,

	/// # Pack Type.
	kind: u8,

	/// # Double-Byte?
	dbcc: bool,

	/// # Current Track.
	track: u8,

	/// # Bytes Into Current String.
	pos: usize,

	/// # Header Track and Character Position.
	head: (u8, u8),

	/// # Buffer.
	buf: [u8; PAYLOAD_SIZE],

	/// # Buffer Length.
	len: usize,
}

impl<'a> PackWriter<'a> {
	/// # New.
	fn new(dst: &'a mut [u8]) -> Self {
		Self {
			dst: dst.chunks_exact_mut(PACK_SIZE),
			overflow: false,
			block: 0,
			seq: 0,
			kind: 0,
			dbcc: false,
			track: 0,
			pos: 0,
			head: (0, 0),
			buf: [0; PAYLOAD_SIZE],
			len: 0,
		}
	}

	#[allow(clippy::cast_possible_truncation)]
	/// # Set Block.
	///
	/// Sequence numbers restart with each block.
	fn set_block(&mut self, idx: usize) {
		self.block = (idx & 0b0111) as u8;
		self.seq = 0;
	}

	/// # Flush.
	fn flush(&mut self) {
		if self.len == 0 { return; }
		self.buf[self.len..].fill(0);

		let Some(chunk) = self.dst.next() else {
			self.overflow = true;
			self.len = 0;
			return;
		};
		let Ok(pack) = <&mut [u8; PACK_SIZE]>::try_from(chunk) else {
			self.overflow = true;
			self.len = 0;
			return;
		};

		let (track, charpos) = self.head;
		pack[0] = self.kind;
		pack[1] = track & 0x7F;
		pack[2] = self.seq;
		pack[3] = (u8::from(self.dbcc) << 7) | (self.block << 4) | charpos;
		pack[4..16].copy_from_slice(&self.buf);
		stamp_pack(pack);

		self.seq = self.seq.wrapping_add(1);
		self.len = 0;
	}

	/// # Finish.
	fn finish(mut self) -> Result<(), TocTocError> {
		self.flush();
		if self.overflow || self.dst.next().is_some() { Err(TocTocError::Internal) }
		else { Ok(()) }
	}
}

impl PackSink for PackWriter<'_> {
	fn begin(&mut self, kind: u8, dbcc: bool) {
		self.flush();
		self.kind = kind;
		self.dbcc = dbcc;
	}

	fn string(&mut self, track: u8) {
		self.track = track;
		self.pos = 0;
	}

	#[allow(clippy::cast_possible_truncation)]
	fn push(&mut self, src: &[u8]) {
		let width = if self.dbcc { 2 } else { 1 };
		for &b in src {
			if self.len == 0 {
				self.head = (self.track, usize::min(self.pos / width, MAX_CHARPOS) as u8);
			}
			self.buf[self.len] = b;
			self.len += 1;
			self.pos += 1;
			if self.len == PAYLOAD_SIZE { self.flush(); }
		}
	}

	fn end(&mut self) { self.flush(); }
}



/// # Emit Block.
///
/// Emit everything for the block, in pack type order.
fn emit_block<S: PackSink>(
	sink: &mut S,
	block: &CdTextBlock,
	toc: Option<&CdTextToc>,
	info: &[u8; SIZEINFO_SIZE],
) {
	for field in CdTextField::ALL.into_iter().take_while(|f| f.pack_type() < PACK_DISCID) {
		emit_text(sink, block, field);
	}

	if let Some(discid) = block.discid() {
		sink.begin(PACK_DISCID, false);
		sink.string(0);
		emit_str(sink, Charset::Latin1, discid);
		sink.end();
	}

	if block.genre_code != 0 || block.genre_name.is_some() {
		sink.begin(PACK_GENRE, false);
		sink.string(0);
		sink.push(&block.genre_code.to_be_bytes());
		emit_str(sink, Charset::Latin1, block.genre_name().unwrap_or_default());
		sink.end();
	}

	if let Some(toc) = toc {
		emit_toc(sink, toc);
		if toc.has_intervals() { emit_intervals(sink, toc); }
	}

	for field in CdTextField::ALL.into_iter().skip_while(|f| f.pack_type() < PACK_DISCID) {
		emit_text(sink, block, field);
	}

	sink.begin(PACK_SIZEINFO, false);
	for (track, chunk) in (0..).zip(info.chunks_exact(PAYLOAD_SIZE)) {
		sink.string(track);
		sink.push(chunk);
	}
	sink.end();
}

/// # Emit Text.
///
/// Values matching their predecessor (or the album, for the first track)
/// are written as a tab.
fn emit_text<S: PackSink>(sink: &mut S, block: &CdTextBlock, field: CdTextField) {
	if ! block.has_field(field) { return; }

	let charset = block.field_charset(field);
	let repeat = if charset.is_double_byte() { "\t\t" } else { "\t" };

	sink.begin(field.pack_type(), charset.is_double_byte());
	sink.string(0);
	let mut prev = block.get(field, 0);
	emit_str(sink, charset, prev.unwrap_or_default());

	for track in block.first_track..=block.last_track {
		let value = block.get(field, track);
		sink.string(track);
		if value.is_some() && value == prev { emit_str(sink, charset, repeat); }
		else { emit_str(sink, charset, value.unwrap_or_default()); }
		prev = value;
	}

	sink.end();
}

/// # Emit String.
///
/// Encode the string and its terminator.
fn emit_str<S: PackSink>(sink: &mut S, charset: Charset, src: &str) {
	charset.encode_each(src, |chunk| sink.push(chunk));
	sink.push(charset.terminator());
}

/// # Emit TOC.
///
/// First/last and a zero, then the lead-out and track starts, three bytes
/// apiece. Each PACK after the first is labeled with its first track.
fn emit_toc<S: PackSink>(sink: &mut S, toc: &CdTextToc) {
	let first = toc.first_track;
	let units = std::iter::once([first, toc.last_track, 0])
		.chain(std::iter::once(<[u8; 3]>::from(toc.leadout())))
		.chain((first..=toc.last_track).map(|t| <[u8; 3]>::from(toc.offsets[usize::from(t)])));

	sink.begin(PACK_TOC, false);
	for (unit, bytes) in (0_u8..).zip(units) {
		if unit % 4 == 0 {
			sink.string(if unit == 0 { 0 } else { first.saturating_add(unit).saturating_sub(2) });
		}
		sink.push(&bytes);
	}
	sink.end();
}

#[allow(clippy::cast_possible_truncation)]
/// # Emit Intervals.
///
/// One twelve-byte record per interval.
fn emit_intervals<S: PackSink>(sink: &mut S, toc: &CdTextToc) {
	sink.begin(PACK_TOC2, false);
	for track in toc.first_track..=toc.last_track {
		let list = toc.intervals(track);
		// Lengths are capped by CdTextToc::push_interval.
		let count = list.len() as u8;
		for (index, iv) in list.iter().enumerate() {
			let index = index as u8;
			let [s1, s2, s3] = <[u8; 3]>::from(iv.start());
			let [e1, e2, e3] = <[u8; 3]>::from(iv.end());
			let record: [u8; TOC2_SIZE] = [track, count, index, 0, 0, 0, s1, s2, s3, e1, e2, e3];
			sink.string(track);
			sink.push(&record);
		}
	}
	sink.end();
}



#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		CdTextInterval,
		Codec,
		Msf,
	};

	/// # Kitchen Sink.
	fn sample() -> CdText {
		let mut en = CdTextBlock::new(Charset::Latin1, 0x09, 1, 3).expect("Block failed.");
		for (track, title) in ["Album", "Intro", "Intro", "Outro"].into_iter().enumerate() {
			en.set(CdTextField::Title, track as u8, title).expect("Set failed.");
		}
		en.set(CdTextField::Performer, 0, "The Band").expect("Set failed.");
		en.set(CdTextField::Performer, 1, "The Band").expect("Set failed.");
		en.set(CdTextField::Performer, 3, "Guest Star").expect("Set failed.");
		en.set(CdTextField::Message, 2, "Café ñ").expect("Set failed.");
		en.set(CdTextField::UpcIsrc, 0, "0075597996524").expect("Set failed.");
		en.set(CdTextField::UpcIsrc, 1, "USRC17607839").expect("Set failed.");
		en.set_discid("XY-1234");
		en.set_genre(0x0019, "Rock");
		en.set_copyright(0x03);

		let mut ja = CdTextBlock::new(Charset::MsJis, 0x69, 1, 3).expect("Block failed.");
		ja.set(CdTextField::Title, 0, "アルバム").expect("Set failed.");
		ja.set(CdTextField::Title, 1, "はじまり").expect("Set failed.");
		ja.set(CdTextField::Title, 2, "はじまり").expect("Set failed.");
		ja.set(CdTextField::Title, 3, "おわり A").expect("Set failed.");
		ja.set(CdTextField::UpcIsrc, 1, "JPX0A0000001").expect("Set failed.");

		let mut toc = CdTextToc::new(1, 3).expect("TOC failed.");
		toc.set_leadout(Msf::new(30, 0, 0));
		toc.set_offset(1, Msf::new(0, 2, 0)).expect("Offset failed.");
		toc.set_offset(2, Msf::new(5, 10, 20)).expect("Offset failed.");
		toc.set_offset(3, Msf::new(12, 0, 74)).expect("Offset failed.");
		toc.push_interval(2, CdTextInterval::new(Msf::new(5, 10, 20), Msf::new(6, 0, 0)))
			.expect("Interval failed.");
		toc.push_interval(2, CdTextInterval::new(Msf::new(7, 0, 0), Msf::new(8, 0, 0)))
			.expect("Interval failed.");

		let mut out = CdText::default();
		out.set_block(0, en).expect("Block failed.");
		out.set_block(1, ja).expect("Block failed.");
		out.set_toc(Some(toc));
		out
	}

	/// # Find PACKs.
	fn packs(raw: &[u8], kind: u8) -> impl Iterator<Item=&[u8]> {
		raw[wire::HEADER_SIZE..].chunks_exact(PACK_SIZE).filter(move |p| p[0] == kind)
	}

	#[test]
	fn t_round_trip() {
		let cdtext = sample();
		let raw = cdtext.serialize().expect("Serialize failed.");
		assert_eq!(cdtext.serialized_len(), Ok(raw.len()));
		assert_eq!((raw.len() - wire::HEADER_SIZE) % PACK_SIZE, 0);

		let parsed = CdText::deserialize_strict(&raw).expect("Deserialize failed.");
		assert_eq!(parsed, cdtext, "Round trip failed.");
		assert_eq!(parsed.get(CdTextField::Title, 2), Some("Intro"));
		assert_eq!(
			parsed.block(1).and_then(|b| b.get(CdTextField::Title, 2)),
			Some("はじまり"),
		);

		// Japanese titles are double-byte; ISRCs never are.
		assert!(
			packs(&raw, 0x80).filter(|p| p[3] & 0x70 == 0x10).all(|p| p[3] & 0x80 != 0),
			"Missing DBCC flag.",
		);
		assert!(packs(&raw, 0x8E).all(|p| p[3] & 0x80 == 0), "Unexpected DBCC flag.");

		// Each block ends with exactly three SIZEINFO PACKs.
		assert_eq!(packs(&raw, PACK_SIZEINFO).count(), 6);

		// The TOC lives in the first block only.
		assert!(packs(&raw, PACK_TOC).all(|p| p[3] & 0x70 == 0));
		assert_eq!(packs(&raw, PACK_TOC2).count(), 2, "One PACK per interval.");
	}

	#[test]
	fn t_sequence() {
		let raw = sample().serialize().expect("Serialize failed.");
		for block in 0..2_u8 {
			let seqs: Vec<u8> = raw[wire::HEADER_SIZE..].chunks_exact(PACK_SIZE)
				.filter(|p| (p[3] >> 4) & 0b0111 == block)
				.map(|p| p[2])
				.collect();
			assert!(! seqs.is_empty());
			assert!(
				seqs.iter().copied().eq(0..seqs.len() as u8),
				"Block {block} sequence numbers are not contiguous.",
			);
		}
	}

	#[test]
	fn t_repeat_marker() {
		let raw = sample().serialize().expect("Serialize failed.");

		// Track two's title is written as a tab.
		let titles: Vec<u8> = packs(&raw, 0x80)
			.filter(|p| p[3] & 0x70 == 0)
			.flat_map(|p| p[4..16].iter().copied())
			.collect();
		assert!(titles.starts_with(b"Album\0Intro\0\t\0Outro\0"), "Missing repeat marker.");

		// Track one's performer repeats the album.
		let performers: Vec<u8> = packs(&raw, 0x81)
			.flat_map(|p| p[4..16].iter().copied())
			.collect();
		assert!(performers.starts_with(b"The Band\0\t\0\0Guest Star\0"), "Missing repeat marker.");
	}

	#[test]
	fn t_too_small() {
		let cdtext = sample();
		let len = cdtext.serialized_len().expect("Length failed.");

		let mut buf = vec![0xEE_u8; len - 1];
		assert_eq!(cdtext.serialize_into(&mut buf), Err(TocTocError::TooSmall(len)));
		assert!(buf.iter().all(|&b| b == 0xEE), "Undersized buffer was written to.");

		let mut buf = vec![0_u8; len];
		assert_eq!(cdtext.serialize_into(&mut buf), Ok(len));
	}

	#[test]
	fn t_limits() {
		// A 3034-character title, plus terminator and an empty track, fills
		// exactly 253 PACKs; with SIZEINFO that's the 256 maximum.
		let mut block = CdTextBlock::new(Charset::Latin1, 9, 1, 1).expect("Block failed.");
		block.set(CdTextField::Title, 0, "a".repeat(3034)).expect("Set failed.");

		let mut cdtext = CdText::default();
		for idx in 0..CDTEXT_BLOCKS {
			cdtext.set_block(idx, block.clone()).expect("Block failed.");
		}
		assert_eq!(
			cdtext.serialized_len(),
			Ok(wire::HEADER_SIZE + MAX_PACKS * PACK_SIZE),
			"Limits should be inclusive.",
		);
		assert!(CdText::deserialize(&cdtext.serialize().expect("Serialize failed.")).is_ok());

		// One more character tips it over.
		block.set(CdTextField::Title, 0, "a".repeat(3035)).expect("Set failed.");
		cdtext.set_block(0, block).expect("Block failed.");
		assert_eq!(cdtext.serialized_len(), Err(TocTocError::InvalidCDText));

		let mut buf = vec![0xEE_u8; 65_536];
		assert_eq!(cdtext.serialize_into(&mut buf), Err(TocTocError::InvalidCDText));
		assert!(buf.iter().all(|&b| b == 0xEE), "Invalid CD-Text was written.");
	}

	#[test]
	fn t_toc_without_block() {
		let mut cdtext = CdText::default();
		cdtext.set_toc(Some(CdTextToc::new(1, 1).expect("TOC failed.")));
		assert_eq!(cdtext.serialize(), Err(TocTocError::InvalidCDText));
	}

	#[test]
	fn t_bad_intervals() {
		let mut raw = sample().serialize().expect("Serialize failed.");

		// Give the second interval record the wrong index.
		let pos = raw[wire::HEADER_SIZE..].chunks_exact(PACK_SIZE)
			.enumerate()
			.filter(|(_, p)| p[0] == PACK_TOC2)
			.map(|(k, _)| wire::HEADER_SIZE + k * PACK_SIZE)
			.nth(1)
			.expect("Missing interval.");
		raw[pos + 4 + 2] = 5;
		let pack: &mut [u8; PACK_SIZE] = (&mut raw[pos..pos + PACK_SIZE]).try_into()
			.expect("Bad slice.");
		stamp_pack(pack);

		assert_eq!(CdText::deserialize(&raw), Err(TocTocError::Corrupted));
	}
}
