/*!
# Toc Toc: CD-Text Deserialization
*/

use crate::{
	Charset,
	Msf,
	TocTocError,
	verify_pack,
	wire,
};
use crate::crc::PACK_SIZE;
use super::{
	CDTEXT_BLOCKS,
	CdText,
	CdTextBlock,
	CdTextField,
	CdTextInterval,
	CdTextToc,
	kind::{
		pack_index,
		PACK_DISCID,
		PACK_FIRST,
		PACK_GENRE,
		PACK_SIZEINFO,
		PACK_TOC,
		PACK_TOC2,
		PACK_TYPES,
	},
};



/// # Size Info Length.
pub(super) const SIZEINFO_SIZE: usize = 36;

/// # TOC2 Record Size.
pub(super) const TOC2_SIZE: usize = 12;

/// # Runs.
///
/// The concatenated payloads of each block/pack type.
type Runs = [[Vec<u8>; PACK_TYPES]; CDTEXT_BLOCKS];



/// # Deserialize.
pub(super) fn deserialize(src: &[u8], strict: bool) -> Result<CdText, TocTocError> {
	let (_, _, payload) = wire::read_header(src, PACK_SIZE)?;
	let runs = collect_runs(payload, strict)?;

	let mut out = CdText::default();
	for (idx, run) in runs.iter().enumerate() {
		if run.iter().any(|r| ! r.is_empty()) {
			out.blocks[idx] = Some(parse_block(idx, run)?);
		}
	}

	// The TOC can technically appear in any block; the first one wins.
	if let Some(run) = runs.iter().map(|r| &r[run_idx(PACK_TOC)]).find(|r| ! r.is_empty()) {
		let mut toc = parse_toc(run)?;

		// Intervals have to wait until the track range is known.
		if let Some(run) = runs.iter().map(|r| &r[run_idx(PACK_TOC2)]).find(|r| ! r.is_empty()) {
			parse_intervals(&mut toc, run)?;
		}

		out.toc = Some(toc);
	}
	else if runs.iter().any(|r| ! r[run_idx(PACK_TOC2)].is_empty()) {
		return Err(TocTocError::Corrupted);
	}

	Ok(out)
}

/// # Collect Runs.
///
/// Concatenate the payloads for each block/pack type pair, in order,
/// skipping extension packs and unknown types.
fn collect_runs(payload: &[u8], strict: bool) -> Result<Runs, TocTocError> {
	let mut runs: Runs = std::array::from_fn(|_| std::array::from_fn(|_| Vec::new()));

	for chunk in payload.chunks_exact(PACK_SIZE) {
		let pack: &[u8; PACK_SIZE] = chunk.try_into().map_err(|_| TocTocError::Internal)?;
		if strict && ! verify_pack(pack) { return Err(TocTocError::Corrupted); }

		// Extension flag.
		if 0 != pack[1] & 0x80 { continue; }

		let Some(kind) = pack_index(pack[0]) else { continue; };
		let block = usize::from((pack[3] >> 4) & 0b0111);
		runs[block][kind].extend_from_slice(&pack[4..16]);
	}

	Ok(runs)
}

/// # Parse Block.
fn parse_block(idx: usize, runs: &[Vec<u8>; PACK_TYPES]) -> Result<CdTextBlock, TocTocError> {
	// Size info comes first; it holds the character set.
	let info = runs[run_idx(PACK_SIZEINFO)].as_slice();
	if info.len() != SIZEINFO_SIZE { return Err(TocTocError::Corrupted); }

	let charset = Charset::try_from(info[0])?;
	let mut out = CdTextBlock::new(charset, info[28 + idx], info[1], info[2])
		.map_err(|_| TocTocError::Corrupted)?;
	out.copyright = info[3];

	// Text.
	for field in CdTextField::ALL {
		let run = &runs[run_idx(field.pack_type())];
		if ! run.is_empty() { parse_text(&mut out, field, run); }
	}

	// Disc ID.
	let run = &runs[run_idx(PACK_DISCID)];
	if ! run.is_empty() {
		out.set_discid(Charset::Latin1.decode(run));
	}

	// Genre.
	let run = &runs[run_idx(PACK_GENRE)];
	if let [a, b, rest @ ..] = run.as_slice() {
		out.set_genre(u16::from_be_bytes([*a, *b]), Charset::Latin1.decode(rest));
	}

	Ok(out)
}

/// # Parse Text.
///
/// Split the run into album and per-track values, resolving repeat
/// markers along the way.
fn parse_text(block: &mut CdTextBlock, field: CdTextField, mut run: &[u8]) {
	let charset = block.field_charset(field);
	let repeat = if charset.is_double_byte() { "\t\t" } else { "\t" };

	let (album, len) = charset.decode_prefix(run);
	run = &run[len..];
	let mut prev = Some(album).filter(|s| ! s.is_empty());
	block.set_raw(field, 0, prev.clone());

	for track in block.first_track..=block.last_track {
		if run.is_empty() { break; }
		let (value, len) = charset.decode_prefix(run);
		run = &run[len..];

		let value =
			if value == repeat { prev.clone() }
			else { Some(value).filter(|s| ! s.is_empty()) };
		block.set_raw(field, track, value.clone());
		prev = value;
	}
}

/// # Parse TOC.
///
/// The run holds first/last tracks and a zero, then the lead-out and each
/// track start as MSF triplets.
fn parse_toc(run: &[u8]) -> Result<CdTextToc, TocTocError> {
	let [first, last, _, rest @ ..] = run else { return Err(TocTocError::Corrupted); };
	let mut toc = CdTextToc::new(*first, *last).map_err(|_| TocTocError::Corrupted)?;

	let mut msfs = rest.chunks_exact(3).map(|c| Msf::new(c[0], c[1], c[2]));
	toc.set_leadout(msfs.next().ok_or(TocTocError::Corrupted)?);
	for track in *first..=*last {
		toc.set_offset(track, msfs.next().ok_or(TocTocError::Corrupted)?)?;
	}

	Ok(toc)
}

/// # Parse Intervals.
///
/// Each record is `[track, count, index, 0, 0, 0, start, end]`. Records
/// for a given track must arrive in order.
fn parse_intervals(toc: &mut CdTextToc, run: &[u8]) -> Result<(), TocTocError> {
	for chunk in run.chunks_exact(TOC2_SIZE) {
		let &[track, count, index, _, _, _, s1, s2, s3, e1, e2, e3] = chunk else {
			return Err(TocTocError::Internal);
		};
		if track == 0 { continue; }

		if ! toc.contains(track) { return Err(TocTocError::Corrupted); }
		let have = toc.intervals(track).len();
		if usize::from(index) != have || count <= index {
			return Err(TocTocError::Corrupted);
		}

		toc.push_interval(
			track,
			CdTextInterval::new(Msf::new(s1, s2, s3), Msf::new(e1, e2, e3)),
		)?;
	}

	Ok(())
}

/// # Run Index.
const fn run_idx(kind: u8) -> usize { (kind - PACK_FIRST) as usize }



#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		Codec,
		stamp_pack,
	};

	/// # Build PACK.
	fn pack(kind: u8, track: u8, seq: u8, flags: u8, data: &[u8]) -> [u8; PACK_SIZE] {
		let mut out = [0_u8; PACK_SIZE];
		out[..4].copy_from_slice(&[kind, track, seq, flags]);
		out[4..16].copy_from_slice(data);
		stamp_pack(&mut out);
		out
	}

	/// # Size Info for One Block.
	fn sizeinfo(charset: u8, first: u8, last: u8, counts: &[(u8, u8)]) -> [u8; SIZEINFO_SIZE] {
		let mut out = [0_u8; SIZEINFO_SIZE];
		out[..4].copy_from_slice(&[charset, first, last, 0]);
		let mut total = 0;
		for &(kind, count) in counts {
			out[4 + run_idx(kind)] = count;
			total += count;
		}
		out[20] = total - 1;
		out[28] = 0x09;
		out
	}

	/// # Assemble Response.
	fn response(packs: &[[u8; PACK_SIZE]]) -> Vec<u8> {
		let len = u16::try_from(packs.len() * PACK_SIZE + 2).expect("Too big.");
		let mut out = Vec::new();
		out.extend_from_slice(&len.to_be_bytes());
		out.extend_from_slice(&[0, 0]);
		for p in packs { out.extend_from_slice(p); }
		out
	}

	/// # Title Block: Album, Repeat, Two.
	fn raw() -> Vec<u8> {
		let info = sizeinfo(0, 1, 2, &[(0x80, 1), (PACK_SIZEINFO, 3)]);
		response(&[
			pack(0x80, 0, 0, 0, b"Album\0\t\0Two\0"),
			pack(PACK_SIZEINFO, 0, 1, 0, &info[..12]),
			pack(PACK_SIZEINFO, 1, 2, 0, &info[12..24]),
			pack(PACK_SIZEINFO, 2, 3, 0, &info[24..]),
		])
	}

	#[test]
	fn t_repeat() {
		let raw = raw();
		let cdtext = CdText::deserialize(&raw).expect("CD-Text failed.");

		let block = cdtext.block(0).expect("Missing block.");
		assert_eq!(block.charset(), Charset::Latin1);
		assert_eq!(block.language(), 0x09);
		assert_eq!(block.first_track(), 1);
		assert_eq!(block.last_track(), 2);
		assert_eq!(block.get(CdTextField::Title, 0), Some("Album"));
		assert_eq!(block.get(CdTextField::Title, 1), Some("Album"), "Repeat not resolved.");
		assert_eq!(block.get(CdTextField::Title, 2), Some("Two"));
		assert_eq!(block.get(CdTextField::Performer, 1), None);
		assert!(cdtext.block(1).is_none());
		assert!(cdtext.toc().is_none());

		// And back again, tab and all.
		assert_eq!(cdtext.serialize().as_deref(), Ok(raw.as_slice()), "Re-serialization mismatch.");
	}

	#[test]
	fn t_repeat_double_tab() {
		// Single-byte blocks only repeat on a lone tab.
		let info = sizeinfo(0, 1, 2, &[(0x80, 1), (PACK_SIZEINFO, 3)]);
		let raw = response(&[
			pack(0x80, 0, 0, 0, b"Alb\0\t\t\0Two\0\0"),
			pack(PACK_SIZEINFO, 0, 1, 0, &info[..12]),
			pack(PACK_SIZEINFO, 1, 2, 0, &info[12..24]),
			pack(PACK_SIZEINFO, 2, 3, 0, &info[24..]),
		]);

		let cdtext = CdText::deserialize(&raw).expect("CD-Text failed.");
		assert_eq!(cdtext.get(CdTextField::Title, 0), Some("Alb"));
		assert_eq!(cdtext.get(CdTextField::Title, 1), Some("\t\t"), "Literal tabs were lost.");
		assert_eq!(cdtext.get(CdTextField::Title, 2), Some("Two"));
	}

	#[test]
	fn t_strict() {
		let mut raw = raw();
		raw[4 + 17] ^= 0xFF;

		assert!(CdText::deserialize(&raw).is_ok(), "Lenient parsing should ignore the CRC.");
		assert_eq!(CdText::deserialize_strict(&raw), Err(TocTocError::Corrupted));
		assert!(CdText::deserialize_strict(&self::raw()).is_ok());
	}

	#[test]
	fn t_skipped() {
		let info = sizeinfo(0, 1, 1, &[(0x80, 1), (PACK_SIZEINFO, 3)]);
		let raw = response(&[
			pack(0x80, 0, 0, 0, b"Album\0One\0\0\0"),
			pack(0x80, 0x80, 1, 0, b"Extension!!!"),
			pack(0x8B, 0, 1, 0, b"Gap Gap Gap!"),
			pack(PACK_SIZEINFO, 0, 1, 0, &info[..12]),
			pack(PACK_SIZEINFO, 1, 2, 0, &info[12..24]),
			pack(PACK_SIZEINFO, 2, 3, 0, &info[24..]),
		]);

		let cdtext = CdText::deserialize(&raw).expect("CD-Text failed.");
		assert_eq!(cdtext.get(CdTextField::Title, 0), Some("Album"));
		assert_eq!(cdtext.get(CdTextField::Title, 1), Some("One"));
	}

	#[test]
	fn t_bad() {
		// No size info.
		let raw = response(&[pack(0x80, 0, 0, 0, b"Album\0One\0\0\0")]);
		assert_eq!(CdText::deserialize(&raw), Err(TocTocError::Corrupted));

		// Unsupported character set.
		let info = sizeinfo(0x81, 1, 1, &[(PACK_SIZEINFO, 3)]);
		let raw = response(&[
			pack(PACK_SIZEINFO, 0, 0, 0, &info[..12]),
			pack(PACK_SIZEINFO, 1, 1, 0, &info[12..24]),
			pack(PACK_SIZEINFO, 2, 2, 0, &info[24..]),
		]);
		assert_eq!(CdText::deserialize(&raw), Err(TocTocError::Corrupted));

		// Short size info.
		let info = sizeinfo(0, 1, 1, &[(PACK_SIZEINFO, 2)]);
		let raw = response(&[
			pack(PACK_SIZEINFO, 0, 0, 0, &info[..12]),
			pack(PACK_SIZEINFO, 1, 1, 0, &info[12..24]),
		]);
		assert_eq!(CdText::deserialize(&raw), Err(TocTocError::Corrupted));

		// Intervals without a TOC.
		let info = sizeinfo(0, 1, 1, &[(PACK_TOC2, 1), (PACK_SIZEINFO, 3)]);
		let raw = response(&[
			pack(PACK_TOC2, 1, 0, 0, &[1, 1, 0, 0, 0, 0, 0, 2, 0, 1, 0, 0]),
			pack(PACK_SIZEINFO, 0, 1, 0, &info[..12]),
			pack(PACK_SIZEINFO, 1, 2, 0, &info[12..24]),
			pack(PACK_SIZEINFO, 2, 3, 0, &info[24..]),
		]);
		assert_eq!(CdText::deserialize(&raw), Err(TocTocError::Corrupted));

		// Not a multiple of eighteen.
		let mut raw = self::raw();
		raw[1] -= 1;
		assert_eq!(CdText::deserialize(&raw), Err(TocTocError::Corrupted));
	}

	#[test]
	fn t_empty() {
		let cdtext = CdText::deserialize(&[0, 2, 0, 0]).expect("CD-Text failed.");
		assert!(cdtext.is_empty());
		assert_eq!(cdtext.serialize().as_deref(), Ok(&[0_u8, 2, 0, 0][..]));
	}
}
