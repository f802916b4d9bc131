/*!
# Toc Toc: MS-JIS

Decoding is a straight two-level table lookup: lead byte to page, trail byte
to character.

Encoding walks a trie keyed on the codepoint's (hi, mid, lo) bytes. Most
entries carry a direct code, but kana followed by a combining voiced or
semi-voiced mark only resolve once the _next_ codepoint is known, so those
also carry a successor trie.
*/

use encoding_rs::SHIFT_JIS;
use std::sync::OnceLock;



/// # Tables.
static TABLES: OnceLock<JisTables> = OnceLock::new();

/// # Combining Voiced Sound Mark.
const VOICED: u32 = 0x3099;

/// # Combining Semi-Voiced Sound Mark.
const SEMI_VOICED: u32 = 0x309A;

/// # Hiragana Taking a Voiced Mark.
///
/// The voiced form is always the next codepoint. Katakana follow the same
/// pattern `0x60` higher.
const KANA_VOICED: [u32; 20] = [
	0x304B, 0x304D, 0x304F, 0x3051, 0x3053, // K
	0x3055, 0x3057, 0x3059, 0x305B, 0x305D, // S
	0x305F, 0x3061, 0x3064, 0x3066, 0x3068, // T
	0x306F, 0x3072, 0x3075, 0x3078, 0x307B, // H
];

/// # Hiragana Taking a Semi-Voiced Mark.
///
/// The semi-voiced form is two codepoints higher.
const KANA_SEMI_VOICED: [u32; 5] = [0x306F, 0x3072, 0x3075, 0x3078, 0x307B];

/// # Irregular Compositions.
const KANA_EXTRA: [(u32, u32, u32); 8] = [
	(0x3046, VOICED, 0x3094),
	(0x30A6, VOICED, 0x30F4),
	(0x309D, VOICED, 0x309E),
	(0x30FD, VOICED, 0x30FE),
	(0x30EF, VOICED, 0x30F7),
	(0x30F0, VOICED, 0x30F8),
	(0x30F1, VOICED, 0x30F9),
	(0x30F2, VOICED, 0x30FA),
];

/// # Katakana Offset.
const KATAKANA: u32 = 0x60;



#[derive(Debug)]
/// # MS-JIS Tables.
pub(super) struct JisTables {
	/// # Single-Byte Characters.
	single: [Option<char>; 256],

	/// # Double-Byte Pages (by Lead Byte).
	pages: Vec<Option<Box<[Option<char>; 256]>>>,

	/// # Reverse Lookup.
	pub(super) trie: JisTrie,
}

impl JisTables {
	/// # Build.
	fn build() -> Self {
		let mut single = [None; 256];
		for b in (0..=u8::MAX).filter(|&b| ! is_lead(b)) {
			single[usize::from(b)] = decode_one(&[b]);
		}

		let mut pages: Vec<Option<Box<[Option<char>; 256]>>> = Vec::with_capacity(256);
		pages.resize_with(256, || None);
		for lead in (0..=u8::MAX).filter(|&b| is_lead(b)) {
			let mut page = Box::new([None; 256]);
			let mut any = false;
			for trail in (0x40..=0xFC_u8).filter(|&b| b != 0x7F) {
				if let Some(c) = decode_one(&[lead, trail]) {
					page[usize::from(trail)] = Some(c);
					any = true;
				}
			}
			if any { pages[usize::from(lead)] = Some(page); }
		}

		// Reverse everything that decodes, except NUL. Several byte
		// sequences can decode to the same character, so the encoder has
		// the final say on which one is used. Characters it refuses (the
		// user-defined area) map back to their own bytes.
		let mut trie = JisTrie::default();
		for (b, c) in (0..=u8::MAX).zip(single).filter_map(|(b, c)| Some((b, c?))) {
			if c != '\0' {
				trie.insert(c, encode_one(c).unwrap_or(JisCode::Single(b)));
			}
		}
		for (lead, page) in (0..=u8::MAX).zip(&pages) {
			let Some(page) = page else { continue; };
			for (trail, c) in (0..=u8::MAX).zip(page.iter()).filter_map(|(t, c)| Some((t, (*c)?))) {
				trie.insert(c, encode_one(c).unwrap_or(JisCode::Double(lead, trail)));
			}
		}

		// Compositions.
		for (base, mark, composed) in successors() {
			let Some(base) = char::from_u32(base) else { continue; };
			let Some(mark) = char::from_u32(mark) else { continue; };
			let Some(code) = char::from_u32(composed).and_then(encode_one) else { continue; };
			trie.insert_successor(base, mark, code);
		}

		Self { single, pages, trie }
	}

	/// # Page Lookup.
	fn double(&self, lead: u8, trail: u8) -> Option<char> {
		self.pages.get(usize::from(lead))?.as_ref()?[usize::from(trail)]
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Encoded Character.
pub(super) enum JisCode {
	/// # One Byte.
	Single(u8),

	/// # Two Bytes.
	Double(u8, u8),
}

impl JisCode {
	/// # Emit.
	fn emit<F>(self, cb: &mut F)
	where F: FnMut(&[u8]) {
		match self {
			Self::Single(a) => cb(&[a]),
			Self::Double(a, b) => cb(&[a, b]),
		}
	}
}



#[derive(Debug, Default)]
/// # Reverse Lookup Trie.
pub(super) struct JisTrie {
	/// # By High Byte.
	hi: Vec<Option<Box<JisMid>>>,
}

#[derive(Debug, Default)]
/// # Trie: Middle.
struct JisMid {
	/// # By Middle Byte.
	mid: Vec<Option<Box<JisLeaves>>>,
}

#[derive(Debug, Default)]
/// # Trie: Leaves.
struct JisLeaves {
	/// # By Low Byte.
	lo: Vec<Option<JisEntry>>,
}

#[derive(Debug, Default)]
/// # Trie Entry.
struct JisEntry {
	/// # Direct Code.
	code: Option<JisCode>,

	/// # Successors.
	next: Option<Box<JisTrie>>,
}

impl JisEntry {
	/// # Flush.
	///
	/// Emit the direct code, or a question mark if there isn't one.
	fn flush<F>(&self, cb: &mut F)
	where F: FnMut(&[u8]) {
		match self.code {
			Some(code) => code.emit(cb),
			None => cb(b"?"),
		}
	}

	/// # Successor Code.
	fn successor(&self, c: char) -> Option<JisCode> {
		self.next.as_ref()?.get(c)?.code
	}
}

impl JisTrie {
	/// # Get.
	fn get(&self, c: char) -> Option<&JisEntry> {
		let [_, hi, mid, lo] = u32::from(c).to_be_bytes();
		self.hi.get(usize::from(hi))?.as_ref()?
			.mid.get(usize::from(mid))?.as_ref()?
			.lo.get(usize::from(lo))?.as_ref()
	}

	/// # Entry (Mutable).
	fn entry(&mut self, c: char) -> &mut JisEntry {
		let [_, hi, mid, lo] = u32::from(c).to_be_bytes();
		let node = slot(&mut self.hi, usize::from(hi));
		let leaves = slot(&mut node.mid, usize::from(mid));
		slot(&mut leaves.lo, usize::from(lo))
	}

	/// # Insert.
	///
	/// The first code recorded for a given character wins.
	pub(super) fn insert(&mut self, c: char, code: JisCode) {
		let entry = self.entry(c);
		if entry.code.is_none() { entry.code = Some(code); }
	}

	/// # Insert Successor.
	///
	/// Record that `c` followed by `next` encodes as `code`.
	pub(super) fn insert_successor(&mut self, c: char, next: char, code: JisCode) {
		self.entry(c).next.get_or_insert_with(Box::default).insert(next, code);
	}
}



/// # Tables.
pub(super) fn tables() -> &'static JisTables { TABLES.get_or_init(JisTables::build) }

/// # Decode Prefix.
///
/// Decode up to the first terminator, returning the string and the number of
/// bytes consumed. A lone NUL also ends the string; its partner is consumed
/// if present.
pub(super) fn decode_prefix(tables: &JisTables, src: &[u8]) -> (String, usize) {
	let mut out = String::with_capacity(src.len());
	let mut pos = 0;
	while let Some(&b) = src.get(pos) {
		if b == 0 {
			pos += 1;
			if src.get(pos) == Some(&0) { pos += 1; }
			return (out, pos);
		}

		if is_lead(b) {
			if let Some(&trail) = src.get(pos + 1).filter(|&&t| 0x40 <= t) {
				out.push(tables.double(b, trail).unwrap_or('?'));
				pos += 2;
			}
			// Dangling lead.
			else {
				out.push('?');
				pos += 1;
			}
		}
		else {
			out.push(tables.single[usize::from(b)].unwrap_or('?'));
			pos += 1;
		}
	}

	(out, pos)
}

/// # Encode Each.
///
/// Feed each output character to the callback. Entries with successors are
/// held until the next codepoint arrives (or the input ends); if that
/// codepoint doesn't complete the pair, the held entry is flushed and the
/// codepoint is processed from scratch.
pub(super) fn encode_each<F>(trie: &JisTrie, src: &str, mut cb: F)
where F: FnMut(&[u8]) {
	let mut pending: Option<&JisEntry> = None;
	for c in src.chars() {
		if let Some(prev) = pending.take() {
			if let Some(code) = prev.successor(c) {
				code.emit(&mut cb);
				continue;
			}
			prev.flush(&mut cb);
		}

		match trie.get(c) {
			Some(entry) if entry.next.is_some() => { pending = Some(entry); },
			Some(JisEntry { code: Some(code), .. }) => code.emit(&mut cb),
			_ => cb(b"?"),
		}
	}

	if let Some(prev) = pending { prev.flush(&mut cb); }
}



/// # Is Lead Byte?
const fn is_lead(b: u8) -> bool { matches!(b, 0x81..=0x9F | 0xE0..=0xFC) }

/// # Decode One Character.
fn decode_one(src: &[u8]) -> Option<char> {
	let s = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(src)?;
	let mut chars = s.chars();
	let c = chars.next()?;
	if chars.next().is_none() { Some(c) }
	else { None }
}

/// # Encode One Character.
fn encode_one(c: char) -> Option<JisCode> {
	let mut buf = [0_u8; 4];
	let (out, _, had_errors) = SHIFT_JIS.encode(c.encode_utf8(&mut buf));
	if had_errors { return None; }
	match *out {
		[a] => Some(JisCode::Single(a)),
		[a, b] => Some(JisCode::Double(a, b)),
		_ => None,
	}
}

/// # Slot.
///
/// Return the value at `idx`, growing the vector and/or initializing the
/// entry as needed.
fn slot<T: Default>(v: &mut Vec<Option<T>>, idx: usize) -> &mut T {
	if v.len() <= idx { v.resize_with(idx + 1, || None); }
	v[idx].get_or_insert_with(T::default)
}

/// # Successors.
///
/// Return all `(base, mark, composed)` kana triples.
fn successors() -> impl Iterator<Item=(u32, u32, u32)> {
	KANA_VOICED.into_iter()
		.flat_map(|b| [
			(b, VOICED, b + 1),
			(b + KATAKANA, VOICED, b + KATAKANA + 1),
		])
		.chain(KANA_SEMI_VOICED.into_iter().flat_map(|b| [
			(b, SEMI_VOICED, b + 2),
			(b + KATAKANA, SEMI_VOICED, b + KATAKANA + 2),
		]))
		.chain(KANA_EXTRA)
}



#[cfg(test)]
mod test {
	use super::*;

	/// # Encode to Vec.
	fn enc(trie: &JisTrie, src: &str) -> Vec<u8> {
		let mut out = Vec::new();
		encode_each(trie, src, |v| out.extend_from_slice(v));
		out
	}

	#[test]
	fn t_decode() {
		let t = tables();
		assert_eq!(decode_prefix(t, b"\x82\xa9\x82\xaa"), ("かが".to_owned(), 4));
		assert_eq!(decode_prefix(t, b"A\xb1\0\0B"), ("Aｱ".to_owned(), 4));

		// A lead byte followed by a control byte is not a pair.
		assert_eq!(decode_prefix(t, b"\x82\x10"), ("?\u{10}".to_owned(), 2));
	}

	#[test]
	fn t_table_round_trip() {
		let t = tables();
		let all = t.single.iter()
			.chain(t.pages.iter().flatten().flat_map(|p| p.iter()))
			.filter_map(|c| *c)
			.filter(|&c| c != '\0');

		let mut buf = [0_u8; 4];
		let mut total = 0;
		for c in all {
			let raw = enc(&t.trie, c.encode_utf8(&mut buf));
			let (out, len) = decode_prefix(t, &raw);
			assert_eq!(len, raw.len(), "Bad length for {c:?}.");
			assert_eq!(out.chars().next(), Some(c), "Round trip failed for {c:?}.");
			assert_eq!(out.chars().count(), 1, "Round trip failed for {c:?}.");
			total += 1;
		}
		assert!(7000 < total, "Suspiciously few characters.");

		// The user-defined area maps back to itself.
		assert_eq!(decode_prefix(t, b"\xF0\x40"), ("\u{E000}".to_owned(), 2));
		assert_eq!(enc(&t.trie, "\u{E000}"), [0xF0, 0x40]);
	}

	#[test]
	fn t_successors() {
		let t = &tables().trie;
		assert_eq!(enc(t, "か"), [0x82, 0xA9]);
		assert_eq!(enc(t, "が"), [0x82, 0xAA]);
		assert_eq!(enc(t, "か\u{3099}"), [0x82, 0xAA], "Composition failed.");
		assert_eq!(enc(t, "ハ\u{309A}"), [0x83, 0x70], "Composition failed.");
		assert_eq!(enc(t, "ウ\u{3099}"), [0x83, 0x94], "Composition failed.");

		// A base without a matching mark flushes its own code.
		assert_eq!(enc(t, "かA"), [0x82, 0xA9, b'A']);
		assert_eq!(enc(t, "かか"), [0x82, 0xA9, 0x82, 0xA9]);
	}

	#[test]
	fn t_partial_flush() {
		// A character that is only meaningful with a successor.
		let mut trie = JisTrie::default();
		trie.insert('a', JisCode::Single(b'a'));
		trie.insert_successor('x', 'y', JisCode::Double(0x88, 0x9F));

		assert_eq!(enc(&trie, "xy"), [0x88, 0x9F]);
		assert_eq!(enc(&trie, "xa"), b"?a", "Partial match should flush as '?'.");
		assert_eq!(enc(&trie, "xz"), b"??", "Partial match should flush as '?'.");
		assert_eq!(enc(&trie, "ax"), b"a?", "Trailing partial match should flush.");
		assert_eq!(enc(&trie, "xxy"), [b'?', 0x88, 0x9F]);
		assert_eq!(enc(&trie, ""), b"");
	}
}
