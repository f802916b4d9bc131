/*!
# Toc Toc: Character Sets
*/

mod msjis;
mod single;

use crate::TocTocError;
use std::fmt;



#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # CD-Text Character Set.
///
/// CD-Text blocks declare one of these encodings in their SIZEINFO. All
/// conversions go to/from UTF-8.
///
/// Decoding never fails; bytes without a mapping decode as `'?'`, and
/// unterminated input is decoded to its end.
///
/// Encoding replaces any character the target cannot represent with `'?'`.
/// [`Charset::encoded_len`] returns the _exact_ number of bytes
/// [`Charset::encode`] will produce, terminator included, so buffers can be
/// sized ahead of time.
///
/// ```
/// use toctoc_core::Charset;
///
/// let enc = Charset::Latin1.encode("Café");
/// assert_eq!(enc, b"Caf\xe9\0");
/// assert_eq!(Charset::Latin1.encoded_len("Café"), enc.len());
/// assert_eq!(Charset::Latin1.decode(&enc), "Café");
///
/// // Unsupported characters become question marks.
/// assert_eq!(Charset::Ascii.encode("Café"), b"Caf?\0");
/// ```
pub enum Charset {
	#[default]
	/// # ISO-8859-1 (Latin-1).
	Latin1 = 0x00,

	/// # ISO 646 (ASCII).
	Ascii = 0x01,

	/// # MS-JIS (Shift-JIS).
	MsJis = 0x80,
}

impl fmt::Display for Charset {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<u8> for Charset {
	type Error = TocTocError;

	#[inline]
	fn try_from(src: u8) -> Result<Self, Self::Error> {
		Self::from_code(src).ok_or(TocTocError::Corrupted)
	}
}

impl Charset {
	#[must_use]
	/// # From Code.
	///
	/// Return the character set corresponding to the CD-Text SIZEINFO code,
	/// if supported.
	pub const fn from_code(src: u8) -> Option<Self> {
		match src {
			0x00 => Some(Self::Latin1),
			0x01 => Some(Self::Ascii),
			0x80 => Some(Self::MsJis),
			_ => None,
		}
	}

	#[must_use]
	/// # Code.
	pub const fn code(self) -> u8 { self as u8 }

	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Latin1 => "ISO-8859-1",
			Self::Ascii => "ASCII",
			Self::MsJis => "MS-JIS",
		}
	}

	#[must_use]
	/// # Double-Byte?
	///
	/// MS-JIS is a (mostly) double-byte encoding with a two-byte terminator.
	pub const fn is_double_byte(self) -> bool { matches!(self, Self::MsJis) }

	#[must_use]
	/// # Terminator.
	pub(crate) const fn terminator(self) -> &'static [u8] {
		if self.is_double_byte() { &[0, 0] }
		else { &[0] }
	}
}

impl Charset {
	#[must_use]
	/// # Decode.
	///
	/// Decode `src` to a UTF-8 string, stopping at the first terminator (if
	/// any).
	pub fn decode(self, src: &[u8]) -> String { self.decode_prefix(src).0 }

	#[must_use]
	/// # Decode Prefix.
	///
	/// Decode the first string in `src`, returning it along with the number
	/// of bytes consumed, terminator included.
	pub(crate) fn decode_prefix(self, src: &[u8]) -> (String, usize) {
		match self {
			Self::Latin1 => single::decode_prefix(&single::LATIN1, src),
			Self::Ascii => single::decode_prefix(&single::ASCII, src),
			Self::MsJis => msjis::decode_prefix(msjis::tables(), src),
		}
	}
}

impl Charset {
	#[must_use]
	/// # Encoded Length.
	///
	/// Return the exact number of bytes, terminator included, that
	/// [`Charset::encode`] would produce for `src`.
	pub fn encoded_len(self, src: &str) -> usize {
		let mut len = self.terminator().len();
		self.encode_each(src, |chunk| { len += chunk.len(); });
		len
	}

	/// # Encode Into.
	///
	/// Encode `src` and a terminator into the start of `dst`, returning
	/// the number of bytes written.
	///
	/// ## Errors
	///
	/// If `dst` is too small, nothing is written and
	/// [`TocTocError::TooSmall`] is returned with the required length.
	pub fn encode_into(self, src: &str, dst: &mut [u8]) -> Result<usize, TocTocError> {
		let len = self.encoded_len(src);
		if dst.len() < len { return Err(TocTocError::TooSmall(len)); }

		let mut pos = 0;
		self.encode_each(src, |chunk| {
			dst[pos..pos + chunk.len()].copy_from_slice(chunk);
			pos += chunk.len();
		});

		let term = self.terminator();
		dst[pos..pos + term.len()].copy_from_slice(term);
		pos += term.len();

		if pos == len { Ok(len) }
		else { Err(TocTocError::Internal) }
	}

	#[must_use]
	/// # Encode.
	///
	/// Encode `src` and a terminator into a new vector.
	pub fn encode(self, src: &str) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.encoded_len(src));
		self.encode_each(src, |chunk| out.extend_from_slice(chunk));
		out.extend_from_slice(self.terminator());
		out
	}

	/// # Encode Each.
	///
	/// Encode `src` one output character at a time, passing the bytes of
	/// each to the callback. The terminator is not included.
	pub(crate) fn encode_each<F>(self, src: &str, cb: F)
	where F: FnMut(&[u8]) {
		match self {
			Self::Latin1 => single::encode_each(&single::LATIN1, src, cb),
			Self::Ascii => single::encode_each(&single::ASCII, src, cb),
			Self::MsJis => msjis::encode_each(&msjis::tables().trie, src, cb),
		}
	}
}



#[cfg(test)]
mod test {
	use super::*;

	const ALL: [Charset; 3] = [Charset::Latin1, Charset::Ascii, Charset::MsJis];

	#[test]
	fn t_codes() {
		for c in ALL {
			assert_eq!(Charset::from_code(c.code()), Some(c), "Code round trip failed.");
			assert_eq!(Charset::try_from(c.code()), Ok(c));
		}
		assert_eq!(Charset::from_code(0x81), None, "Korean is not supported.");
		assert_eq!(Charset::try_from(0x82), Err(TocTocError::Corrupted));
	}

	#[test]
	fn t_encoded_len() {
		for c in ALL {
			for s in [
				"",
				"Hello World",
				"Björk",
				"\u{0}",
				"日本語のテキスト",
				"が",
				"か\u{3099}",
				"か\u{3099}き",
				"ハ\u{309A}",
				"か",
				"\u{1F600} emoji",
			] {
				let enc = c.encode(s);
				assert_eq!(
					c.encoded_len(s),
					enc.len(),
					"{c} length mismatch for {s:?}.",
				);
				assert!(enc.ends_with(c.terminator()), "{c} missing terminator for {s:?}.");
			}
		}
	}

	#[test]
	fn t_encode_into() {
		for c in ALL {
			let s = "Track Two";
			let len = c.encoded_len(s);

			// One short.
			let mut buf = vec![0xFF_u8; len - 1];
			assert_eq!(c.encode_into(s, &mut buf), Err(TocTocError::TooSmall(len)));
			assert!(buf.iter().all(|&b| b == 0xFF), "{c} wrote to an undersized buffer.");

			// Just right.
			let mut buf = vec![0xFF_u8; len + 3];
			assert_eq!(c.encode_into(s, &mut buf), Ok(len));
			assert_eq!(&buf[..len], c.encode(s).as_slice(), "{c} encode_into/encode mismatch.");
			assert_eq!(&buf[len..], &[0xFF, 0xFF, 0xFF], "{c} wrote too much.");
		}
	}

	#[test]
	fn t_round_trip() {
		for s in ["", "Hello World", "~!@#$%^&*()_+{}|:<>?`-=[]\\;',./"] {
			for c in ALL {
				assert_eq!(c.decode(&c.encode(s)), s, "{c} round trip failed.");
			}
		}

		let s = "Ça va, Björk? ¡Sí! ÿ";
		assert_eq!(Charset::Latin1.decode(&Charset::Latin1.encode(s)), s);
		assert_eq!(Charset::Ascii.decode(&Charset::Ascii.encode(s)), "?a va, Bj?rk? ?S?! ?");

		let s = "東京事変 群青日和 ｱｲｳ";
		assert_eq!(Charset::MsJis.decode(&Charset::MsJis.encode(s)), s);
	}

	#[test]
	fn t_question_idempotent() {
		for c in ALL {
			let once = c.decode(&c.encode("\u{1F600}"));
			assert_eq!(once, "?", "{c} should substitute unmappable characters.");
			assert_eq!(c.decode(&c.encode(&once)), "?", "{c} substitution should be stable.");
		}
	}

	#[test]
	fn t_decode_unterminated() {
		assert_eq!(Charset::Latin1.decode(b"abc"), "abc");
		assert_eq!(Charset::Latin1.decode_prefix(b"abc"), ("abc".to_owned(), 3));
		assert_eq!(Charset::Latin1.decode_prefix(b"ab\0cd\0"), ("ab".to_owned(), 3));
		assert_eq!(Charset::MsJis.decode_prefix(b"ab\0\0cd\0\0"), ("ab".to_owned(), 4));

		// A dangling lead byte.
		assert_eq!(Charset::MsJis.decode(b"ab\x82"), "ab?");
	}
}
