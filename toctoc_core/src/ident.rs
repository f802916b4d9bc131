/*!
# Toc Toc: Media Catalog Numbers and ISRCs
*/

use crate::TocTocError;
use std::fmt;
use trimothy::TrimSliceMatches;



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # Media Catalog Number.
///
/// This is a simple wrapper for the UPC/EAN barcode a disc reports as its
/// MCN, ensuring validity and consistent formatting.
///
/// ## Examples
///
/// ```
/// use toctoc_core::Mcn;
///
/// let mcn = Mcn::try_from("0731455829921").unwrap();
/// assert_eq!(mcn.to_string(), "0731455829921");
/// assert_eq!(mcn.pretty(), "0-73145-58299-2-1");
/// ```
pub struct Mcn([u8; 13]);

impl AsRef<str> for Mcn {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for Mcn {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		<str as fmt::Display>::fmt(self.as_str(), f)
	}
}

impl TryFrom<&[u8]> for Mcn {
	type Error = TocTocError;

	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		// Drives pad with whitespace or NULs; either way, nothing there is
		// the same as nothing.
		let src = trim(src);
		if src.iter().all(|&b| b == b'0') { return Err(TocTocError::NoData); }

		// UPCs are EANs with an implied leading zero.
		if ! (12..=13).contains(&src.len()) || ! src.iter().all(u8::is_ascii_digit) {
			return Err(TocTocError::Corrupted);
		}

		let mut out = [b'0'; 13];
		out[13 - src.len()..].copy_from_slice(src);

		if is_ean13(&out) { Ok(Self(out)) }
		else { Err(TocTocError::Corrupted) }
	}
}

impl TryFrom<&str> for Mcn {
	type Error = TocTocError;

	#[inline]
	fn try_from(src: &str) -> Result<Self, Self::Error> {
		Self::try_from(src.as_bytes())
	}
}

impl Mcn {
	#[must_use]
	/// # As Str.
	pub fn as_str(&self) -> &str {
		// All values are ASCII digits.
		std::str::from_utf8(self.0.as_slice()).unwrap_or_default()
	}

	#[must_use]
	/// # Pretty.
	///
	/// Format the number with hyphens, UPC-style if the first digit is zero
	/// and EAN-style otherwise.
	pub fn pretty(&self) -> String {
		let s = self.as_str();
		if self.0[0] == b'0' {
			format!("0-{}-{}-{}-{}", &s[1..6], &s[6..11], &s[11..12], &s[12..])
		}
		else {
			format!("{}-{}-{}", &s[..1], &s[1..7], &s[7..])
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # ISRC.
///
/// An International Standard Recording Code: a two-letter country code,
/// three-character registrant, two-digit year, and five-digit designation,
/// twelve characters in all.
///
/// Hyphenated input is accepted; letters are normalized to uppercase.
///
/// ## Examples
///
/// ```
/// use toctoc_core::Isrc;
///
/// let isrc = Isrc::try_from("us-s1z-99-00001").unwrap();
/// assert_eq!(isrc.to_string(), "USS1Z9900001");
/// assert_eq!(isrc.country(), "US");
/// ```
pub struct Isrc([u8; 12]);

impl AsRef<str> for Isrc {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for Isrc {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		<str as fmt::Display>::fmt(self.as_str(), f)
	}
}

impl TryFrom<&[u8]> for Isrc {
	type Error = TocTocError;

	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		let src = trim(src);
		if src.iter().all(|&b| b == b'0' || b == b'-') {
			return Err(TocTocError::NoData);
		}

		let mut out = [0_u8; 12];
		let mut len = 0;
		for b in src.iter().copied().filter(|&b| b != b'-') {
			if len == 12 { return Err(TocTocError::Corrupted); }
			out[len] = b.to_ascii_uppercase();
			len += 1;
		}

		if
			len == 12 &&
			out[..2].iter().all(u8::is_ascii_uppercase) &&
			out[2..5].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) &&
			out[5..].iter().all(u8::is_ascii_digit)
		{
			Ok(Self(out))
		}
		else { Err(TocTocError::Corrupted) }
	}
}

impl TryFrom<&str> for Isrc {
	type Error = TocTocError;

	#[inline]
	fn try_from(src: &str) -> Result<Self, Self::Error> {
		Self::try_from(src.as_bytes())
	}
}

impl Isrc {
	#[must_use]
	/// # As Str.
	pub fn as_str(&self) -> &str {
		// All values are ASCII alphanumerics.
		std::str::from_utf8(self.0.as_slice()).unwrap_or_default()
	}

	#[must_use]
	/// # Country Code.
	pub fn country(&self) -> &str { &self.as_str()[..2] }

	#[must_use]
	/// # Registrant Code.
	pub fn registrant(&self) -> &str { &self.as_str()[2..5] }

	#[must_use]
	/// # Year (Two Digits).
	pub fn year(&self) -> &str { &self.as_str()[5..7] }

	#[must_use]
	/// # Designation Code.
	pub fn designation(&self) -> &str { &self.as_str()[7..] }
}



/// # Trim.
///
/// Strip surrounding whitespace and NULs.
fn trim(src: &[u8]) -> &[u8] {
	src.trim_start_matches(|b| b.is_ascii_whitespace() || b == 0)
		.trim_end_matches(|b| b.is_ascii_whitespace() || b == 0)
}

/// # Is EAN13?
///
/// The digits are weighted 1, 3, 1, 3… from the left; the final one must
/// bring the total up to a multiple of ten.
fn is_ean13(src: &[u8; 13]) -> bool {
	let total: u32 = src[..12].iter()
		.zip([1, 3].into_iter().cycle())
		.map(|(&b, w)| u32::from(b ^ b'0') * w)
		.sum();

	(10 - total % 10) % 10 == u32::from(src[12] ^ b'0')
}
