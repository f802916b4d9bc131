/*!
# Toc Toc: CD-Text Pack Types
*/

use std::fmt;



/// # Pack: Disc ID.
pub(super) const PACK_DISCID: u8 = 0x86;

/// # Pack: Genre.
pub(super) const PACK_GENRE: u8 = 0x87;

/// # Pack: TOC.
pub(super) const PACK_TOC: u8 = 0x88;

/// # Pack: Second TOC (Intervals).
pub(super) const PACK_TOC2: u8 = 0x89;

/// # Pack: Size Info.
pub(super) const PACK_SIZEINFO: u8 = 0x8F;

/// # First Pack Type.
pub(super) const PACK_FIRST: u8 = 0x80;

/// # Number of Pack Types.
pub(super) const PACK_TYPES: usize = 16;



/// # Helper: CD-Text Fields.
macro_rules! fields {
	( $( $k:ident $v:literal $idx:literal $vstr:literal ),+ $(,)? ) => (
		#[repr(u8)]
		#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
		/// # CD-Text Field.
		///
		/// The textual fields of a CD-Text block, each represented on the
		/// wire by its own pack type.
		pub enum CdTextField {
			$(
				#[doc = concat!("# ", $vstr, ".")]
				$k = $v,
			)+
		}

		impl CdTextField {
			/// # All Fields.
			pub const ALL: [Self; 8] = [ $( Self::$k, )+ ];

			#[must_use]
			/// # As Str.
			///
			/// Return the field as an uppercase string, similar to how it
			/// would appear in track metadata.
			pub const fn as_str(self) -> &'static str {
				match self {
					$( Self::$k => $vstr, )+
				}
			}

			#[must_use]
			/// # From Pack Type.
			pub const fn from_pack_type(src: u8) -> Option<Self> {
				match src {
					$( $v => Some(Self::$k), )+
					_ => None,
				}
			}

			#[must_use]
			/// # Storage Index.
			pub(super) const fn index(self) -> usize {
				match self {
					$( Self::$k => $idx, )+
				}
			}
		}
	);
}

fields! {
	Title      0x80 0 "TITLE",
	Performer  0x81 1 "PERFORMER",
	Songwriter 0x82 2 "SONGWRITER",
	Composer   0x83 3 "COMPOSER",
	Arranger   0x84 4 "ARRANGER",
	Message    0x85 5 "MESSAGE",
	Private    0x8D 6 "PRIVATE",
	UpcIsrc    0x8E 7 "UPC_ISRC",
}

impl AsRef<str> for CdTextField {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for CdTextField {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		<str as fmt::Display>::fmt(self.as_str(), f)
	}
}

impl CdTextField {
	#[must_use]
	/// # Pack Type.
	pub const fn pack_type(self) -> u8 { self as u8 }

	#[must_use]
	/// # Always Single-Byte?
	///
	/// UPC/EAN and ISRC codes are plain ASCII digits and letters regardless
	/// of the block's character set.
	pub const fn is_single_byte(self) -> bool { matches!(self, Self::UpcIsrc) }
}



/// # Is Known Pack Type?
///
/// Return the zero-based pack index for the types this library understands.
/// Gaps and anything outside `0x80..=0x8F` return `None`.
pub(super) const fn pack_index(src: u8) -> Option<usize> {
	match src {
		0x80..=0x89 | 0x8D..=0x8F => Some((src - PACK_FIRST) as usize),
		_ => None,
	}
}
