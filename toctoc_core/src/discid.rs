/*!
# Toc Toc: Disc IDs
*/

use base64::{
	Engine,
	engine::general_purpose::STANDARD,
};
use crate::{
	CD_FRAMES_PER_SECOND,
	CD_LEADIN,
	CD_SESSION_GAP,
	FullToc,
	Sessions,
	Toc,
	TocTocError,
	TRACK_SLOTS,
};
use sha1::{
	Digest,
	Sha1,
};
use std::fmt;



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Disc ID Source.
///
/// This holds the track range and absolute frame offsets (LBA + 150) used
/// to compute the freedb/CDDB and MusicBrainz identifiers. The lead-out
/// lives in slot zero.
///
/// Multi-session (enhanced) discs are normally identified by their audio
/// session alone, so [`DiscId::new`] drops the trailing data track and pulls
/// the lead-out back to the end of the first session. Use [`DiscId::naive`]
/// to identify the table of contents exactly as given.
pub struct DiscId {
	first: u8,
	last: u8,
	offsets: [u32; TRACK_SLOTS],
}

impl DiscId {
	#[must_use]
	/// # Naive.
	///
	/// Use every track, and the lead-out, as-is.
	pub fn naive(toc: &Toc) -> Self {
		Self::build(toc, toc.last_track(), toc.leadout().lba())
	}

	#[must_use]
	/// # New.
	///
	/// When `sessions` describes more than one session, the tracks are
	/// truncated before the first track of the last session, and the
	/// lead-out is moved back from that track's start by the session gap.
	///
	/// Without session information, a disc whose first track is audio and
	/// whose last track is data is assumed to be enhanced, and treated the
	/// same way.
	///
	/// Anything else, including a disc reported as single-session, is
	/// identified naively.
	pub fn new(toc: &Toc, sessions: Option<&Sessions>) -> Self {
		let first = toc.first_track();
		match sessions {
			Some(s) if s.is_multisession() => {
				if let Some(last) = s.track_number().checked_sub(1).filter(|&n| first <= n) {
					return Self::build(
						toc,
						last.min(toc.last_track()),
						s.lba().saturating_sub(CD_SESSION_GAP),
					);
				}
			},
			Some(_) => {},
			None => if first < toc.last_track() {
				if let (Some(a), Some(b)) = (toc.track(first), toc.track(toc.last_track())) {
					if ! a.is_data() && b.is_data() {
						return Self::build(
							toc,
							toc.last_track() - 1,
							b.lba().saturating_sub(CD_SESSION_GAP),
						);
					}
				}
			},
		}

		Self::naive(toc)
	}

	/// # From Full TOC.
	///
	/// Derive the regular table of contents and session summary from a full
	/// TOC, then proceed as with [`DiscId::new`].
	///
	/// ## Errors
	///
	/// Returns an error if the full TOC has no tracks or lead-out.
	pub fn from_full_toc(full: &FullToc) -> Result<Self, TocTocError> {
		let toc = full.to_toc()?;
		let sessions = full.to_sessions().ok();
		Ok(Self::new(&toc, sessions.as_ref()))
	}

	/// # Build.
	fn build(toc: &Toc, last: u8, leadout: u32) -> Self {
		let mut offsets = [0_u32; TRACK_SLOTS];
		offsets[0] = leadout.saturating_add(CD_LEADIN);
		for (num, entry) in toc.tracks().take_while(|(n, _)| *n <= last) {
			offsets[usize::from(num)] = entry.lba().saturating_add(CD_LEADIN);
		}

		Self { first: toc.first_track(), last, offsets }
	}
}

impl DiscId {
	#[must_use]
	/// # First Track.
	pub const fn first_track(&self) -> u8 { self.first }

	#[must_use]
	/// # Last Track.
	pub const fn last_track(&self) -> u8 { self.last }

	#[must_use]
	/// # Track Offset.
	///
	/// Return the absolute frame offset (LBA + 150) of track `num`.
	pub const fn offset(&self, num: u8) -> Option<u32> {
		if self.first <= num && num <= self.last { Some(self.offsets[num as usize]) }
		else { None }
	}

	#[must_use]
	/// # Sectors.
	///
	/// Return the absolute frame offset of the lead-out, i.e. the total
	/// number of sectors on the disc, lead-in included.
	pub const fn sectors(&self) -> u32 { self.offsets[0] }

	#[allow(clippy::integer_division)]
	#[must_use]
	/// # freedb/CDDB ID.
	pub fn freedb_id(&self) -> FreedbId {
		let n: u32 = (self.first..=self.last)
			.map(|num| digit_sum(self.offsets[usize::from(num)] / CD_FRAMES_PER_SECOND))
			.sum();

		let t = (self.offsets[0] / CD_FRAMES_PER_SECOND)
			.saturating_sub(self.offsets[usize::from(self.first)] / CD_FRAMES_PER_SECOND);
		let count = u32::from(self.last - self.first + 1);

		FreedbId(((n % 0xFF) << 24) | (t << 8) | count)
	}

	#[must_use]
	/// # MusicBrainz ID.
	///
	/// This is the SHA-1 of the uppercase hex first and last track numbers
	/// followed by all one hundred offset slots (the lead-out first, unused
	/// slots zero), base64-encoded with a URL-friendly alphabet.
	pub fn musicbrainz_id(&self) -> MusicBrainzId {
		use std::fmt::Write;

		let mut src = String::with_capacity(4 + 8 * TRACK_SLOTS);
		let _res = write!(src, "{:02X}{:02X}", self.first, self.last);
		for v in self.offsets { let _res = write!(src, "{v:08X}"); }

		let hash = Sha1::digest(src.as_bytes());
		let mut out = [0_u8; 28];
		for (b, v) in out.iter_mut().zip(STANDARD.encode(hash).bytes()) {
			*b = match v {
				b'+' => b'.',
				b'/' => b'_',
				b'=' => b'-',
				_ => v,
			};
		}

		MusicBrainzId(out)
	}

	#[must_use]
	/// # TOC String.
	///
	/// Return the space-separated first track, last track, lead-out and
	/// track offsets, the format used by MusicBrainz lookup URLs.
	pub fn toc_string(&self) -> String {
		let mut out = format!("{} {} {}", self.first, self.last, self.offsets[0]);
		for num in self.first..=self.last {
			out.push(' ');
			out.push_str(&self.offsets[usize::from(num)].to_string());
		}
		out
	}
}



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # freedb/CDDB ID.
///
/// Formats as eight lowercase hex digits.
pub struct FreedbId(u32);

impl fmt::Display for FreedbId {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:08x}", self.0)
	}
}

impl From<FreedbId> for u32 {
	#[inline]
	fn from(src: FreedbId) -> Self { src.0 }
}

impl FreedbId {
	#[must_use]
	/// # As Number.
	pub const fn get(self) -> u32 { self.0 }
}



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # MusicBrainz ID.
pub struct MusicBrainzId([u8; 28]);

impl AsRef<str> for MusicBrainzId {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for MusicBrainzId {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		<str as fmt::Display>::fmt(self.as_str(), f)
	}
}

impl PartialEq<str> for MusicBrainzId {
	#[inline]
	fn eq(&self, other: &str) -> bool { self.as_str() == other }
}

impl PartialEq<&str> for MusicBrainzId {
	#[inline]
	fn eq(&self, other: &&str) -> bool { self.as_str() == *other }
}

impl MusicBrainzId {
	#[must_use]
	/// # As Str.
	pub fn as_str(&self) -> &str {
		// The bytes are always drawn from the base64 alphabet.
		std::str::from_utf8(&self.0).unwrap_or_default()
	}
}



#[must_use]
/// # freedb/CDDB ID.
///
/// Compute the freedb ID for a table of contents. Without `sessions`, every
/// track is used as-is; with them, the adjustments described by
/// [`DiscId::new`] apply.
pub fn freedb_id(toc: &Toc, sessions: Option<&Sessions>) -> FreedbId {
	if sessions.is_some() { DiscId::new(toc, sessions).freedb_id() }
	else { DiscId::naive(toc).freedb_id() }
}

#[must_use]
/// # MusicBrainz ID.
///
/// Compute the MusicBrainz ID for a table of contents. Unlike [`freedb_id`],
/// enhanced-disc adjustments are applied even without `sessions`.
pub fn musicbrainz_id(toc: &Toc, sessions: Option<&Sessions>) -> MusicBrainzId {
	DiscId::new(toc, sessions).musicbrainz_id()
}

#[allow(clippy::integer_division)]
/// # Digit Sum.
const fn digit_sum(mut n: u32) -> u32 {
	let mut out = 0;
	while n > 0 {
		out += n % 10;
		n /= 10;
	}
	out
}
