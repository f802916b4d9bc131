/*!
# Toc Toc: Disc
*/

use crate::{
	CD_LEADOUT_LABEL,
	CdText,
	CdTextField,
	Codec,
	Device,
	DiscId,
	FreedbId,
	FullToc,
	Isrc,
	Mcn,
	MusicBrainzId,
	ReadOptions,
	Sessions,
	Toc,
	TocTocError,
};
use dactyl::NoHash;
use std::{
	collections::HashMap,
	fmt,
};



#[derive(Debug, Clone)]
/// # Disc.
///
/// A loaded and parsed compact disc: the table of contents, plus whichever
/// optional structures the [`ReadOptions`] asked for and the [`Device`] was
/// able to provide.
///
/// ## Examples
///
/// ```
/// use toctoc_core::{Codec, Disc, MemoryDevice, ReadOptions, Toc};
///
/// let toc = Toc::from_lbas(1, &[0, 20_000], 40_000).unwrap();
/// let mut dev = MemoryDevice::default().with_toc(toc.serialize().unwrap());
///
/// let disc = Disc::read(&mut dev, ReadOptions::default()).unwrap();
/// assert_eq!(disc.toc(), &toc);
/// assert!(disc.cdtext().is_none());
/// ```
pub struct Disc {
	/// # Disc Table of Contents.
	toc: Toc,

	/// # Session Info.
	sessions: Option<Sessions>,

	/// # Full TOC.
	full_toc: Option<FullToc>,

	/// # CD-Text.
	cdtext: Option<CdText>,

	/// # Media Catalog Number.
	mcn: Option<Mcn>,

	/// # Track ISRCs.
	isrcs: HashMap<u8, Isrc, NoHash>,
}

impl fmt::Display for Disc {
	/// # Summarize the Disc.
	///
	/// This prints various disc identifiers and table of contents-type
	/// information in a nice little table.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		/// # Divider.
		const DIVIDER: &str = "----------------------------------------\n";

		// A few key/value pairs.
		let mut kv: Vec<(&str, String)> = vec![
			("freedb:", self.freedb_id().to_string()),
			("MusicBrainz:", self.musicbrainz_id().to_string()),
		];
		if let Some(mcn) = self.mcn.as_ref() {
			kv.push(("MCN:", mcn.pretty()));
		}
		if let Some(s) = self.sessions.as_ref().filter(|s| s.is_multisession()) {
			kv.push(("Sessions:", s.last_session().to_string()));
		}
		if let Some(cdtext) = self.cdtext.as_ref() {
			for (k, field) in [("Title:", CdTextField::Title), ("Performer:", CdTextField::Performer)] {
				if let Some(v) = cdtext.get(field, 0) { kv.push((k, v.to_owned())); }
			}
		}

		let col_max: usize = kv.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
		for (k, v) in kv {
			writeln!(f, "{k:col_max$} {v}")?;
		}

		// Start the table of contents.
		writeln!(
			f,
			"\n##   FIRST    LAST  LENGTH  {}",
			if self.isrcs.is_empty() { "" } else { "ISRC" },
		)?;
		f.write_str(DIVIDER)?;

		for (num, entry) in self.toc.tracks() {
			let start = entry.lba();
			let len = self.toc.track_len(num).unwrap_or_default();
			if entry.is_data() {
				writeln!(f, "{num:02}  {start:>6}                  DATA TRACK")?;
			}
			else {
				writeln!(
					f,
					"{num:02}  {start:>6}  {:>6}  {len:>6}  {}",
					(start + len).saturating_sub(1),
					self.isrc(num).map_or("", Isrc::as_str),
				)?;
			}
		}

		// The leadout.
		writeln!(
			f,
			"{CD_LEADOUT_LABEL}  {:>6}                    LEAD-OUT",
			self.toc.leadout().lba(),
		)?;

		// Close it off!
		f.write_str(DIVIDER)
	}
}

impl Disc {
	/// # Read.
	///
	/// Load and parse the table of contents from the device, along with any
	/// of the optional structures enabled in `opts`.
	///
	/// If the device can't provide one of the optional structures, it is
	/// simply left out. MCNs and ISRCs missing from the drive fall back to
	/// the CD-Text, if any.
	///
	/// ## Errors
	///
	/// Returns an error if the table of contents cannot be read, or if any
	/// response the device does return fails to parse.
	pub fn read<D>(dev: &mut D, opts: ReadOptions) -> Result<Self, TocTocError>
	where D: Device + ?Sized {
		let toc = Toc::deserialize(&dev.read_toc()?)?;

		let sessions =
			if opts.sessions() { optional(dev.read_sessions(), Sessions::deserialize)? }
			else { None };

		let full_toc =
			if opts.full_toc() { optional(dev.read_full_toc(), FullToc::deserialize)? }
			else { None };

		let cdtext =
			if opts.cdtext() {
				let parse: fn(&[u8]) -> Result<CdText, TocTocError> =
					if opts.strict() { CdText::deserialize_strict }
					else { CdText::deserialize };
				optional(dev.read_cdtext(), parse)?.filter(|c| ! c.is_empty())
			}
			else { None };

		// The drive is the primary source for identifiers, but CD-Text might
		// have them too.
		let mcn =
			if opts.mcn() {
				dev.read_mcn().ok()
					.and_then(|v| Mcn::try_from(v.as_str()).ok())
					.or_else(|| {
						let v = cdtext.as_ref()?.get(CdTextField::UpcIsrc, 0)?;
						Mcn::try_from(v).ok()
					})
			}
			else { None };

		let mut isrcs = HashMap::with_hasher(NoHash::default());
		if opts.isrc() {
			for (num, _) in toc.audio_tracks() {
				let isrc = dev.read_isrc(num).ok()
					.and_then(|v| Isrc::try_from(v.as_str()).ok())
					.or_else(|| {
						let v = cdtext.as_ref()?.get(CdTextField::UpcIsrc, num)?;
						Isrc::try_from(v).ok()
					});
				if let Some(isrc) = isrc { isrcs.insert(num, isrc); }
			}
		}

		Ok(Self { toc, sessions, full_toc, cdtext, mcn, isrcs })
	}
}

impl Disc {
	#[must_use]
	/// # Table of Contents.
	pub const fn toc(&self) -> &Toc { &self.toc }

	#[must_use]
	/// # Session Info.
	pub const fn sessions(&self) -> Option<&Sessions> { self.sessions.as_ref() }

	#[must_use]
	/// # Full TOC.
	pub const fn full_toc(&self) -> Option<&FullToc> { self.full_toc.as_ref() }

	#[must_use]
	/// # CD-Text.
	pub const fn cdtext(&self) -> Option<&CdText> { self.cdtext.as_ref() }

	#[must_use]
	/// # Media Catalog Number.
	pub const fn mcn(&self) -> Option<Mcn> { self.mcn }

	#[must_use]
	/// # ISRC.
	pub fn isrc(&self, num: u8) -> Option<&Isrc> { self.isrcs.get(&num) }
}

impl Disc {
	#[must_use]
	/// # Disc ID.
	///
	/// Session info, when available, is taken from the session response,
	/// then the full TOC; otherwise [`DiscId::new`] falls back on its
	/// enhanced-disc heuristic.
	pub fn disc_id(&self) -> DiscId {
		let sessions = self.sessions.or_else(||
			self.full_toc.as_ref().and_then(|f| f.to_sessions().ok())
		);
		DiscId::new(&self.toc, sessions.as_ref())
	}

	#[must_use]
	/// # freedb/CDDB ID.
	pub fn freedb_id(&self) -> FreedbId { self.disc_id().freedb_id() }

	#[must_use]
	/// # MusicBrainz ID.
	pub fn musicbrainz_id(&self) -> MusicBrainzId { self.disc_id().musicbrainz_id() }
}



/// # Optional Structure.
///
/// Device failures mean the structure isn't there; parse failures mean it
/// is, but broken.
fn optional<T, F>(raw: Result<Vec<u8>, TocTocError>, parse: F)
-> Result<Option<T>, TocTocError>
where F: FnOnce(&[u8]) -> Result<T, TocTocError> {
	match raw {
		Ok(raw) => parse(&raw).map(Some),
		Err(_) => Ok(None),
	}
}
