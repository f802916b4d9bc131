/*!
# Toc Toc: Read Options
*/



/// # FLAG: Read Sessions.
const FLAG_SESSIONS: u8 = 0b0000_0001;

/// # FLAG: Read Full TOC.
const FLAG_FULL_TOC: u8 = 0b0000_0010;

/// # FLAG: Read CD-Text.
const FLAG_CDTEXT: u8 =   0b0000_0100;

/// # FLAG: Read MCN.
const FLAG_MCN: u8 =      0b0000_1000;

/// # FLAG: Read ISRCs.
const FLAG_ISRC: u8 =     0b0001_0000;

/// # FLAG: Strict CD-Text CRCs.
const FLAG_STRICT: u8 =   0b0010_0000;

/// # FLAG: Default.
const FLAG_DEFAULT: u8 = FLAG_SESSIONS | FLAG_FULL_TOC | FLAG_CDTEXT | FLAG_MCN | FLAG_ISRC;



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Read Options.
///
/// This struct selects which of the optional disc structures
/// [`Disc::read`](crate::Disc::read) should try to fetch. The basic table of
/// contents is always read.
///
/// Options are set using builder-style methods, like:
///
/// ```
/// use toctoc_core::ReadOptions;
///
/// let opts = ReadOptions::default()
///     .with_isrc(false)
///     .with_strict(true);
///
/// assert!(opts.cdtext());
/// assert!(! opts.isrc());
/// assert!(opts.strict());
/// ```
pub struct ReadOptions {
	flags: u8,
}

impl Default for ReadOptions {
	fn default() -> Self {
		Self { flags: FLAG_DEFAULT }
	}
}



macro_rules! with_flag {
	($fn:ident, $flag:ident, $($doc:literal),+ $(,)?) => (
		#[must_use]
		$(
			#[doc = $doc]
		)+
		pub const fn $fn(self, v: bool) -> Self {
			let flags =
				if v { self.flags | $flag }
				else { self.flags & ! $flag };

			Self { flags }
		}
	)
}

/// ## Setters.
impl ReadOptions {
	with_flag!(
		with_cdtext,
		FLAG_CDTEXT,
		"# Read CD-Text.",
		"",
		"When `true`, the CD-Text (format `0101b`) will be requested.",
		"",
		"The default is `true`.",
	);

	with_flag!(
		with_full_toc,
		FLAG_FULL_TOC,
		"# Read Full TOC.",
		"",
		"When `true`, the raw full TOC (format `0010b`) will be requested.",
		"",
		"The default is `true`.",
	);

	with_flag!(
		with_isrc,
		FLAG_ISRC,
		"# Read ISRCs.",
		"",
		"When `true`, each audio track's ISRC will be requested. Many drives",
		"are rather slow about this, so it can be worth skipping when the",
		"codes aren't needed.",
		"",
		"The default is `true`.",
	);

	with_flag!(
		with_mcn,
		FLAG_MCN,
		"# Read MCN.",
		"",
		"When `true`, the disc's media catalog number will be requested.",
		"",
		"The default is `true`.",
	);

	with_flag!(
		with_sessions,
		FLAG_SESSIONS,
		"# Read Sessions.",
		"",
		"When `true`, the multi-session summary (format `0001b`) will be",
		"requested. This is what lets enhanced discs be identified correctly",
		"without guesswork.",
		"",
		"The default is `true`.",
	);

	with_flag!(
		with_strict,
		FLAG_STRICT,
		"# Strict CD-Text.",
		"",
		"When `true`, CD-Text containing _any_ PACK with a bad CRC is",
		"rejected. When `false`, the checksums are ignored.",
		"",
		"The default is `false`.",
	);
}



macro_rules! get_flag {
	($fn:ident, $flag:ident, $title:literal) => (
		#[must_use]
		#[doc = concat!("# ", $title, "?")]
		pub const fn $fn(&self) -> bool { $flag == self.flags & $flag }
	);
}

/// # Getters.
impl ReadOptions {
	get_flag!(cdtext, FLAG_CDTEXT, "Read CD-Text");
	get_flag!(full_toc, FLAG_FULL_TOC, "Read Full TOC");
	get_flag!(isrc, FLAG_ISRC, "Read ISRCs");
	get_flag!(mcn, FLAG_MCN, "Read MCN");
	get_flag!(sessions, FLAG_SESSIONS, "Read Sessions");
	get_flag!(strict, FLAG_STRICT, "Strict CD-Text");
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_defaults() {
		let opts = ReadOptions::default();
		assert!(opts.sessions(), "Sessions should be on by default.");
		assert!(opts.full_toc(), "Full TOC should be on by default.");
		assert!(opts.cdtext(), "CD-Text should be on by default.");
		assert!(opts.mcn(), "MCN should be on by default.");
		assert!(opts.isrc(), "ISRCs should be on by default.");
		assert!(! opts.strict(), "Strict should be off by default.");
	}

	#[test]
	fn t_flags() {
		macro_rules! t_flag {
			($set:ident, $get:ident) => (
				let opts = ReadOptions::default().$set(true);
				assert!(opts.$get(), concat!(stringify!($get), " should be on."));
				let opts = opts.$set(false);
				assert!(! opts.$get(), concat!(stringify!($get), " should be off."));

				// Other flags should be unaffected.
				assert_eq!(
					opts.$set(ReadOptions::default().$get()),
					ReadOptions::default(),
					concat!(stringify!($set), " leaked."),
				);
			);
		}

		t_flag!(with_cdtext, cdtext);
		t_flag!(with_full_toc, full_toc);
		t_flag!(with_isrc, isrc);
		t_flag!(with_mcn, mcn);
		t_flag!(with_sessions, sessions);
		t_flag!(with_strict, strict);
	}
}
