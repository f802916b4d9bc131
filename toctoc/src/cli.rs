/*!
# Toc Toc: CLI
*/

use argyle::Argument;
use std::path::{
	Path,
	PathBuf,
};
use toctoc_core::{
	MemoryDevice,
	ReadOptions,
	TocTocError,
};



#[derive(Debug)]
/// # Input Source.
pub(super) enum Input {
	/// # Physical Drive.
	Drive(Option<PathBuf>),

	/// # Response Dumps.
	Dumps(MemoryDevice),
}



/// # Parse Options.
pub(super) fn parse() -> Result<(ReadOptions, Input), TocTocError> {
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut opts = ReadOptions::default();
	let mut dev = None;
	let mut toc = None;
	let mut sessions = None;
	let mut full_toc = None;
	let mut cdtext = None;
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(TocTocError::PrintHelp),
			Argument::Key("--no-cdtext") => { opts = opts.with_cdtext(false); },
			Argument::Key("--no-isrc") => { opts = opts.with_isrc(false); },
			Argument::Key("--strict") => { opts = opts.with_strict(true); },
			Argument::Key("-V" | "--version") => return Err(TocTocError::PrintVersion),

			Argument::KeyWithValue("--cdtext", s) => { cdtext = Some(PathBuf::from(s)); },
			Argument::KeyWithValue("-d" | "--dev", s) => { dev = Some(PathBuf::from(s)); },
			Argument::KeyWithValue("--full-toc", s) => { full_toc = Some(PathBuf::from(s)); },
			Argument::KeyWithValue("--sessions", s) => { sessions = Some(PathBuf::from(s)); },
			Argument::KeyWithValue("--toc", s) => { toc = Some(PathBuf::from(s)); },

			_ => {},
		}
	}

	// Dumps take priority, but the TOC is the one thing we can't do without.
	let Some(toc) = toc else {
		if sessions.is_some() || full_toc.is_some() || cdtext.is_some() {
			return Err(TocTocError::CliArg);
		}
		return Ok((opts, Input::Drive(dev)));
	};

	let mut mem = MemoryDevice::default().with_toc(read_dump(&toc, "TOC")?);
	if let Some(p) = sessions {
		mem = mem.with_sessions(read_dump(&p, "session")?);
	}
	if let Some(p) = full_toc {
		mem = mem.with_full_toc(read_dump(&p, "full TOC")?);
	}
	if let Some(p) = cdtext {
		mem = mem.with_cdtext(read_dump(&p, "CD-Text")?);
	}

	Ok((opts, Input::Dumps(mem)))
}

/// # Read Dump.
fn read_dump(path: &Path, kind: &'static str) -> Result<Vec<u8>, TocTocError> {
	std::fs::read(path).map_err(|_| TocTocError::Read(kind))
}
