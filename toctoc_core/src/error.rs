/*!
# Toc Toc: Errors
*/

use fyi_msg::Msg;
use std::{
	error::Error,
	fmt,
};



#[cfg(feature = "bin")]
/// # Help Text.
const HELP: &str = concat!(r"
    Toc Toc v", env!("CARGO_PKG_VERSION"), r"
    Who's there? Your CD's table of contents.

USAGE:
    toctoc [OPTIONS]

DRIVE:
    -d, --dev <PATH>  The device path for the optical drive containing the CD
                      of interest, like /dev/cdrom. This requires a build with
                      the libcdio feature enabled. [default: auto]

DUMPS:
        --toc <FILE>  A raw READ TOC (format 0000b) response to parse instead
                      of reading a drive.
        --sessions <FILE>
                      A raw multi-session (format 0001b) response.
        --full-toc <FILE>
                      A raw full TOC (format 0010b) response.
        --cdtext <FILE>
                      A raw CD-Text (format 0101b) response.

SETTINGS:
        --no-cdtext   Skip the CD-Text.
        --no-isrc     Skip the (slow) per-track ISRC lookups.
        --strict      Reject CD-Text containing PACKs with bad CRCs.

MISCELLANEOUS:
    -h, --help        Print help information to STDOUT and exit.
    -V, --version     Print version information to STDOUT and exit.
");



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Errors.
pub enum TocTocError {
	/// # Invalid argument.
	BadArg,

	/// # Allocation failure.
	NoMem,

	/// # No device.
	NoDevice,

	/// # Fewer bytes than the declared/required length.
	Truncated,

	/// # Length not congruent to the record size, or otherwise inconsistent.
	Corrupted,

	/// # Output buffer too small.
	///
	/// The value is the number of bytes actually required.
	TooSmall(usize),

	/// # CD-Text descriptor limits exceeded.
	InvalidCDText,

	/// # The requested data is not present on the disc.
	NoData,

	/// # Bug!
	Internal,

	#[cfg(feature = "bin")]
	/// # Invalid CLI arg.
	CliArg,

	#[cfg(feature = "bin")]
	/// # Unable to read a dump file.
	Read(&'static str),

	#[cfg(feature = "bin")]
	/// # Print Help (Not an Error).
	PrintHelp,

	#[cfg(feature = "bin")]
	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for TocTocError {}

impl From<TocTocError> for Msg {
	#[inline]
	fn from(src: TocTocError) -> Self { Self::error(src.to_string()) }
}

impl fmt::Display for TocTocError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::BadArg => f.write_str("Invalid argument."),
			Self::NoMem => f.write_str("Unable to allocate memory."),
			Self::NoDevice => f.write_str("Unable to open the optical drive."),
			Self::Truncated => f.write_str("The data is truncated."),
			Self::Corrupted => f.write_str("The data is corrupt."),
			Self::TooSmall(n) => write!(f, "The output buffer is too small; {n} bytes are required."),
			Self::InvalidCDText => f.write_str("The CD-Text exceeds the PACK limits."),
			Self::NoData => f.write_str("The data is not present on the disc."),
			Self::Internal => f.write_str("Bug: unexpected internal state."),

			#[cfg(feature = "bin")]
			Self::CliArg => f.write_str("A drive or TOC dump is required."),

			#[cfg(feature = "bin")]
			Self::Read(s) => write!(f, "Unable to read the {s} dump."),

			#[cfg(feature = "bin")]
			Self::PrintHelp => f.write_str(HELP),

			#[cfg(feature = "bin")]
			Self::PrintVersion => f.write_str(concat!("Toc Toc v", env!("CARGO_PKG_VERSION"))),
		}
	}
}
