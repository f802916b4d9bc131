/*!
# Toc Toc: Devices
*/

#[cfg(feature = "libcdio")] mod libcdio;

#[cfg(feature = "libcdio")]
pub use libcdio::{
	default_device,
	LibcdioDevice,
};

use crate::{
	CD_MAX_TRACK,
	TocTocError,
};
use std::collections::BTreeMap;



/// # Device.
///
/// This is the boundary between the codecs and whatever can answer the MMC
/// `READ TOC/PMA/ATIP` family of commands, be it a physical drive or a pile
/// of saved responses.
///
/// Each `read_*` method returns a raw response, exactly as the drive sent
/// it, for the caller to deserialize. Opening happens at construction;
/// closing happens on drop.
///
/// Only [`Device::read_toc`] is required; the rest default to
/// [`TocTocError::NoData`].
pub trait Device {
	/// # Read TOC (`0000b`).
	///
	/// ## Errors
	///
	/// Returns an error if the response cannot be obtained.
	fn read_toc(&mut self) -> Result<Vec<u8>, TocTocError>;

	/// # Read Session Info (`0001b`).
	///
	/// ## Errors
	///
	/// Returns an error if the response cannot be obtained.
	fn read_sessions(&mut self) -> Result<Vec<u8>, TocTocError> {
		Err(TocTocError::NoData)
	}

	/// # Read Full TOC (`0010b`).
	///
	/// ## Errors
	///
	/// Returns an error if the response cannot be obtained.
	fn read_full_toc(&mut self) -> Result<Vec<u8>, TocTocError> {
		Err(TocTocError::NoData)
	}

	/// # Read CD-Text (`0101b`).
	///
	/// ## Errors
	///
	/// Returns an error if the response cannot be obtained.
	fn read_cdtext(&mut self) -> Result<Vec<u8>, TocTocError> {
		Err(TocTocError::NoData)
	}

	/// # Read Media Catalog Number.
	///
	/// ## Errors
	///
	/// Returns an error if the disc has no MCN or it cannot be obtained.
	fn read_mcn(&mut self) -> Result<String, TocTocError> {
		Err(TocTocError::NoData)
	}

	/// # Read Track ISRC.
	///
	/// ## Errors
	///
	/// Returns an error if the track has no ISRC or it cannot be obtained.
	fn read_isrc(&mut self, track: u8) -> Result<String, TocTocError> {
		let _ = track;
		Err(TocTocError::NoData)
	}
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Memory Device.
///
/// A [`Device`] that serves previously-recorded responses, useful for
/// working with dumps and, of course, testing.
///
/// ## Examples
///
/// ```
/// use toctoc_core::{Device, MemoryDevice, TocTocError};
///
/// let mut dev = MemoryDevice::default()
///     .with_toc(vec![0, 10, 1, 1, 0, 0x10, 1, 0, 0, 0, 0, 0])
///     .with_mcn("0731455829921");
///
/// assert_eq!(dev.read_toc().unwrap().len(), 12);
/// assert_eq!(dev.read_mcn().unwrap(), "0731455829921");
/// assert_eq!(dev.read_cdtext(), Err(TocTocError::NoData));
/// ```
pub struct MemoryDevice {
	toc: Option<Vec<u8>>,
	sessions: Option<Vec<u8>>,
	full_toc: Option<Vec<u8>>,
	cdtext: Option<Vec<u8>>,
	mcn: Option<String>,
	isrcs: BTreeMap<u8, String>,
}

impl Device for MemoryDevice {
	fn read_toc(&mut self) -> Result<Vec<u8>, TocTocError> { cloned(self.toc.as_ref()) }

	fn read_sessions(&mut self) -> Result<Vec<u8>, TocTocError> {
		cloned(self.sessions.as_ref())
	}

	fn read_full_toc(&mut self) -> Result<Vec<u8>, TocTocError> {
		cloned(self.full_toc.as_ref())
	}

	fn read_cdtext(&mut self) -> Result<Vec<u8>, TocTocError> {
		cloned(self.cdtext.as_ref())
	}

	fn read_mcn(&mut self) -> Result<String, TocTocError> {
		self.mcn.clone().ok_or(TocTocError::NoData)
	}

	fn read_isrc(&mut self, track: u8) -> Result<String, TocTocError> {
		if track == 0 || CD_MAX_TRACK < track { return Err(TocTocError::BadArg); }
		self.isrcs.get(&track).cloned().ok_or(TocTocError::NoData)
	}
}

/// ## Setters.
impl MemoryDevice {
	#[must_use]
	/// # With TOC Response.
	pub fn with_toc(self, raw: Vec<u8>) -> Self {
		Self { toc: Some(raw), ..self }
	}

	#[must_use]
	/// # With Session Info Response.
	pub fn with_sessions(self, raw: Vec<u8>) -> Self {
		Self { sessions: Some(raw), ..self }
	}

	#[must_use]
	/// # With Full TOC Response.
	pub fn with_full_toc(self, raw: Vec<u8>) -> Self {
		Self { full_toc: Some(raw), ..self }
	}

	#[must_use]
	/// # With CD-Text Response.
	pub fn with_cdtext(self, raw: Vec<u8>) -> Self {
		Self { cdtext: Some(raw), ..self }
	}

	#[must_use]
	/// # With MCN.
	pub fn with_mcn<S>(self, mcn: S) -> Self
	where S: Into<String> {
		Self { mcn: Some(mcn.into()), ..self }
	}

	#[must_use]
	/// # With ISRC.
	///
	/// Record the ISRC for a given track. Later calls for the same track
	/// replace earlier ones.
	pub fn with_isrc<S>(mut self, track: u8, isrc: S) -> Self
	where S: Into<String> {
		self.isrcs.insert(track, isrc.into());
		self
	}
}

/// # Cloned Response.
fn cloned(src: Option<&Vec<u8>>) -> Result<Vec<u8>, TocTocError> {
	let src = src.ok_or(TocTocError::NoData)?;
	let mut out = Vec::new();
	out.try_reserve_exact(src.len()).map_err(|_| TocTocError::NoMem)?;
	out.extend_from_slice(src);
	Ok(out)
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_memory() {
		let mut dev = MemoryDevice::default();
		assert_eq!(dev.read_toc(), Err(TocTocError::NoData), "Nothing was recorded.");
		assert_eq!(dev.read_sessions(), Err(TocTocError::NoData));
		assert_eq!(dev.read_full_toc(), Err(TocTocError::NoData));
		assert_eq!(dev.read_cdtext(), Err(TocTocError::NoData));
		assert_eq!(dev.read_mcn(), Err(TocTocError::NoData));
		assert_eq!(dev.read_isrc(1), Err(TocTocError::NoData));

		let mut dev = dev
			.with_toc(vec![1, 2, 3])
			.with_sessions(vec![4, 5])
			.with_full_toc(vec![6])
			.with_cdtext(vec![7, 8, 9, 10])
			.with_mcn("0008811126827")
			.with_isrc(2, "GBAYE0601498");

		assert_eq!(dev.read_toc(), Ok(vec![1, 2, 3]));
		assert_eq!(dev.read_sessions(), Ok(vec![4, 5]));
		assert_eq!(dev.read_full_toc(), Ok(vec![6]));
		assert_eq!(dev.read_cdtext(), Ok(vec![7, 8, 9, 10]));
		assert_eq!(dev.read_mcn().as_deref(), Ok("0008811126827"));
		assert_eq!(dev.read_isrc(2).as_deref(), Ok("GBAYE0601498"));
		assert_eq!(dev.read_isrc(1), Err(TocTocError::NoData));
		assert_eq!(dev.read_isrc(0), Err(TocTocError::BadArg), "Track zero is not a track.");

		// Reads don't consume anything.
		assert_eq!(dev.read_toc(), Ok(vec![1, 2, 3]), "Second read failed.");
	}

	#[test]
	fn t_defaults() {
		struct TocOnly;
		impl Device for TocOnly {
			fn read_toc(&mut self) -> Result<Vec<u8>, TocTocError> { Ok(Vec::new()) }
		}

		let mut dev = TocOnly;
		assert_eq!(dev.read_toc(), Ok(Vec::new()));
		assert_eq!(dev.read_sessions(), Err(TocTocError::NoData));
		assert_eq!(dev.read_isrc(3), Err(TocTocError::NoData));
	}
}
