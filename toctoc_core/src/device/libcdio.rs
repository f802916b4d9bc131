/*!
# Toc Toc: `libcdio` Device
*/

use crate::{
	CD_MAX_TRACK,
	Device,
	TocTocError,
};
use libcdio_sys::{
	driver_id_t_DRIVER_DEVICE, // The equivalent of "use whatever's best".
	driver_return_code_t_DRIVER_OP_SUCCESS,
};
use std::{
	ffi::{
		CStr,
		CString,
		OsStr,
	},
	os::{
		raw::c_char,
		unix::ffi::OsStrExt,
	},
	path::{
		Path,
		PathBuf,
	},
	sync::{
		Mutex,
		Once,
		PoisonError,
	},
};



static LIBCDIO_INIT: Once = Once::new();

/// # Default Device Lookup Lock.
///
/// `cdio_get_default_device` probes every driver, and is not re-entrant.
static LIBCDIO_DEFAULT: Mutex<()> = Mutex::new(());

/// # READ TOC/PMA/ATIP Operation Code.
const MMC_READ_TOC: u8 = 0x43;

/// # Command Timeout (Milliseconds).
const MMC_TIMEOUT: u32 = 6000;

/// # Format: TOC.
const FORMAT_TOC: u8 = 0b0000;

/// # Format: Session Info.
const FORMAT_SESSIONS: u8 = 0b0001;

/// # Format: Full TOC.
const FORMAT_FULL_TOC: u8 = 0b0010;

/// # Format: CD-Text.
const FORMAT_CDTEXT: u8 = 0b0101;



#[derive(Debug)]
/// # `libcdio` Device.
///
/// A [`Device`] backed by a physical optical drive.
///
/// The raw TOC responses are fetched with direct `READ TOC/PMA/ATIP`
/// commands; the MCN and ISRCs go through `libcdio`'s own helpers, which
/// know how to coax them out of the Q sub-channel.
pub struct LibcdioDevice {
	dev: CString,
	ptr: *mut libcdio_sys::CdIo_t,
}

impl Drop for LibcdioDevice {
	#[allow(unsafe_code)]
	fn drop(&mut self) {
		// Release the C memory!
		if ! self.ptr.is_null() {
			unsafe { libcdio_sys::cdio_destroy(self.ptr); }
		}
	}
}

impl Device for LibcdioDevice {
	fn read_toc(&mut self) -> Result<Vec<u8>, TocTocError> { self.read_toc_format(FORMAT_TOC) }

	fn read_sessions(&mut self) -> Result<Vec<u8>, TocTocError> {
		self.read_toc_format(FORMAT_SESSIONS)
	}

	fn read_full_toc(&mut self) -> Result<Vec<u8>, TocTocError> {
		self.read_toc_format(FORMAT_FULL_TOC)
	}

	fn read_cdtext(&mut self) -> Result<Vec<u8>, TocTocError> {
		self.read_toc_format(FORMAT_CDTEXT)
	}

	#[allow(unsafe_code)]
	fn read_mcn(&mut self) -> Result<String, TocTocError> {
		let raw = unsafe { libcdio_sys::cdio_get_mcn(self.ptr) };
		take_string(raw)
	}

	#[allow(unsafe_code)]
	fn read_isrc(&mut self, track: u8) -> Result<String, TocTocError> {
		if track == 0 || CD_MAX_TRACK < track { return Err(TocTocError::BadArg); }
		let raw = unsafe { libcdio_sys::cdio_get_track_isrc(self.ptr, track) };
		take_string(raw)
	}
}

impl LibcdioDevice {
	#[allow(unsafe_code)]
	/// # Open.
	///
	/// Connect to the optical drive at `dev`, or the system default if
	/// `None`.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::NoDevice`] if the path is bogus or the drive
	/// cannot be opened.
	pub fn open(dev: Option<&Path>) -> Result<Self, TocTocError> {
		// Make sure the library has been initialized.
		init();

		let dev = match dev {
			Some(d) => d.to_path_buf(),
			None => default_device()?,
		};
		if ! dev.exists() { return Err(TocTocError::NoDevice); }
		let dev = CString::new(dev.as_os_str().as_bytes())
			.map_err(|_| TocTocError::NoDevice)?;

		let ptr = unsafe {
			libcdio_sys::cdio_open(dev.as_ptr(), driver_id_t_DRIVER_DEVICE)
		};

		if ptr.is_null() { Err(TocTocError::NoDevice) }
		else { Ok(Self { dev, ptr }) }
	}

	#[must_use]
	/// # Device Path.
	pub fn path(&self) -> &Path {
		Path::new(OsStr::from_bytes(self.dev.as_bytes()))
	}

	/// # Read TOC/PMA/ATIP.
	///
	/// The response length isn't known until its header has been read, so
	/// this issues the command twice: once for the four-byte header, and
	/// again for the whole thing.
	fn read_toc_format(&self, format: u8) -> Result<Vec<u8>, TocTocError> {
		let mut head = [0_u8; 4];
		self.run_read_toc(format, &mut head)?;

		let len = usize::from(u16::from_be_bytes([head[0], head[1]])) + 2;
		if len <= head.len() { return Err(TocTocError::NoData); }

		let mut out = Vec::new();
		out.try_reserve_exact(len).map_err(|_| TocTocError::NoMem)?;
		out.resize(len, 0);
		self.run_read_toc(format, &mut out)?;
		Ok(out)
	}

	#[allow(unsafe_code)]
	/// # Run READ TOC/PMA/ATIP.
	fn run_read_toc(&self, format: u8, buf: &mut [u8]) -> Result<(), TocTocError> {
		let alloc = u16::try_from(buf.len()).map_err(|_| TocTocError::BadArg)?;
		let [hi, lo] = alloc.to_be_bytes();

		let mut cdb = libcdio_sys::mmc_cdb_t { field: [0; 12] };
		cdb.field[0] = MMC_READ_TOC;
		cdb.field[2] = format & 0x0F;
		cdb.field[7] = hi;
		cdb.field[8] = lo;

		let res = unsafe {
			libcdio_sys::mmc_run_cmd(
				self.ptr,
				MMC_TIMEOUT,
				&cdb,
				0, // Direction: read.
				u32::from(alloc),
				buf.as_mut_ptr().cast(),
			)
		};

		if res == driver_return_code_t_DRIVER_OP_SUCCESS { Ok(()) }
		else { Err(TocTocError::NoData) }
	}
}



#[allow(unsafe_code)]
/// # Default Device.
///
/// Return the path of the system's default optical drive.
///
/// ## Errors
///
/// Returns [`TocTocError::NoDevice`] if there isn't one.
pub fn default_device() -> Result<PathBuf, TocTocError> {
	init();

	let _lock = LIBCDIO_DEFAULT.lock().unwrap_or_else(PoisonError::into_inner);
	let raw = unsafe { libcdio_sys::cdio_get_default_device(std::ptr::null()) };
	take_string(raw)
		.map(PathBuf::from)
		.map_err(|_| TocTocError::NoDevice)
}

#[allow(unsafe_code)]
/// # Initialize `libcdio`.
fn init() {
	LIBCDIO_INIT.call_once(|| unsafe { libcdio_sys::cdio_init(); });
}

#[allow(unsafe_code)]
/// # Take String.
///
/// Copy a `libcdio`-allocated C string into an owned `String`, then free
/// the original. Null and empty values return [`TocTocError::NoData`].
fn take_string(ptr: *mut c_char) -> Result<String, TocTocError> {
	if ptr.is_null() { return Err(TocTocError::NoData); }

	let out = unsafe { CStr::from_ptr(ptr) }
		.to_str()
		.ok()
		.map(|s| s.trim().to_owned())
		.filter(|s| ! s.is_empty());

	unsafe { libcdio_sys::cdio_free(ptr.cast()); }
	out.ok_or(TocTocError::NoData)
}
