/*!
# Toc Toc: Library

This crate parses and re-emits, bit-for-bit, the four table-of-contents
response formats returned by the MMC `READ TOC/PMA/ATIP` command family:

| Format | Type |
| ------ | ---- |
| `0000b` | [`Toc`] |
| `0001b` | [`Sessions`] |
| `0010b` | [`FullToc`] |
| `0101b` | [`CdText`] |

It also computes the freedb/CDDB and MusicBrainz disc identifiers, and
provides the Latin-1/ASCII/MS-JIS transcoding CD-Text depends on.

Talking to actual hardware is left to implementations of the [`Device`]
trait. An in-memory [`MemoryDevice`] is always available; a `libcdio`-backed
implementation can be enabled with the crate feature of the same name.

## Example

```
use toctoc_core::{Codec, DiscId, Toc};

let toc = Toc::from_lbas(1, &[33, 9215, 21515], 49738).unwrap();
let raw = toc.serialize().unwrap();
assert_eq!(Toc::deserialize(&raw).as_ref(), Ok(&toc));

let id = DiscId::new(&toc, None);
assert_eq!(id.freedb_id().to_string().len(), 8);
```
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]

mod cdtext;
mod charset;
mod crc;
mod device;
mod disc;
mod discid;
mod error;
mod fulltoc;
mod ident;
mod msf;
mod opts;
mod sessions;
mod toc;
mod wire;

pub use cdtext::{
	CdText,
	CdTextBlock,
	CdTextField,
	CdTextInterval,
	CdTextToc,
};
pub use charset::Charset;
pub use crc::{
	crc16,
	pack_crc,
	stamp_pack,
	verify_pack,
};
#[cfg(feature = "libcdio")]
pub use device::{
	default_device,
	LibcdioDevice,
};
pub use device::{
	Device,
	MemoryDevice,
};
pub use disc::Disc;
pub use discid::{
	DiscId,
	FreedbId,
	freedb_id,
	MusicBrainzId,
	musicbrainz_id,
};
pub use error::TocTocError;
pub use fulltoc::{
	FullToc,
	FullTocSession,
	FullTocTrack,
	Pseudotrack,
};
pub use ident::{
	Isrc,
	Mcn,
};
pub use msf::{
	lba_to_msf,
	Msf,
	msf_to_lba,
};
pub use opts::ReadOptions;
pub use sessions::Sessions;
pub use toc::{
	Toc,
	TocEntry,
};
pub use wire::Codec;



/// # Frames Per Second.
pub const CD_FRAMES_PER_SECOND: u32 = 75;

/// # Number of lead-in sectors.
///
/// All discs have a 2-second region at the start before any data. Different
/// contexts include or exclude this amount, so it's good to keep it handy.
pub const CD_LEADIN: u32 = 150;

/// # Lead-out Track Number.
///
/// The lead-out is addressed by this number on the wire, but is stored at
/// index zero internally.
pub const CD_LEADOUT_TRACK: u8 = 0xAA;

/// # Lead-out Label.
///
/// This is used solely for the table of contents printout; e.g. 01 02 03 AA.
pub const CD_LEADOUT_LABEL: &str = "AA";

/// # Maximum Track Number.
pub const CD_MAX_TRACK: u8 = 99;

/// # Session Gap.
///
/// The number of frames separating the end of one session's program area
/// from the start of the next: a 6750-frame lead-out, a 4500-frame lead-in,
/// and a 150-frame pregap.
pub const CD_SESSION_GAP: u32 = 11_400;

/// # Control Flag: Data Track.
pub const CONTROL_DATA: u8 = 0b0100;

/// # Number of Track Slots.
///
/// Slot zero holds the lead-out; slots 1..=99 hold the tracks.
pub(crate) const TRACK_SLOTS: usize = 100;
