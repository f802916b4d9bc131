/*!
# Toc Toc: Full Table of Contents (Format 0010b)
*/

use crate::{
	CD_MAX_TRACK,
	Codec,
	Msf,
	Sessions,
	Toc,
	TocEntry,
	TocTocError,
	TRACK_SLOTS,
	wire,
};



/// # Descriptor Size.
const DESCRIPTOR_SIZE: usize = 11;

/// # Point: First Track.
const POINT_A0: u8 = 0xA0;

/// # Point: Last Track.
const POINT_A1: u8 = 0xA1;

/// # Point: Lead-out.
const POINT_A2: u8 = 0xA2;

/// # ADR: Extra Q Data.
///
/// These descriptors carry skip intervals and other mode-5 data.
const ADR_EXTRA: u8 = 5;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Full TOC Track.
pub struct FullTocTrack {
	session: u8,
	adr: u8,
	control: u8,
	absolute: Msf,
	start: Msf,
}

impl FullTocTrack {
	#[must_use]
	/// # New.
	///
	/// Only the low four bits of `adr` and `control` are kept. The `start`
	/// time is as reported by the drive, lead-in included.
	pub const fn new(session: u8, adr: u8, control: u8, absolute: Msf, start: Msf) -> Self {
		Self {
			session,
			adr: adr & 0x0F,
			control: control & 0x0F,
			absolute,
			start,
		}
	}

	#[must_use]
	/// # Session.
	pub const fn session(&self) -> u8 { self.session }

	#[must_use]
	/// # ADR.
	pub const fn adr(&self) -> u8 { self.adr }

	#[must_use]
	/// # Control.
	pub const fn control(&self) -> u8 { self.control }

	#[must_use]
	/// # Absolute Time.
	///
	/// The position of the descriptor itself within the lead-in.
	pub const fn absolute(&self) -> Msf { self.absolute }

	#[must_use]
	/// # Start Time.
	pub const fn start(&self) -> Msf { self.start }

	#[must_use]
	/// # Start LBA.
	pub const fn lba(&self) -> u32 { self.start.to_lba() }

	#[must_use]
	/// # TOC Entry.
	pub const fn to_entry(&self) -> TocEntry { TocEntry::new(self.adr, self.control, self.lba()) }
}



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Pseudotrack.
///
/// A0, A1, and A2 descriptors carry session metadata rather than track
/// positions. What the P-fields mean depends on the point:
///
/// | Point | PMIN | PSEC | PFRAME |
/// | ----- | ---- | ---- | ------ |
/// | A0 | First track | Disc type | 0 |
/// | A1 | Last track | 0 | 0 |
/// | A2 | Lead-out | Lead-out | Lead-out |
pub struct Pseudotrack {
	adr: u8,
	control: u8,
	absolute: Msf,
	pmin: u8,
	psec: u8,
	pframe: u8,
}

impl Pseudotrack {
	#[must_use]
	/// # New.
	pub const fn new(adr: u8, control: u8, absolute: Msf, pmin: u8, psec: u8, pframe: u8)
	-> Self {
		Self {
			adr: adr & 0x0F,
			control: control & 0x0F,
			absolute,
			pmin,
			psec,
			pframe,
		}
	}

	#[must_use]
	/// # ADR.
	pub const fn adr(&self) -> u8 { self.adr }

	#[must_use]
	/// # Control.
	pub const fn control(&self) -> u8 { self.control }

	#[must_use]
	/// # Absolute Time.
	pub const fn absolute(&self) -> Msf { self.absolute }

	#[must_use]
	/// # PMIN.
	pub const fn pmin(&self) -> u8 { self.pmin }

	#[must_use]
	/// # PSEC.
	pub const fn psec(&self) -> u8 { self.psec }

	#[must_use]
	/// # PFRAME.
	pub const fn pframe(&self) -> u8 { self.pframe }

	#[must_use]
	/// # P-Time.
	pub const fn pmsf(&self) -> Msf { Msf::new(self.pmin, self.psec, self.pframe) }
}



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Full TOC Session.
pub struct FullTocSession {
	a0: Option<Pseudotrack>,
	a1: Option<Pseudotrack>,
	a2: Option<Pseudotrack>,
}

impl FullTocSession {
	#[must_use]
	/// # A0 (First Track).
	pub const fn a0(&self) -> Option<Pseudotrack> { self.a0 }

	#[must_use]
	/// # A1 (Last Track).
	pub const fn a1(&self) -> Option<Pseudotrack> { self.a1 }

	#[must_use]
	/// # A2 (Lead-out).
	pub const fn a2(&self) -> Option<Pseudotrack> { self.a2 }

	#[must_use]
	/// # First Track.
	pub const fn first_track(&self) -> Option<u8> {
		if let Some(p) = self.a0 { Some(p.pmin) } else { None }
	}

	#[must_use]
	/// # Last Track.
	pub const fn last_track(&self) -> Option<u8> {
		if let Some(p) = self.a1 { Some(p.pmin) } else { None }
	}

	#[must_use]
	/// # Lead-out.
	pub const fn leadout(&self) -> Option<Msf> {
		if let Some(p) = self.a2 { Some(p.pmsf()) } else { None }
	}

	/// # Pseudotracks.
	fn pseudotracks(&self) -> impl Iterator<Item=(u8, Pseudotrack)> {
		[(POINT_A0, self.a0), (POINT_A1, self.a1), (POINT_A2, self.a2)]
			.into_iter()
			.filter_map(|(point, p)| p.map(|p| (point, p)))
	}
}



#[derive(Debug, Clone, Eq, Hash, PartialEq)]
/// # Full Table of Contents.
///
/// This is the raw Q sub-channel view of the lead-in: every track, tagged
/// with its session, plus the A0/A1/A2 pseudotracks of each session.
///
/// Unlike [`Toc`], the first and last track numbers are not stored
/// directly; they come from the first session's A0 and the last session's
/// A1 respectively.
pub struct FullToc {
	first_session: u8,
	last_session: u8,
	tracks: [Option<FullTocTrack>; TRACK_SLOTS],
	sessions: [Option<FullTocSession>; TRACK_SLOTS],
}

impl Codec for FullToc {
	fn deserialize(src: &[u8]) -> Result<Self, TocTocError> {
		let (first, last, payload) = wire::read_header(src, DESCRIPTOR_SIZE)?;
		let mut out = Self::new(first, last);

		for chunk in payload.chunks_exact(DESCRIPTOR_SIZE) {
			let &[session, ac, _, point, amin, asec, afrm, _, pmin, psec, pfrm] = chunk else {
				return Err(TocTocError::Internal);
			};
			if ac >> 4 == ADR_EXTRA { continue; }

			let absolute = Msf::new(amin, asec, afrm);
			match point {
				1..=CD_MAX_TRACK => out.set_track(
					point,
					FullTocTrack::new(session, ac >> 4, ac, absolute, Msf::new(pmin, psec, pfrm)),
				)?,
				POINT_A0 | POINT_A1 | POINT_A2 => out.set_pseudotrack(
					session,
					point,
					Pseudotrack::new(ac >> 4, ac, absolute, pmin, psec, pfrm),
				)?,
				_ => {},
			}
		}

		Ok(out)
	}

	fn serialized_len(&self) -> Result<usize, TocTocError> {
		Ok(wire::HEADER_SIZE + self.payload_len())
	}

	fn serialize_into(&self, dst: &mut [u8]) -> Result<usize, TocTocError> {
		let len = wire::check_capacity(dst, self.serialized_len()?)?;
		wire::write_header(dst, self.payload_len(), self.first_session, self.last_session)?;

		let mut chunks = dst[wire::HEADER_SIZE..len].chunks_exact_mut(DESCRIPTOR_SIZE);
		for (num, session) in self.sessions() {
			for (point, p) in session.pseudotracks() {
				let [amin, asec, afrm] = <[u8; 3]>::from(p.absolute);
				chunks.next()
					.ok_or(TocTocError::Internal)?
					.copy_from_slice(&[
						num, p.adr << 4 | p.control, 0, point,
						amin, asec, afrm, 0,
						p.pmin, p.psec, p.pframe,
					]);
			}

			for (point, t) in self.tracks().filter(|(_, t)| t.session == num) {
				let [amin, asec, afrm] = <[u8; 3]>::from(t.absolute);
				let [pmin, psec, pfrm] = <[u8; 3]>::from(t.start);
				chunks.next()
					.ok_or(TocTocError::Internal)?
					.copy_from_slice(&[
						num, t.adr << 4 | t.control, 0, point,
						amin, asec, afrm, 0,
						pmin, psec, pfrm,
					]);
			}
		}

		if chunks.next().is_none() { Ok(len) }
		else { Err(TocTocError::Internal) }
	}
}

impl FullToc {
	#[must_use]
	/// # New.
	///
	/// Create an empty full table of contents.
	pub const fn new(first_session: u8, last_session: u8) -> Self {
		Self {
			first_session,
			last_session,
			tracks: [None; TRACK_SLOTS],
			sessions: [None; TRACK_SLOTS],
		}
	}

	/// # Set Track.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::Corrupted`] if the track or session numbers
	/// are outside `1..=99`.
	pub fn set_track(&mut self, num: u8, track: FullTocTrack) -> Result<(), TocTocError> {
		if ! (1..=CD_MAX_TRACK).contains(&num) { return Err(TocTocError::Corrupted); }
		self.session_mut(track.session)?;
		self.tracks[usize::from(num)] = Some(track);
		Ok(())
	}

	/// # Set Pseudotrack.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::Corrupted`] if the session number is outside
	/// `1..=99` or the point is not A0, A1, or A2.
	pub fn set_pseudotrack(&mut self, session: u8, point: u8, track: Pseudotrack)
	-> Result<(), TocTocError> {
		let session = self.session_mut(session)?;
		let slot = match point {
			POINT_A0 => &mut session.a0,
			POINT_A1 => &mut session.a1,
			POINT_A2 => &mut session.a2,
			_ => return Err(TocTocError::Corrupted),
		};
		*slot = Some(track);
		Ok(())
	}

	/// # Session (Mutable).
	///
	/// Return the session, creating it if necessary.
	fn session_mut(&mut self, num: u8) -> Result<&mut FullTocSession, TocTocError> {
		if (1..=CD_MAX_TRACK).contains(&num) {
			Ok(self.sessions[usize::from(num)].get_or_insert_with(FullTocSession::default))
		}
		else { Err(TocTocError::Corrupted) }
	}
}

impl FullToc {
	#[must_use]
	/// # First Session.
	pub const fn first_session(&self) -> u8 { self.first_session }

	#[must_use]
	/// # Last Session.
	pub const fn last_session(&self) -> u8 { self.last_session }

	#[must_use]
	/// # First Track.
	///
	/// This comes from the first session's A0 pseudotrack.
	pub fn first_track(&self) -> Option<u8> {
		self.sessions().next().and_then(|(_, s)| s.first_track())
	}

	#[must_use]
	/// # Last Track.
	///
	/// This comes from the last session's A1 pseudotrack.
	pub fn last_track(&self) -> Option<u8> {
		self.sessions().last().and_then(|(_, s)| s.last_track())
	}

	#[must_use]
	/// # Disc Type.
	///
	/// This comes from the first session's A0 pseudotrack: `0x00` for
	/// CD-DA/CD-ROM, `0x10` for CD-I, `0x20` for CD-ROM XA.
	pub fn disc_type(&self) -> Option<u8> {
		self.sessions().next().and_then(|(_, s)| s.a0).map(|p| p.psec)
	}

	#[must_use]
	/// # Track.
	pub fn track(&self, num: u8) -> Option<&FullTocTrack> {
		self.tracks.get(usize::from(num))?.as_ref()
	}

	#[must_use]
	/// # Session.
	pub fn session(&self, num: u8) -> Option<&FullTocSession> {
		self.sessions.get(usize::from(num))?.as_ref()
	}

	#[must_use]
	/// # Session Lead-out.
	pub fn leadout(&self, session: u8) -> Option<Msf> {
		self.session(session)?.leadout()
	}

	/// # Tracks.
	///
	/// Iterate over the `(number, track)` pairs of every real track, in
	/// order. Pseudotracks are not included.
	pub fn tracks(&self) -> impl Iterator<Item=(u8, &FullTocTrack)> {
		(1..=CD_MAX_TRACK).filter_map(|n| self.track(n).map(|t| (n, t)))
	}

	/// # Sessions.
	///
	/// Iterate over the `(number, session)` pairs of every session present.
	pub fn sessions(&self) -> impl Iterator<Item=(u8, &FullTocSession)> {
		(1..=CD_MAX_TRACK).filter_map(|n| self.session(n).map(|s| (n, s)))
	}

	/// # Payload Length.
	fn payload_len(&self) -> usize {
		let pseudo: usize = self.sessions().map(|(_, s)| s.pseudotracks().count()).sum();
		(pseudo + self.tracks().count()) * DESCRIPTOR_SIZE
	}
}

impl FullToc {
	/// # To TOC.
	///
	/// Build a [`Toc`] from the tracks and the last session's lead-out.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::Corrupted`] if the track range or lead-out
	/// cannot be determined, or any tracks are missing.
	pub fn to_toc(&self) -> Result<Toc, TocTocError> {
		let first = self.first_track().ok_or(TocTocError::Corrupted)?;
		let last = self.last_track().ok_or(TocTocError::Corrupted)?;
		let leadout = self.sessions()
			.last()
			.and_then(|(_, s)| s.a2)
			.ok_or(TocTocError::Corrupted)?;

		let mut out = Toc::new(first, last).map_err(|_| TocTocError::Corrupted)?;
		for num in first..=last {
			let track = self.track(num).ok_or(TocTocError::Corrupted)?;
			out.set_track(num, track.to_entry())?;
		}
		out.set_leadout(TocEntry::new(leadout.adr, leadout.control, leadout.pmsf().to_lba()));

		Ok(out)
	}

	/// # To Sessions.
	///
	/// Build a [`Sessions`] from the first track of the last session.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::Corrupted`] if the last session or its first
	/// track are missing.
	pub fn to_sessions(&self) -> Result<Sessions, TocTocError> {
		let num = self.sessions()
			.last()
			.and_then(|(_, s)| s.first_track())
			.ok_or(TocTocError::Corrupted)?;
		let track = self.track(num).ok_or(TocTocError::Corrupted)?;
		Ok(Sessions::new(self.first_session, self.last_session, num, track.to_entry()))
	}
}



#[cfg(test)]
mod test {
	use super::*;

	/// # Descriptor.
	fn desc(session: u8, ac: u8, point: u8, p: [u8; 3]) -> [u8; DESCRIPTOR_SIZE] {
		[session, ac, 0, point, 0, 0, 0, 0, p[0], p[1], p[2]]
	}

	/// # Two-Session (Enhanced CD) Response.
	fn raw() -> Vec<u8> {
		let mut out = vec![0, 101, 1, 2];
		for d in [
			desc(1, 0x10, POINT_A0, [1, 0x20, 0]),
			desc(1, 0x10, POINT_A1, [2, 0, 0]),
			desc(1, 0x10, POINT_A2, [4, 28, 50]),
			desc(1, 0x10, 1, [0, 2, 0]),
			desc(1, 0x10, 2, [2, 15, 25]),
			desc(2, 0x14, POINT_A0, [3, 0x20, 0]),
			desc(2, 0x14, POINT_A1, [3, 0, 0]),
			desc(2, 0x14, POINT_A2, [8, 55, 25]),
			desc(2, 0x14, 3, [7, 0, 50]),
		] {
			out.extend_from_slice(&d);
		}
		out
	}

	#[test]
	fn t_deserialize() {
		let raw = raw();
		let toc = FullToc::deserialize(&raw).expect("Full TOC failed.");

		assert_eq!(toc.first_session(), 1);
		assert_eq!(toc.last_session(), 2);
		assert_eq!(toc.first_track(), Some(1));
		assert_eq!(toc.last_track(), Some(3));
		assert_eq!(toc.disc_type(), Some(0x20));
		assert_eq!(toc.tracks().count(), 3, "Pseudotracks should not be counted.");
		assert_eq!(toc.sessions().count(), 2);
		assert_eq!(toc.track(2).map(FullTocTrack::lba), Some(10_000));
		assert_eq!(toc.track(3).map(FullTocTrack::session), Some(2));
		assert_eq!(toc.leadout(1), Some(Msf::new(4, 28, 50)));
		assert_eq!(toc.leadout(3), None);

		assert_eq!(toc.serialize().as_deref(), Ok(raw.as_slice()), "Round trip failed.");
	}

	#[test]
	fn t_conversions() {
		let full = FullToc::deserialize(&raw()).expect("Full TOC failed.");

		let toc = full.to_toc().expect("TOC failed.");
		assert_eq!(toc.first_track(), 1);
		assert_eq!(toc.last_track(), 3);
		assert_eq!(toc.track(1), Some(TocEntry::audio(0)));
		assert_eq!(toc.track(2), Some(TocEntry::audio(10_000)));
		assert_eq!(toc.track(3), Some(TocEntry::data(31_400)));
		assert_eq!(toc.leadout().lba(), 40_000);

		let sessions = full.to_sessions().expect("Sessions failed.");
		assert!(sessions.is_multisession());
		assert_eq!(sessions.track_number(), 3);
		assert_eq!(sessions.lba(), 31_400);
		assert!(sessions.entry().is_data());
	}

	#[test]
	fn t_serialize_into() {
		let raw = raw();
		let toc = FullToc::deserialize(&raw).expect("Full TOC failed.");
		assert_eq!(toc.serialized_len(), Ok(raw.len()));

		let mut buf = vec![0xFF_u8; raw.len() - 1];
		assert_eq!(toc.serialize_into(&mut buf), Err(TocTocError::TooSmall(raw.len())));
		assert!(buf.iter().all(|&b| b == 0xFF), "Undersized buffer was written to.");

		let mut buf = vec![0_u8; raw.len() + 4];
		assert_eq!(toc.serialize_into(&mut buf), Ok(raw.len()));
		assert_eq!(&buf[..raw.len()], raw.as_slice());
	}

	#[test]
	fn t_skipped() {
		let mut raw = raw();
		raw.extend_from_slice(&desc(1, 0x50, 0xB0, [1, 2, 3]));
		raw.extend_from_slice(&desc(2, 0x10, 0xC0, [1, 2, 3]));
		raw.extend_from_slice(&desc(2, 0x50, 5, [1, 2, 3]));
		raw[1] += 33;

		let toc = FullToc::deserialize(&raw).expect("Full TOC failed.");
		assert_eq!(toc.tracks().count(), 3, "ADR 5 descriptors should be skipped.");
		assert_eq!(toc.track(5), None);
		assert_eq!(toc.serialized_len(), Ok(raw.len() - 33), "Unknown points should be dropped.");
	}

	#[test]
	fn t_deserialize_bad() {
		let raw = raw();
		assert_eq!(FullToc::deserialize(&raw[..raw.len() - 1]), Err(TocTocError::Truncated));

		let mut bad = raw.clone();
		bad[1] -= 1;
		assert_eq!(FullToc::deserialize(&bad), Err(TocTocError::Corrupted));

		let mut bad = raw;
		bad[4] = 0;
		assert_eq!(FullToc::deserialize(&bad), Err(TocTocError::Corrupted), "Session zero is invalid.");
	}
}
