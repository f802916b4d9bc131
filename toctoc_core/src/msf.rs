/*!
# Toc Toc: Minute/Second/Frame
*/

use crate::{
	CD_FRAMES_PER_SECOND,
	CD_LEADIN,
};
use std::fmt;



/// # Frames Per Minute.
const FRAMES_PER_MINUTE: u32 = CD_FRAMES_PER_SECOND * 60;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # MSF.
///
/// A minute/second/frame disc address, with seventy-five frames per second.
///
/// Drives report MSF values in "absolute" time, which includes the two-second
/// lead-in. [`Msf::from_lba`] and [`Msf::to_lba`] add and remove that offset
/// respectively; [`Msf::from_frames`] and [`Msf::frames`] leave it alone.
///
/// ```
/// use toctoc_core::Msf;
///
/// let msf = Msf::from_lba(0);
/// assert_eq!(msf, Msf::new(0, 2, 0));
/// assert_eq!(msf.to_lba(), 0);
/// assert_eq!(msf.to_string(), "00:02:00");
/// ```
pub struct Msf {
	min: u8,
	sec: u8,
	frame: u8,
}

impl fmt::Display for Msf {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:02}:{:02}:{:02}", self.min, self.sec, self.frame)
	}
}

impl From<[u8; 3]> for Msf {
	#[inline]
	fn from(src: [u8; 3]) -> Self { Self::new(src[0], src[1], src[2]) }
}

impl From<Msf> for [u8; 3] {
	#[inline]
	fn from(src: Msf) -> Self { [src.min, src.sec, src.frame] }
}

impl Msf {
	/// # Maximum Value.
	pub const MAX: Self = Self::new(u8::MAX, 59, 74);

	#[must_use]
	/// # New.
	///
	/// Values are stored as-is, even if they are out of range; wire data is
	/// not always tidy.
	pub const fn new(min: u8, sec: u8, frame: u8) -> Self {
		Self { min, sec, frame }
	}

	#[must_use]
	#[allow(clippy::cast_possible_truncation, clippy::integer_division)]
	/// # From (Raw) Frames.
	///
	/// Convert an absolute frame count to MSF without any lead-in adjustment.
	/// Values too large to fit are capped at [`Msf::MAX`].
	pub const fn from_frames(frames: u32) -> Self {
		let min = frames / FRAMES_PER_MINUTE;
		if min > u8::MAX as u32 { return Self::MAX; }

		let rem = frames % FRAMES_PER_MINUTE;
		Self {
			min: min as u8,
			sec: (rem / CD_FRAMES_PER_SECOND) as u8,
			frame: (rem % CD_FRAMES_PER_SECOND) as u8,
		}
	}

	#[must_use]
	/// # From LBA.
	///
	/// Convert a logical block address to MSF, adding the 150-frame lead-in.
	pub const fn from_lba(lba: u32) -> Self {
		Self::from_frames(lba.saturating_add(CD_LEADIN))
	}
}

impl Msf {
	#[must_use]
	/// # Minutes.
	pub const fn min(self) -> u8 { self.min }

	#[must_use]
	/// # Seconds.
	pub const fn sec(self) -> u8 { self.sec }

	#[must_use]
	/// # Frames.
	pub const fn frame(self) -> u8 { self.frame }

	#[must_use]
	/// # Total (Raw) Frames.
	///
	/// Return the absolute frame count, without any lead-in adjustment.
	pub const fn frames(self) -> u32 {
		self.min as u32 * FRAMES_PER_MINUTE +
		self.sec as u32 * CD_FRAMES_PER_SECOND +
		self.frame as u32
	}

	#[must_use]
	/// # To LBA.
	///
	/// Convert to a logical block address, removing the 150-frame lead-in.
	/// Addresses inside the lead-in saturate to zero.
	pub const fn to_lba(self) -> u32 { self.frames().saturating_sub(CD_LEADIN) }
}

impl Msf {
	#[must_use]
	/// # Remove Pregap.
	///
	/// Shift the address back by exactly two seconds, borrowing from the
	/// minutes as needed. Addresses less than two seconds saturate to zero.
	pub const fn remove_pregap(self) -> Self {
		if 2 <= self.sec {
			Self { sec: self.sec - 2, ..self }
		}
		else if 0 < self.min {
			Self {
				min: self.min - 1,
				sec: self.sec + 58,
				frame: self.frame,
			}
		}
		else { Self::new(0, 0, 0) }
	}

	#[must_use]
	/// # Add Pregap.
	///
	/// Shift the address forward by exactly two seconds, carrying into the
	/// minutes as needed.
	pub const fn add_pregap(self) -> Self {
		let sec = self.sec.saturating_add(2);
		if sec < 60 { Self { sec, ..self } }
		else if self.min == u8::MAX { Self::MAX }
		else {
			Self {
				min: self.min + 1,
				sec: sec - 60,
				frame: self.frame,
			}
		}
	}
}



#[must_use]
#[inline]
/// # LBA to MSF.
///
/// See [`Msf::from_lba`].
pub const fn lba_to_msf(lba: u32) -> Msf { Msf::from_lba(lba) }

#[must_use]
#[inline]
/// # MSF to LBA.
///
/// See [`Msf::to_lba`].
pub const fn msf_to_lba(msf: Msf) -> u32 { msf.to_lba() }



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_lba() {
		for (lba, msf) in [
			(0, Msf::new(0, 2, 0)),
			(33, Msf::new(0, 2, 33)),
			(179_318, Msf::new(39, 52, 68)),
			(4350, Msf::new(1, 0, 0)),
		] {
			assert_eq!(lba_to_msf(lba), msf, "LBA {lba} converted wrong.");
			assert_eq!(msf_to_lba(msf), lba, "MSF {msf} converted wrong.");
		}

		// The lead-in saturates.
		assert_eq!(Msf::new(0, 1, 10).to_lba(), 0);

		// Huge values cap.
		assert_eq!(Msf::from_frames(u32::MAX), Msf::MAX);
	}

	#[test]
	fn t_pregap() {
		for (raw, adj) in [
			(Msf::new(0, 2, 0), Msf::new(0, 0, 0)),
			(Msf::new(3, 45, 12), Msf::new(3, 43, 12)),
			(Msf::new(3, 1, 12), Msf::new(2, 59, 12)),
			(Msf::new(1, 0, 74), Msf::new(0, 58, 74)),
		] {
			assert_eq!(raw.remove_pregap(), adj, "Remove pregap failed for {raw}.");
			assert_eq!(adj.add_pregap(), raw, "Add pregap failed for {adj}.");
		}

		// Underflow.
		assert_eq!(Msf::new(0, 1, 50).remove_pregap(), Msf::new(0, 0, 0));

		// Removing the pregap is the same as subtracting the lead-in.
		let msf = Msf::new(12, 34, 56);
		assert_eq!(msf.remove_pregap().frames(), msf.to_lba());
	}

	#[test]
	fn t_display() {
		assert_eq!(Msf::new(1, 2, 3).to_string(), "01:02:03");
		assert_eq!(Msf::from([74, 59, 74]).to_string(), "74:59:74");
	}
}
