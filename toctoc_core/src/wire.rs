/*!
# Toc Toc: Wire Plumbing

All READ TOC/PMA/ATIP responses share the same four-byte header: a
big-endian length (excluding the length field itself) followed by two
format-specific bytes.
*/

use crate::TocTocError;



/// # Header Size.
pub(crate) const HEADER_SIZE: usize = 4;



/// # Binary De/Serialization.
///
/// This trait is implemented by each of the table-of-contents structures,
/// converting them to and from their raw MMC wire formats.
///
/// Serialization follows a two-step convention: [`Codec::serialized_len`]
/// returns the exact number of bytes required, and
/// [`Codec::serialize_into`] fills a caller-provided buffer, refusing
/// (without writing anything) if it is too small.
pub trait Codec: Sized {
	/// # Deserialize.
	///
	/// Parse a raw response.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::Truncated`] if the data is shorter than its
	/// header claims, or [`TocTocError::Corrupted`] if it is otherwise
	/// malformed.
	fn deserialize(src: &[u8]) -> Result<Self, TocTocError>;

	/// # Serialized Length.
	///
	/// Return the exact number of bytes [`Codec::serialize_into`] would
	/// write, header included.
	///
	/// ## Errors
	///
	/// Returns an error if the structure cannot be serialized at all.
	fn serialized_len(&self) -> Result<usize, TocTocError>;

	/// # Serialize Into.
	///
	/// Write the structure to the start of `dst`, returning the number of
	/// bytes written.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::TooSmall`] with the required length if `dst`
	/// is too small, in which case nothing is written, or any error
	/// [`Codec::serialized_len`] might return.
	fn serialize_into(&self, dst: &mut [u8]) -> Result<usize, TocTocError>;

	/// # Serialize.
	///
	/// Serialize to a new, exactly-sized buffer.
	///
	/// ## Errors
	///
	/// Returns [`TocTocError::NoMem`] if the buffer cannot be allocated, or
	/// any error [`Codec::serialize_into`] might return.
	fn serialize(&self) -> Result<Vec<u8>, TocTocError> {
		let len = self.serialized_len()?;
		let mut out = Vec::new();
		out.try_reserve_exact(len).map_err(|_| TocTocError::NoMem)?;
		out.resize(len, 0);

		let written = self.serialize_into(&mut out)?;
		if written == len { Ok(out) }
		else { Err(TocTocError::Internal) }
	}
}



/// # Read Header.
///
/// Validate the header and return its two format-specific bytes along with
/// the payload, which must be a multiple of `unit` bytes.
///
/// Bytes beyond the declared length are ignored.
///
/// ## Errors
///
/// Returns [`TocTocError::Truncated`] if the header is incomplete or claims
/// more data than is present, and [`TocTocError::Corrupted`] if the length
/// is not congruent with `unit`.
pub(crate) fn read_header(src: &[u8], unit: usize) -> Result<(u8, u8, &[u8]), TocTocError> {
	let [a, b, c, d, ..] = *src else { return Err(TocTocError::Truncated); };
	let len = usize::from(u16::from_be_bytes([a, b]));
	if len < 2 { return Err(TocTocError::Corrupted); }

	let payload = src.get(HEADER_SIZE..len + 2).ok_or(TocTocError::Truncated)?;
	if payload.len() % unit == 0 { Ok((c, d, payload)) }
	else { Err(TocTocError::Corrupted) }
}

/// # Write Header.
///
/// Write a header for a payload of `len` bytes to the start of `dst`, which
/// the caller must have already sized.
///
/// ## Errors
///
/// Returns [`TocTocError::Corrupted`] if the length cannot be represented,
/// or [`TocTocError::Internal`] if `dst` is too short.
pub(crate) fn write_header(dst: &mut [u8], len: usize, c: u8, d: u8)
-> Result<(), TocTocError> {
	let len = u16::try_from(len + 2).map_err(|_| TocTocError::Corrupted)?;
	let [a, b] = len.to_be_bytes();
	dst.get_mut(..HEADER_SIZE)
		.ok_or(TocTocError::Internal)?
		.copy_from_slice(&[a, b, c, d]);
	Ok(())
}

/// # Check Capacity.
///
/// Return `Ok(len)` if `dst` can hold `len` bytes, or
/// [`TocTocError::TooSmall`] otherwise.
pub(crate) const fn check_capacity(dst: &[u8], len: usize) -> Result<usize, TocTocError> {
	if dst.len() < len { Err(TocTocError::TooSmall(len)) }
	else { Ok(len) }
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_read_header() {
		// Too short.
		assert_eq!(read_header(&[0, 2, 1], 8), Err(TocTocError::Truncated));

		// Declared length exceeds the buffer.
		assert_eq!(read_header(&[0, 10, 1, 1, 0, 0, 0], 8), Err(TocTocError::Truncated));

		// Not a multiple.
		assert_eq!(read_header(&[0, 5, 1, 1, 0, 0, 0], 8), Err(TocTocError::Corrupted));

		// Nonsense length.
		assert_eq!(read_header(&[0, 1, 1, 1], 8), Err(TocTocError::Corrupted));

		// Empty payload is fine.
		assert_eq!(read_header(&[0, 2, 1, 3], 8), Ok((1, 3, &[][..])));

		// Trailing garbage is ignored.
		let (_, _, payload) = read_header(&[0, 4, 1, 1, 9, 9, 7], 2)
			.expect("Header failed.");
		assert_eq!(payload, &[9, 9]);
	}

	#[test]
	fn t_write_header() {
		let mut buf = [0_u8; 12];
		assert!(write_header(&mut buf, 8, 1, 1).is_ok());
		assert_eq!(&buf[..4], &[0, 10, 1, 1]);
		assert_eq!(read_header(&buf, 8), Ok((1, 1, &[0_u8; 8][..])));

		assert_eq!(write_header(&mut buf, 70_000, 1, 1), Err(TocTocError::Corrupted));
		assert_eq!(write_header(&mut buf[..3], 8, 1, 1), Err(TocTocError::Internal));
	}
}
