/*!
# Toc Toc: Single-Byte Character Sets
*/



/// # Latin-1 Table.
pub(super) const LATIN1: [char; 256] = table(256);

/// # ASCII Table.
///
/// Bytes beyond the seven-bit range have no mapping and decode as `'?'`.
pub(super) const ASCII: [char; 256] = table(128);



#[allow(clippy::cast_possible_truncation)]
/// # Build Table.
///
/// Map the first `len` bytes to the codepoints of the same value, and
/// everything else to `'?'`.
const fn table(len: usize) -> [char; 256] {
	let mut out = ['?'; 256];
	let mut idx = 0;
	while idx < len {
		out[idx] = idx as u8 as char;
		idx += 1;
	}
	out
}

/// # Decode Prefix.
///
/// Decode up to (and including) the first NUL, returning the string and the
/// number of bytes consumed.
pub(super) fn decode_prefix(table: &[char; 256], src: &[u8]) -> (String, usize) {
	let mut out = String::with_capacity(src.len());
	for (idx, &b) in src.iter().enumerate() {
		if b == 0 { return (out, idx + 1); }
		out.push(table[usize::from(b)]);
	}
	(out, src.len())
}

/// # Encode Each.
///
/// Reverse lookups are verified against the table so that codepoints outside
/// the set become `'?'`. So does NUL, which would end the string early.
pub(super) fn encode_each<F>(table: &[char; 256], src: &str, mut cb: F)
where F: FnMut(&[u8]) {
	for c in src.chars() {
		let b = u8::try_from(u32::from(c))
			.ok()
			.filter(|&b| b != 0 && table[usize::from(b)] == c)
			.unwrap_or(b'?');
		cb(&[b]);
	}
}
