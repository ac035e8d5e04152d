//! Alignment padding arithmetic
//!
//! Padding is always computed relative to the start offset of the enclosing
//! field, never relative to the buffer start: messages land at arbitrary
//! offsets inside a stream buffer (after a handshake, after an earlier
//! message), so absolute alignment would be wrong everywhere but offset 0.

/// Round `offset` up to the next `boundary` relative to `field_start`,
/// clamped to `max_offset`.
///
/// The clamp is the documented policy for truncated trailing padding: a
/// frame whose final padding bytes were cut off still ends cleanly at the
/// buffer end instead of pushing the offset past it. Boundaries of 0 or 1
/// mean no padding.
pub fn round_up(offset: usize, field_start: usize, boundary: usize, max_offset: usize) -> usize {
    debug_assert!(offset >= field_start);
    if boundary <= 1 {
        return offset.min(max_offset);
    }
    let rel = offset - field_start;
    let rem = rel % boundary;
    let padded = if rem == 0 { rel } else { rel + boundary - rem };
    field_start.saturating_add(padded).min(max_offset)
}

/// Round a length up to the next multiple of 8.
///
/// Used for the header-fields region, whose declared length is honored only
/// after 8-alignment when locating the body.
pub fn round_up_8(len: usize) -> usize {
    len.saturating_add(7) & !7
}
