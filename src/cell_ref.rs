//! Utilities for Excel-style cell references.

/// Parse a cell reference like "A1" into (col, row), both 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(usize, usize)> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Parse a cell reference from raw bytes (ASCII) into (col, row), 0-indexed.
///
/// Bytes variant for use with raw XML attribute values from quick-xml.
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(usize, usize)> {
    let mut col: usize = 0;
    let mut row: usize = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            let upper = if b.is_ascii_lowercase() { b - 32 } else { b };
            col = col * 26 + (usize::from(upper - b'A') + 1);
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row * 10 + usize::from(b - b'0');
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row {
        return None;
    }

    Some((col.saturating_sub(1), row.saturating_sub(1)))
}

/// Convert a 0-indexed column number to its letter form ("A", "G", "AA").
#[must_use]
#[allow(clippy::cast_possible_truncation)] // n % 26 always fits in a u8
pub fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col + 1; // Convert to 1-based
    while n > 0 {
        n -= 1;
        let c = char::from(b'A' + (n % 26) as u8);
        result.insert(0, c);
        n /= 26;
    }
    result
}
