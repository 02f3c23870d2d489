//! Utilities for grid cell keys (`"col:row"`) and A1-style labels.

/// Convert a 0-based column index to spreadsheet column letters (A, B, ..., Z, AA, AB, ...)
pub fn col_to_letter(col: u32) -> String {
    let mut result = Vec::new();
    let mut n = u64::from(col) + 1; // Convert to 1-based
    while n > 0 {
        n -= 1;
        let digit = u8::try_from(n % 26).unwrap_or(0);
        result.push(char::from(b'A' + digit));
        n /= 26;
    }
    result.iter().rev().collect()
}

/// A1-style label for a 0-based `(col, row)`, e.g. `(27, 9)` -> `"AB10"`.
pub fn cell_label(col: u32, row: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}

/// Lookup key for a 0-based `(col, row)`.
pub fn coord_key(col: u32, row: u32) -> String {
    format!("{col}:{row}")
}

/// Parse a lookup key like `"3:7"` into `(col, row)`.
pub fn parse_coord_key(key: &str) -> Option<(u32, u32)> {
    let (col, row) = key.trim().split_once(':')?;
    Some((col.parse().ok()?, row.parse().ok()?))
}

/// Parse a cell label like "A1" into (col, row) where col and row are 0-indexed.
pub fn parse_cell_label(label: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for b in label.trim().bytes() {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper - b'A') + 1)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((col - 1, row - 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letter_boundaries() {
        let test_cases = [
            (0, "A"),
            (25, "Z"),
            (26, "AA"),
            (51, "AZ"),
            (52, "BA"),
            (701, "ZZ"),
            (702, "AAA"),
        ];
        for (col, expected) in test_cases {
            assert_eq!(col_to_letter(col), expected, "col {col}");
        }
    }

    #[test]
    fn test_label_is_one_based_row() {
        assert_eq!(cell_label(0, 0), "A1");
        assert_eq!(cell_label(27, 9), "AB10");
    }

    #[test]
    fn test_label_roundtrip() {
        for (col, row) in [(0, 0), (25, 3), (26, 99), (701, 1)] {
            let label = cell_label(col, row);
            assert_eq!(parse_cell_label(&label), Some((col, row)), "{label}");
        }
    }

    #[test]
    fn test_parse_label_rejects_garbage() {
        assert_eq!(parse_cell_label(""), None);
        assert_eq!(parse_cell_label("A"), None);
        assert_eq!(parse_cell_label("12"), None);
        assert_eq!(parse_cell_label("A0"), None);
        assert_eq!(parse_cell_label("1A"), None);
        assert_eq!(parse_cell_label("A-1"), None);
    }

    #[test]
    fn test_coord_key() {
        assert_eq!(coord_key(3, 7), "3:7");
        assert_eq!(parse_coord_key("3:7"), Some((3, 7)));
        assert_eq!(parse_coord_key("3;7"), None);
        assert_eq!(parse_coord_key("x:1"), None);
    }
}
