//! Cell keys in the flattened grid map

use std::fmt;

const PREFIX: &str = "cell_";

/// A `(row, col)` pair encoded as `"cell_<row>_<col>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Decode a key; anything not matching the key grammar is `None`
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix(PREFIX)?;
        let (row, col) = rest.split_once('_')?;
        Some(Self {
            row: parse_index(row)?,
            col: parse_index(col)?,
        })
    }
}

fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}_{}", PREFIX, self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(CellKey::new(0, 0).to_string(), "cell_0_0");
        assert_eq!(CellKey::new(12, 3).to_string(), "cell_12_3");
    }

    #[test]
    fn test_parse() {
        assert_eq!(CellKey::parse("cell_0_0"), Some(CellKey::new(0, 0)));
        assert_eq!(CellKey::parse("cell_99_19"), Some(CellKey::new(99, 19)));
        assert_eq!(CellKey::parse("cell_007_1"), Some(CellKey::new(7, 1)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for key in [
            "", "cell_", "cell_1", "cell_1_", "cell__1", "cell_a_1", "cell_1_2_3", "cell_+1_2",
            "cell_-1_2", "row_1_2", "CELL_1_2", "cell_99999999999999999999999_0",
        ] {
            assert_eq!(CellKey::parse(key), None, "{key}");
        }
    }
}
