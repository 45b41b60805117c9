//! Cell value type

use std::fmt;

/// Decimal places kept when displaying a non-integral number
const DISPLAY_DECIMALS: usize = 2;

/// The content of one grid cell
///
/// A cell keeps the raw text the user typed and a flag telling whether that
/// text is a number. The flag is derived on construction, so it can never
/// disagree with the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CellData {
    value: String,
    is_numeric: bool,
}

impl CellData {
    /// Create a cell from raw input text, detecting whether it is numeric
    pub fn from_value<S: Into<String>>(value: S) -> Self {
        let value = value.into();
        let is_numeric = parse_number(&value).is_some();
        Self { value, is_numeric }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self::default()
    }

    /// The raw text as entered
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the trimmed value parses as a finite number
    pub fn is_numeric(&self) -> bool {
        self.is_numeric
    }

    /// Whether the trimmed value has zero length
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// The numeric value, if this is a numeric cell
    pub fn as_number(&self) -> Option<f64> {
        if self.is_numeric {
            parse_number(&self.value)
        } else {
            None
        }
    }

    /// Text to show in the grid
    ///
    /// Integral numbers drop the decimal point ("12.00" shows as "12"),
    /// other numbers keep at most two decimals with trailing zeros stripped
    /// ("12.50" shows as "12.5"). Text is shown verbatim.
    pub fn display_value(&self) -> String {
        match self.as_number() {
            Some(n) => format_number(n),
            None => self.value.clone(),
        }
    }

    /// Case-insensitive substring match against the raw value
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        self.value.to_lowercase().contains(needle_lower)
    }
}

impl fmt::Display for CellData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<&str> for CellData {
    fn from(s: &str) -> Self {
        CellData::from_value(s)
    }
}

impl From<String> for CellData {
    fn from(s: String) -> Self {
        CellData::from_value(s)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        let s = format!("{:.0}", n);
        return if s == "-0" { "0".to_string() } else { s };
    }

    let fixed = format!("{:.*}", DISPLAY_DECIMALS, n);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
