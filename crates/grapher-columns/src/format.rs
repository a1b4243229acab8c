//! Number formatting shared by the numeric column types.

use grapher_model::ColumnDef;

pub const DEFAULT_DECIMAL_PLACES: u8 = 2;

/// Display settings taken from a column definition.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormatOptions<'a> {
    pub num_decimal_places: Option<u8>,
    pub short_unit: Option<&'a str>,
}

impl<'a> FormatOptions<'a> {
    pub fn from_def(def: &'a ColumnDef) -> Self {
        Self {
            num_decimal_places: def.num_decimal_places,
            short_unit: def.short_unit.as_deref().filter(|unit| !unit.is_empty()),
        }
    }

    pub fn decimal_places(&self) -> usize {
        usize::from(self.num_decimal_places.unwrap_or(DEFAULT_DECIMAL_PLACES))
    }
}

/// Rounds to `decimals`, trims trailing zeros, optionally groups thousands.
pub fn format_number(value: f64, decimals: usize, group_thousands: bool) -> String {
    let rounded = format!("{value:.decimals$}");
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (digits, None),
    };
    let is_zero = int_part.chars().all(|ch| ch == '0') && frac_part.is_none();
    let mut out = String::with_capacity(trimmed.len() + int_part.len() / 3 + 1);
    if negative && !is_zero {
        out.push('-');
    }
    if group_thousands {
        out.push_str(&group_digits(int_part));
    } else {
        out.push_str(int_part);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Attaches a short unit the way charts label values: currency symbols lead,
/// `%` trails directly, anything else trails after a space.
pub fn with_short_unit(formatted: String, short_unit: Option<&str>) -> String {
    match short_unit {
        None => formatted,
        Some(unit @ ("$" | "£" | "€")) => match formatted.strip_prefix('-') {
            Some(rest) => format!("-{unit}{rest}"),
            None => format!("{unit}{formatted}"),
        },
        Some("%") => format!("{formatted}%"),
        Some(unit) => format!("{formatted} {unit}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_trimmed_decimals() {
        assert_eq!(format_number(1234567.891, 2, true), "1,234,567.89");
        assert_eq!(format_number(1000.0, 2, true), "1,000");
        assert_eq!(format_number(0.5, 2, false), "0.5");
        assert_eq!(format_number(-1234.0, 0, true), "-1,234");
        assert_eq!(format_number(-0.001, 2, true), "0");
    }

    #[test]
    fn short_units_are_placed_by_kind() {
        assert_eq!(with_short_unit("12".into(), Some("$")), "$12");
        assert_eq!(with_short_unit("-12".into(), Some("$")), "-$12");
        assert_eq!(with_short_unit("12".into(), Some("%")), "12%");
        assert_eq!(with_short_unit("12".into(), Some("t")), "12 t");
        assert_eq!(with_short_unit("12".into(), None), "12");
    }
}
