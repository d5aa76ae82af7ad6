//! Quantity parsing and merging
//!
//! Quantities are free text ("2 kg", "1,5 l", "3"). When two items with the
//! same name are merged, their quantities are summed numerically if both
//! parse and carry the same unit; otherwise both are kept visible as
//! `"<existing> + <incoming>"` so the user can reconcile by hand.

/// A quantity split into numeric value and unit
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    /// The leading numeric value
    pub value: f64,
    /// The trailing unit, trimmed, original spelling preserved
    pub unit: String,
}

/// Parse a quantity string into value and unit
///
/// Accepts an integer or decimal (both `.` and `,` as decimal separator)
/// followed by an optional unit. Returns `None` if the text does not start
/// with a number.
pub fn parse_quantity(text: &str) -> Option<ParsedQuantity> {
    let text = text.trim();
    let bytes = text.as_bytes();

    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return None;
    }

    // Optional decimal part; the separator only counts if digits follow it
    if end < bytes.len() && (bytes[end] == b'.' || bytes[end] == b',') {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if frac > end + 1 {
            end = frac;
        }
    }

    let value: f64 = text[..end].replace(',', ".").parse().ok()?;
    let unit = text[end..].trim().to_string();

    Some(ParsedQuantity { value, unit })
}

/// Merge two optional quantity strings
///
/// - both absent: `None`
/// - exactly one present: returned unchanged
/// - both parseable with the same unit (case-insensitive): values summed,
///   formatted as an integer when whole, otherwise with one decimal place,
///   with the incoming unit spelling appended
/// - anything else: `"<existing> + <incoming>"`
pub fn merge_quantities(existing: Option<&str>, incoming: Option<&str>) -> Option<String> {
    let (existing, incoming) = match (existing, incoming) {
        (None, None) => return None,
        (None, Some(q)) | (Some(q), None) => return Some(q.to_string()),
        (Some(e), Some(i)) => (e, i),
    };

    if let (Some(parsed_existing), Some(parsed_incoming)) =
        (parse_quantity(existing), parse_quantity(incoming))
    {
        if parsed_existing.unit.eq_ignore_ascii_case(&parsed_incoming.unit) {
            let sum = parsed_existing.value + parsed_incoming.value;
            let formatted = if sum.fract() == 0.0 {
                format!("{}", sum as i64)
            } else {
                format!("{:.1}", sum)
            };
            return if parsed_incoming.unit.is_empty() {
                Some(formatted)
            } else {
                Some(format!("{} {}", formatted, parsed_incoming.unit))
            };
        }
    }

    // Can't merge numerically, keep both visible
    Some(format!("{} + {}", existing, incoming))
}
