//! Quantity parsing and weight units
//!
//! Numeric values reach the core as loosely typed text (document-store
//! fields, search-API strings, user input). Stored and fetched values go
//! through [`parse_quantity`]; typed-in values go through
//! [`parse_decimal_input`], which also accepts a comma decimal separator.

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

/// Parse a non-negative, finite number from stored or fetched text.
///
/// Accepts surrounding whitespace only. A comma is not a number here, so
/// "1,200" is malformed rather than 1.2.
/// Returns `None` for empty, non-numeric, negative or non-finite input.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Parse a number typed in by the user, where "70,5" means 70.5.
pub fn parse_decimal_input(raw: &str) -> Option<f64> {
    parse_quantity(&raw.replace(',', "."))
}

/// Get the conversion factor to grams for a weight unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();

    match lower.trim() {
        "g" | "gram" | "grams" | "gr" => Some(1.0),
        "mg" | "milligram" | "milligrams" => Some(G_PER_MG),
        "kg" | "kilogram" | "kilograms" => Some(G_PER_KG),
        "oz" | "ounce" | "ounces" => Some(G_PER_OZ),
        "lb" | "lbs" | "pound" | "pounds" => Some(G_PER_LB),
        _ => None,
    }
}

/// Convert a weight expression like "100g", "1.5 oz" or "2 lbs" to grams.
///
/// Returns `None` for anything that is not a number followed by a weight
/// unit ("1 cup", "1 medium", "serving").
pub fn weight_to_grams(expr: &str) -> Option<f64> {
    let trimmed = expr.trim();
    let split_at = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());

    let (number, unit) = trimmed.split_at(split_at);
    let quantity = parse_quantity(number)?;
    let factor = grams_per_unit(unit)?;

    Some(quantity * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_plain() {
        assert_eq!(parse_quantity("250"), Some(250.0));
        assert_eq!(parse_quantity(" 3.57 "), Some(3.57));
        assert_eq!(parse_quantity("0"), Some(0.0));
    }

    #[test]
    fn test_parse_quantity_rejects_comma() {
        assert_eq!(parse_quantity("1,200"), None);
        assert_eq!(parse_quantity("1,5"), None);
    }

    #[test]
    fn test_parse_decimal_input_comma() {
        assert_eq!(parse_decimal_input("70,5"), Some(70.5));
        assert_eq!(parse_decimal_input(" 70.5 "), Some(70.5));
        assert_eq!(parse_decimal_input("-1,5"), None);
        assert_eq!(parse_decimal_input("abc"), None);
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("   "), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("12g"), None);
        assert_eq!(parse_quantity("-5"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity("inf"), None);
    }

    #[test]
    fn test_grams_per_unit() {
        assert_eq!(grams_per_unit("g"), Some(1.0));
        assert_eq!(grams_per_unit("OZ"), Some(G_PER_OZ));
        assert_eq!(grams_per_unit("lb"), Some(G_PER_LB));
        assert_eq!(grams_per_unit("cup"), None);
    }

    #[test]
    fn test_weight_to_grams() {
        assert_eq!(weight_to_grams("100g"), Some(100.0));
        assert_eq!(weight_to_grams("100 g"), Some(100.0));
        assert_eq!(weight_to_grams("1kg"), Some(1000.0));
        let oz = weight_to_grams("2 oz").unwrap();
        assert!((oz - 56.699).abs() < 0.001);
    }

    #[test]
    fn test_weight_to_grams_non_weight() {
        assert_eq!(weight_to_grams("1 cup"), None);
        assert_eq!(weight_to_grams("1 medium"), None);
        assert_eq!(weight_to_grams("serving"), None);
        assert_eq!(weight_to_grams(""), None);
    }
}
