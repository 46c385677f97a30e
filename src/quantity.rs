//! Ingredient quantities: parsing, scaling, combining and rendering.
//!
//! Accepted amounts are integers (`2`), decimals (`1.5`), simple fractions
//! (`1/2`), mixed numbers (`1 1/2`) and unicode vulgar fractions (`½`, `1½`),
//! optionally followed by a unit word. Anything else, ranges such as `2-3`
//! included, is kept verbatim with no numeric amount, so the ingredient stays
//! usable but is never scaled.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far a scaled fractional part may sit from a clean fraction and still
/// be snapped to it.
pub const SNAP_TOLERANCE: f64 = 0.05;

/// Tolerance used when rendering an amount that was not produced by scaling.
const EXACT_TOLERANCE: f64 = 1e-6;

/// Smallest amount scaling may produce from a positive quantity.
const MIN_SCALED_AMOUNT: f64 = 0.1;

/// Fractional parts a scaled amount snaps to.
const SNAP_POINTS: [f64; 7] = [0.0, 0.25, 1.0 / 3.0, 0.5, 2.0 / 3.0, 0.75, 1.0];

/// Fractions rendered as `n/d` rather than as decimals.
const RENDERED_FRACTIONS: [(u32, u32); 9] = [
    (1, 8),
    (1, 4),
    (1, 3),
    (3, 8),
    (1, 2),
    (5, 8),
    (2, 3),
    (3, 4),
    (7, 8),
];

const VULGAR_FRACTIONS: [(char, f64); 15] = [
    ('½', 0.5),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    /// Numeric amount; `None` when the text had no leading numeral.
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub raw_text: String,
}

impl Quantity {
    pub fn parse(raw: &str) -> Quantity {
        let text = raw.trim();
        // A unit is a word; "2-3" or "1, heaped" stays as written.
        let parsed = split_amount(text).filter(|(_, rest)| {
            rest.trim()
                .chars()
                .next()
                .map_or(true, char::is_alphabetic)
        });
        match parsed {
            Some((amount, rest)) => {
                let unit = rest.trim();
                Quantity {
                    amount: Some(amount),
                    unit: (!unit.is_empty()).then(|| unit.to_string()),
                    raw_text: text.to_string(),
                }
            }
            None => Quantity {
                amount: None,
                unit: None,
                raw_text: text.to_string(),
            },
        }
    }

    pub fn from_amount(amount: f64, unit: Option<&str>) -> Quantity {
        let unit = unit.map(str::trim).filter(|u| !u.is_empty());
        Quantity {
            amount: Some(amount),
            unit: unit.map(str::to_string),
            raw_text: render_parts(amount, unit),
        }
    }

    /// Attach `unit` when the quantity does not already carry one.
    ///
    /// A quantity kept verbatim gets the unit appended to its text unless
    /// the text already names it.
    pub fn with_default_unit(mut self, unit: Option<&str>) -> Quantity {
        let Some(unit) = unit.map(str::trim).filter(|u| !u.is_empty()) else {
            return self;
        };
        if self.unit.is_some() {
            return self;
        }
        match self.amount {
            Some(amount) => {
                self.unit = Some(unit.to_string());
                self.raw_text = render_parts(amount, Some(unit));
            }
            None if !self.raw_text.trim().is_empty() && !names_unit(&self.raw_text, unit) => {
                self.raw_text = format!("{} {}", self.raw_text.trim(), unit);
            }
            None => {}
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.raw_text.trim().is_empty()
    }

    /// Multiply the amount by `factor`, snapping the result to a clean
    /// kitchen fraction when one is close.
    ///
    /// Quantities without an amount are returned unchanged, as are quantities
    /// scaled by a non-positive or non-finite factor.
    pub fn scale(&self, factor: f64) -> Quantity {
        if !factor.is_finite() || factor <= 0.0 {
            warn!("Ignoring invalid scale factor {factor}");
            return self.clone();
        }
        match self.amount {
            Some(amount) => {
                let scaled = snap(amount * factor);
                Quantity::from_amount(scaled, self.unit.as_deref())
            }
            None => self.clone(),
        }
    }

    /// Merge two quantities of the same ingredient.
    ///
    /// Amounts are summed only when both are numeric and the units agree.
    /// Otherwise the raw texts are joined with `" + "` and the amount is
    /// dropped, so nothing the user wrote is lost.
    pub fn combine(&self, other: &Quantity) -> Quantity {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        if let (Some(a), Some(b)) = (self.amount, other.amount) {
            if unit_key(self.unit.as_deref()) == unit_key(other.unit.as_deref()) {
                return Quantity::from_amount(a + b, self.unit.as_deref());
            }
        }
        Quantity {
            amount: None,
            unit: None,
            raw_text: format!("{} + {}", self.raw_text.trim(), other.raw_text.trim()),
        }
    }

    /// Render `"{amount} {unit} {name}"`, leaving out absent segments.
    ///
    /// `unit` overrides the quantity's own unit. A quantity without an amount
    /// contributes its raw text instead of a numeral.
    pub fn format_with(&self, unit: Option<&str>, name: &str) -> String {
        let mut parts: Vec<String> = Vec::new();
        match self.amount {
            Some(amount) => {
                parts.push(render_amount(amount));
                if let Some(unit) = unit.or(self.unit.as_deref()) {
                    parts.push(unit.to_string());
                }
            }
            None => {
                parts.push(self.raw_text.clone());
                if let Some(unit) = unit.filter(|u| !names_unit(&self.raw_text, u)) {
                    if !self.raw_text.trim().is_empty() {
                        parts.push(unit.to_string());
                    }
                }
            }
        }
        parts.push(name.to_string());
        parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount {
            Some(amount) => f.write_str(&render_parts(amount, self.unit.as_deref())),
            None => f.write_str(self.raw_text.trim()),
        }
    }
}

/// Render an amount as a whole number, a kitchen fraction or a short decimal.
pub fn render_amount(value: f64) -> String {
    let whole = value.trunc();
    let frac = value - whole;

    if frac.abs() < EXACT_TOLERANCE {
        return format!("{}", whole as i64);
    }
    if (1.0 - frac).abs() < EXACT_TOLERANCE {
        return format!("{}", whole as i64 + 1);
    }
    for (num, den) in RENDERED_FRACTIONS {
        if (frac - num as f64 / den as f64).abs() < EXACT_TOLERANCE {
            return if whole == 0.0 {
                format!("{num}/{den}")
            } else {
                format!("{} {num}/{den}", whole as i64)
            };
        }
    }

    let decimal = format!("{value:.3}");
    decimal
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn render_parts(amount: f64, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{} {}", render_amount(amount), unit),
        None => render_amount(amount),
    }
}

fn snap(value: f64) -> f64 {
    let whole = value.floor();
    let frac = value - whole;
    let nearest = SNAP_POINTS.iter().copied().min_by(|a, b| {
        (frac - a)
            .abs()
            .partial_cmp(&(frac - b).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let snapped = match nearest {
        Some(point) if (frac - point).abs() <= SNAP_TOLERANCE => whole + point,
        _ => (value * 10.0).round() / 10.0,
    };

    // Tiny amounts must never collapse to zero.
    if snapped <= 0.0 && value > 0.0 {
        MIN_SCALED_AMOUNT
    } else {
        snapped
    }
}

fn names_unit(raw: &str, unit: &str) -> bool {
    let unit = unit_key(Some(unit));
    raw.split(|c: char| !c.is_alphabetic())
        .any(|word| !word.is_empty() && unit_key(Some(word)) == unit)
}

/// Key used to decide whether two units are the same.
fn unit_key(unit: Option<&str>) -> Option<String> {
    let unit = unit?.trim().trim_end_matches('.').to_lowercase();
    if unit.is_empty() {
        return None;
    }
    if unit.len() > 2 && unit.ends_with('s') && !unit.ends_with("ss") {
        Some(unit[..unit.len() - 1].to_string())
    } else {
        Some(unit)
    }
}

/// Split a leading amount off `text`, returning it with the remaining text.
fn split_amount(text: &str) -> Option<(f64, &str)> {
    if let Some((value, rest)) = leading_vulgar(text) {
        return Some((value, rest));
    }

    let (number, rest) = leading_number(text)?;
    let is_integer = !number.contains('.');
    let value: f64 = number.parse().ok()?;

    // "1/2"
    if let Some(after_slash) = rest.strip_prefix('/') {
        if !is_integer {
            return None;
        }
        let (denominator, rest) = leading_digits(after_slash)?;
        let denominator: f64 = denominator.parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some((value / denominator, rest));
    }

    // "1½"
    if let Some((fraction, rest)) = leading_vulgar(rest) {
        return is_integer.then_some((value + fraction, rest));
    }

    // "1 1/2" or "1 ½"
    if is_integer && rest.starts_with(char::is_whitespace) {
        let candidate = rest.trim_start();
        if let Some((fraction, after)) = leading_vulgar(candidate) {
            return Some((value + fraction, after));
        }
        if let Some((numerator, after)) = leading_digits(candidate) {
            if let Some(after_slash) = after.strip_prefix('/') {
                if let Some((denominator, after)) = leading_digits(after_slash) {
                    if let (Ok(n), Ok(d)) = (numerator.parse::<f64>(), denominator.parse::<f64>()) {
                        if d != 0.0 && n < d {
                            return Some((value + n / d, after));
                        }
                    }
                }
            }
        }
    }

    Some((value, rest))
}

fn leading_digits(text: &str) -> Option<(&str, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    (end > 0).then(|| text.split_at(end))
}

/// An integer or decimal at the start of `text` (`"2"`, `"1.5"`, `".5"`).
fn leading_number(text: &str) -> Option<(&str, &str)> {
    let mut seen_dot = false;
    let mut seen_digit = false;
    let mut end = 0;
    for (index, c) in text.char_indices() {
        if c.is_ascii_digit() {
            seen_digit = true;
        } else if c == '.' && !seen_dot {
            // A trailing dot belongs to the text ("2. Stir"), not the number.
            let next_is_digit = text[index + 1..]
                .chars()
                .next()
                .is_some_and(|n| n.is_ascii_digit());
            if !next_is_digit {
                break;
            }
            seen_dot = true;
        } else {
            break;
        }
        end = index + c.len_utf8();
    }
    seen_digit.then(|| text.split_at(end))
}

fn leading_vulgar(text: &str) -> Option<(f64, &str)> {
    let first = text.chars().next()?;
    VULGAR_FRACTIONS
        .iter()
        .find(|(c, _)| *c == first)
        .map(|(_, value)| (*value, &text[first.len_utf8()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(raw: &str) -> Option<f64> {
        Quantity::parse(raw).amount
    }

    #[test]
    fn test_parse_integers_and_decimals() {
        assert_eq!(amount("2"), Some(2.0));
        assert_eq!(amount("  12  "), Some(12.0));
        assert_eq!(amount("1.5"), Some(1.5));
        assert_eq!(amount(".5"), Some(0.5));
        assert_eq!(amount("0"), Some(0.0));
    }

    #[test]
    fn test_parse_fractions() {
        assert_eq!(amount("1/2"), Some(0.5));
        assert_eq!(amount("3/4 cup"), Some(0.75));
        assert_eq!(amount("1 1/2"), Some(1.5));
        assert_eq!(amount("2 3/4 cups"), Some(2.75));
        assert_eq!(amount("½"), Some(0.5));
        assert_eq!(amount("1½ tsp"), Some(1.5));
        assert_eq!(amount("1 ¼"), Some(1.25));
    }

    #[test]
    fn test_parse_unit() {
        let q = Quantity::parse("1 1/2 cups");
        assert_eq!(q.amount, Some(1.5));
        assert_eq!(q.unit.as_deref(), Some("cups"));
        assert_eq!(q.raw_text, "1 1/2 cups");

        let q = Quantity::parse("200g");
        assert_eq!(q.amount, Some(200.0));
        assert_eq!(q.unit.as_deref(), Some("g"));
    }

    #[test]
    fn test_parse_failure_keeps_text() {
        let q = Quantity::parse("to taste");
        assert_eq!(q.amount, None);
        assert_eq!(q.unit, None);
        assert_eq!(q.raw_text, "to taste");

        let q = Quantity::parse("1/0 cup");
        assert_eq!(q.amount, None);
        assert_eq!(q.raw_text, "1/0 cup");
    }

    #[test]
    fn test_render_amount() {
        assert_eq!(render_amount(2.0), "2");
        assert_eq!(render_amount(0.5), "1/2");
        assert_eq!(render_amount(1.5), "1 1/2");
        assert_eq!(render_amount(1.0 / 3.0), "1/3");
        assert_eq!(render_amount(0.125), "1/8");
        assert_eq!(render_amount(0.3), "0.3");
        assert_eq!(render_amount(2.25), "2 1/4");
        assert_eq!(render_amount(0.0), "0");
    }

    #[test]
    fn test_format_round_trip_is_numerically_equivalent() {
        for raw in ["2", "1.5", "1/2", "1 1/2", "0.3", "2 3/4", "1/3", "0.125"] {
            let q = Quantity::parse(raw);
            let rendered = q.format_with(None, "");
            assert_eq!(
                Quantity::parse(&rendered).amount.map(|a| (a * 1000.0).round()),
                q.amount.map(|a| (a * 1000.0).round()),
                "{raw} rendered as {rendered}"
            );
        }
    }

    #[test]
    fn test_scale() {
        assert_eq!(Quantity::parse("1").scale(2.0).amount, Some(2.0));
        assert_eq!(Quantity::parse("1/2").scale(2.0).amount, Some(1.0));

        let third = Quantity::parse("1/3 cup").scale(2.0);
        assert_eq!(third.raw_text, "2/3 cup");
        assert_eq!(third.unit.as_deref(), Some("cup"));

        // 0.6 is not close to any clean fraction: one decimal place
        let odd = Quantity::parse("1").scale(0.6);
        assert_eq!(odd.amount, Some(0.6));
        assert_eq!(odd.raw_text, "0.6");

        // 3 * 0.33 = 0.99 snaps to 1
        assert_eq!(Quantity::parse("0.33").scale(3.0).amount, Some(1.0));
    }

    #[test]
    fn test_scale_keeps_unparsed_and_rejects_bad_factors() {
        let pinch = Quantity::parse("a pinch");
        assert_eq!(pinch.scale(3.0), pinch);

        let two = Quantity::parse("2 cups");
        assert_eq!(two.scale(0.0), two);
        assert_eq!(two.scale(f64::NAN), two);
    }

    #[test]
    fn test_scale_never_collapses_to_zero() {
        let q = Quantity::parse("1/8 tsp").scale(0.25);
        assert!(q.amount.unwrap() > 0.0);

        let tiny = Quantity::parse("1/8 tsp").scale(0.002);
        assert_eq!(tiny.amount, Some(0.1));
        assert_eq!(tiny.raw_text, "0.1 tsp");
        assert_eq!(tiny.format_with(None, "salt"), "0.1 tsp salt");
    }

    #[test]
    fn test_scaled_amounts_keep_one_decimal() {
        for factor in [0.002, 0.01, 0.03, 0.17, 0.41, 0.93, 1.37] {
            let rendered = Quantity::parse("1 cup").scale(factor).to_string();
            let number = rendered.trim_end_matches(" cup");
            assert_ne!(number, "0", "factor {factor}");
            if let Some((_, decimals)) = number.split_once('.') {
                assert_eq!(decimals.len(), 1, "factor {factor} rendered {rendered}");
            }
        }
    }

    #[test]
    fn test_ranges_are_kept_verbatim() {
        let q = Quantity::parse("2-3");
        assert_eq!(q.amount, None);
        assert_eq!(q.raw_text, "2-3");

        let q = Quantity::parse("3–4 cups");
        assert_eq!(q.amount, None);
        assert_eq!(q.raw_text, "3–4 cups");

        let q = Quantity::parse("2-3").with_default_unit(Some("cloves"));
        assert_eq!(q.raw_text, "2-3 cloves");
        assert_eq!(q.format_with(None, "garlic"), "2-3 cloves garlic");

        let q = Quantity::parse("2-3 cloves").with_default_unit(Some("cloves"));
        assert_eq!(q.raw_text, "2-3 cloves");

        let combined = Quantity::parse("2-3")
            .with_default_unit(Some("cloves"))
            .combine(&Quantity::parse("1 clove"));
        assert_eq!(combined.raw_text, "2-3 cloves + 1 clove");
    }

    #[test]
    fn test_combine_same_unit() {
        let q = Quantity::parse("1 cup").combine(&Quantity::parse("1 cup"));
        assert_eq!(q.amount, Some(2.0));
        assert_eq!(q.unit.as_deref(), Some("cup"));

        let q = Quantity::parse("1 clove").combine(&Quantity::parse("2 cloves"));
        assert_eq!(q.amount, Some(3.0));

        let q = Quantity::parse("1").combine(&Quantity::parse("1/2"));
        assert_eq!(q.amount, Some(1.5));
        assert_eq!(q.unit, None);
    }

    #[test]
    fn test_combine_different_units_concatenates() {
        let q = Quantity::parse("1 cup").combine(&Quantity::parse("2 tbsp"));
        assert_eq!(q.amount, None);
        assert_eq!(q.raw_text, "1 cup + 2 tbsp");

        let q = q.combine(&Quantity::parse("a splash"));
        assert_eq!(q.raw_text, "1 cup + 2 tbsp + a splash");
    }

    #[test]
    fn test_combine_with_empty_keeps_other() {
        let q = Quantity::parse("2 eggs").combine(&Quantity::parse(""));
        assert_eq!(q.amount, Some(2.0));
        let q = Quantity::parse("").combine(&Quantity::parse("2 eggs"));
        assert_eq!(q.amount, Some(2.0));
    }

    #[test]
    fn test_format_with() {
        let q = Quantity::parse("2");
        assert_eq!(q.format_with(Some("cups"), "flour"), "2 cups flour");
        assert_eq!(Quantity::parse("1/2 tsp").format_with(None, "salt"), "1/2 tsp salt");
        assert_eq!(Quantity::parse("").format_with(None, "salt"), "salt");
        assert_eq!(Quantity::parse("pinch").format_with(None, "salt"), "pinch salt");
        assert_eq!(Quantity::parse("0").format_with(None, "sugar"), "0 sugar");
        assert_eq!(Quantity::parse("2-3").format_with(Some("cloves"), "garlic"), "2-3 cloves garlic");
    }

    #[test]
    fn test_with_default_unit() {
        let q = Quantity::parse("2").with_default_unit(Some("cloves"));
        assert_eq!(q.unit.as_deref(), Some("cloves"));
        assert_eq!(q.to_string(), "2 cloves");

        let q = Quantity::parse("2 cups").with_default_unit(Some("tbsp"));
        assert_eq!(q.unit.as_deref(), Some("cups"));
    }
}
