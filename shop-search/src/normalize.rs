//! Package-size normalisation for product titles.
//!
//! Extracts a canonical quantity such as `"12 x 12 oz (144 oz)"` from free
//! text. Four pattern rules are tried in priority order and the first one
//! that matches wins:
//!
//! 1. multipack with separator: `12 x 12 oz`, `6×500ml`
//! 2. pack-count phrasing: `Pack of 2 1 lb`, `12 pack, 12 fl oz`
//! 3. single quantity: `16oz`, `2 gallons`
//! 4. count only: `12 ct`, `100 count`
//!
//! The parser is a best-effort heuristic. Ambiguous or malformed text yields
//! `None` and nothing here panics.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Unit alternation shared by the quantity rules. Longer spellings come
/// before their prefixes so leftmost-first matching picks the full token.
const UNIT_PATTERN: &str = r"(?P<unit>fl\.? ?oz|fluid ounces?|gallons?|gal|milliliters?|millilitres?|ml|pounds?|lbs?|kilograms?|kgs?|liters?|litres?|l|grams?|g|ounces?|oz)\b";

/// A number may not continue a word, a digit group or a decimal.
const NUMBER_START: &str = r"(?:^|[^\w.,])";

const MAGNITUDE_PATTERN: &str = r"(?P<mag>[0-9]+(?:\.[0-9]+)?)";

/// Filler between a pack count and its magnitude. It must end on a character
/// that could start a number, so `B12` or `.5` is never read as a whole size.
const PACK_SEPARATOR: &str = r"[^0-9]*?[^\w.,]";

/// Largest number of fractional digits kept exactly.
const MAX_SCALE: u32 = 18;

/// Canonical units recognised by the normaliser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Gram,
    Kilogram,
    Pound,
    Ounce,
    FluidOunce,
    Milliliter,
    Liter,
    Gallon,
}

impl Unit {
    /// Canonical code used in normalised output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Pound => "lb",
            Self::Ounce => "oz",
            Self::FluidOunce => "fl oz",
            Self::Milliliter => "ml",
            Self::Liter => "l",
            Self::Gallon => "gal",
        }
    }

    /// Resolve a unit token as written in a title.
    ///
    /// Matching is case-insensitive and ignores a trailing `.` or `,` as well
    /// as the dot and space inside `fl. oz`.
    pub fn from_token(token: &str) -> Option<Self> {
        let trimmed = token.trim().trim_end_matches(['.', ',']);
        let compact: String = trimmed
            .chars()
            .filter(|c| *c != '.' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        let unit = match compact.as_str() {
            "g" | "gram" | "grams" => Self::Gram,
            "kg" | "kgs" | "kilogram" | "kilograms" => Self::Kilogram,
            "lb" | "lbs" | "pound" | "pounds" => Self::Pound,
            "oz" | "ounce" | "ounces" => Self::Ounce,
            "floz" | "fluidounce" | "fluidounces" => Self::FluidOunce,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Self::Milliliter,
            "l" | "liter" | "liters" | "litre" | "litres" => Self::Liter,
            "gal" | "gallon" | "gallons" => Self::Gallon,
            _ => return None,
        };
        Some(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An exact non-negative decimal: `mantissa / 10^scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Magnitude {
    mantissa: u64,
    scale: u32,
}

impl Magnitude {
    fn parse(text: &str) -> Option<Self> {
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (text, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let scale = u32::try_from(frac_part.len()).ok()?;
        if scale > MAX_SCALE {
            return None;
        }
        let mantissa = format!("{int_part}{frac_part}").parse::<u64>().ok()?;
        Some(Self { mantissa, scale })
    }

    fn checked_mul(self, count: u64) -> Option<Self> {
        Some(Self {
            mantissa: self.mantissa.checked_mul(count)?,
            scale: self.scale,
        })
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let scale = self.scale as usize;
        let digits = format!("{:0>width$}", self.mantissa, width = scale + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            f.write_str(int_part)
        } else {
            write!(f, "{int_part}.{frac_part}")
        }
    }
}

/// A parsed `count x magnitude unit` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuantityExpression {
    count: u64,
    magnitude: Magnitude,
    unit: Unit,
}

impl QuantityExpression {
    fn total(&self) -> Option<Magnitude> {
        self.magnitude.checked_mul(self.count)
    }
}

/// Result of the first rule that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Pack(QuantityExpression, Magnitude),
    Single(Magnitude, Unit),
    Count(u64),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pack(expr, total) => write!(
                f,
                "{} x {} {} ({} {})",
                expr.count, expr.magnitude, expr.unit, total, expr.unit
            ),
            Self::Single(magnitude, unit) => write!(f, "{magnitude} {unit}"),
            Self::Count(n) => write!(f, "{n} ct"),
        }
    }
}

struct Patterns {
    multipack: Regex,
    pack_count: Regex,
    single: Regex,
    count_only: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            multipack: Regex::new(&format!(
                r"(?i){NUMBER_START}(?P<count>[0-9]+) ?x ?{MAGNITUDE_PATTERN} ?{UNIT_PATTERN}"
            ))?,
            pack_count: Regex::new(&format!(
                r"(?i){NUMBER_START}(?:pack of (?P<count_of>[0-9]+)|(?P<count_pack>[0-9]+)[ -]?packs?)\b{PACK_SEPARATOR}{MAGNITUDE_PATTERN} ?{UNIT_PATTERN}"
            ))?,
            single: Regex::new(&format!(
                r"(?i){NUMBER_START}{MAGNITUDE_PATTERN} ?{UNIT_PATTERN}"
            ))?,
            count_only: Regex::new(&format!(
                r"(?i){NUMBER_START}(?P<count>[0-9]+)[ -]?(?:ct|count)\b"
            ))?,
        })
    }
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| match Patterns::compile() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::error!(error = %e, "quantity patterns failed to compile");
                None
            }
        })
        .as_ref()
}

/// Extract a canonical quantity from a product title or tag.
///
/// Returns `None` when `text` is absent or no rule matches.
///
/// # Examples
///
/// ```
/// use shop_search::normalize::normalize;
///
/// assert_eq!(normalize(Some("12 x 12 oz")).as_deref(), Some("12 x 12 oz (144 oz)"));
/// assert_eq!(normalize(Some("Pack of 2 1 lb")).as_deref(), Some("2 x 1 lb (2 lb)"));
/// assert_eq!(normalize(Some("16oz")).as_deref(), Some("16 oz"));
/// assert_eq!(normalize(Some("12 ct")).as_deref(), Some("12 ct"));
/// assert_eq!(normalize(Some("Gift card")), None);
/// ```
pub fn normalize(text: Option<&str>) -> Option<String> {
    let text = text?;
    let patterns = patterns()?;
    let cleaned = clean(text);
    if cleaned.is_empty() {
        return None;
    }

    let quantity = match_multipack(patterns, &cleaned)
        .or_else(|| match_pack_count(patterns, &cleaned))
        .or_else(|| match_single(patterns, &cleaned))
        .or_else(|| match_count_only(patterns, &cleaned))?;
    Some(quantity.to_string())
}

/// Try [`normalize`] on each candidate in order and return the first hit.
///
/// Used when a source provides a title plus separate descriptive tags.
pub fn normalize_from_any<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates.into_iter().find_map(normalize)
}

/// Rewrite multiplication glyphs to `x` and collapse whitespace runs.
fn clean(text: &str) -> String {
    text.replace(['×', '✕'], "x")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn match_multipack(patterns: &Patterns, text: &str) -> Option<Quantity> {
    let caps = patterns.multipack.captures(text)?;
    pack_from_captures(&caps, "count")
}

fn match_pack_count(patterns: &Patterns, text: &str) -> Option<Quantity> {
    let caps = patterns.pack_count.captures(text)?;
    let count_group = if caps.name("count_of").is_some() {
        "count_of"
    } else {
        "count_pack"
    };
    pack_from_captures(&caps, count_group)
}

fn match_single(patterns: &Patterns, text: &str) -> Option<Quantity> {
    let caps = patterns.single.captures(text)?;
    let magnitude = Magnitude::parse(caps.name("mag")?.as_str())?;
    let unit = Unit::from_token(caps.name("unit")?.as_str())?;
    Some(Quantity::Single(magnitude, unit))
}

fn match_count_only(patterns: &Patterns, text: &str) -> Option<Quantity> {
    let caps = patterns.count_only.captures(text)?;
    let n = caps.name("count")?.as_str().parse::<u64>().ok()?;
    Some(Quantity::Count(n))
}

fn pack_from_captures(caps: &Captures<'_>, count_group: &str) -> Option<Quantity> {
    let count = caps.name(count_group)?.as_str().parse::<u64>().ok()?;
    if count == 0 {
        return None;
    }
    let expr = QuantityExpression {
        count,
        magnitude: Magnitude::parse(caps.name("mag")?.as_str())?,
        unit: Unit::from_token(caps.name("unit")?.as_str())?,
    };
    let total = expr.total()?;
    Some(Quantity::Pack(expr, total))
}
