use crate::foundation::error::{LookbookError, LookbookResult};

/// Structured fields recovered from one image filename stem.
///
/// `name` is raw: underscores are preserved here and normalized to spaces by
/// the grouper. `price_label` is the display string (for example `$33.740`)
/// and is also reused to derive output filenames, so it never goes through a
/// numeric type.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParsedStem {
    /// Product name portion of the stem, underscores intact.
    pub name: String,
    /// Currency-formatted price label.
    pub price_label: String,
    /// Variant ordinal; `1` is the hero photo.
    pub variant: u32,
}

/// Filename prices are written in tenths of a currency unit.
const PRICE_DIVISOR: u64 = 10;

struct RawParse {
    name: String,
    price_units: u64,
    variant: u32,
}

type Matcher = fn(&str) -> Option<RawParse>;

/// Parse a filename stem into `(name, price, variant)`.
///
/// Pattern rules are tried in a fixed authored order and the first match
/// wins; there is no scoring between rules. The order is load-bearing: the
/// generic rule is first, so stems carrying a category prefix such as
/// `Body_...` or `Leggins_...` keep that prefix embedded in the name even
/// though dedicated rules for them exist further down the list. Reordering
/// the list silently changes how such stems split.
pub fn parse_stem(stem: &str) -> LookbookResult<ParsedStem> {
    let matchers: [Matcher; 5] = [
        generic,
        body_prefixed,
        leggins_prefixed,
        name_with_code,
        name_with_description,
    ];

    for matcher in matchers {
        if let Some(raw) = matcher(stem) {
            return Ok(raw.into_parsed());
        }
    }

    fallback_split(stem)
        .map(RawParse::into_parsed)
        .ok_or_else(|| LookbookError::parse(format!("unrecognized filename stem '{stem}'")))
}

impl RawParse {
    fn into_parsed(self) -> ParsedStem {
        ParsedStem {
            name: self.name,
            price_label: format_price(self.price_units),
            variant: self.variant,
        }
    }
}

/// Format a raw filename price as a display label: divide out the tenths
/// convention, group thousands with `.` and prefix `$` (`337400` → `$33.740`).
pub fn format_price(raw_units: u64) -> String {
    let value = raw_units / PRICE_DIVISOR;
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

/// `name-price-number`: the first `-<digits>-<digits>` occurrence splits the
/// stem; anything after the second digit run is ignored.
fn generic(stem: &str) -> Option<RawParse> {
    for (i, b) in stem.bytes().enumerate() {
        if b != b'-' || i == 0 {
            continue;
        }
        if let Some((price_units, variant)) = price_variant_at(stem, i) {
            return Some(RawParse {
                name: stem[..i].to_string(),
                price_units,
                variant,
            });
        }
    }
    None
}

/// `Body_<name>-price-number` with the literal prefix stripped. Shadowed by
/// the generic rule, which always matches such stems first.
fn body_prefixed(stem: &str) -> Option<RawParse> {
    generic(stem.strip_prefix("Body_")?)
}

/// `Leggins_<name>-price-number` with the literal prefix stripped. Shadowed
/// by the generic rule, which always matches such stems first.
fn leggins_prefixed(stem: &str) -> Option<RawParse> {
    generic(stem.strip_prefix("Leggins_")?)
}

/// `<name>_-_<code>-price-number`: name and code join with a space.
fn name_with_code(stem: &str) -> Option<RawParse> {
    let mut search = 0;
    while let Some(off) = stem[search..].find("_-_") {
        let idx = search + off;
        if idx > 0
            && let Some((code, price_units, variant)) = code_price_variant(&stem[idx + 3..])
        {
            return Some(RawParse {
                name: format!("{} {}", &stem[..idx], code),
                price_units,
                variant,
            });
        }
        search = idx + 1;
    }
    None
}

/// `<name>_<description>-price-number`: name and description join with a
/// space. Both parts grow outward-in, shortest first, like the source rules.
fn name_with_description(stem: &str) -> Option<RawParse> {
    for (i, b) in stem.bytes().enumerate() {
        if b != b'_' || i == 0 {
            continue;
        }
        if let Some(rest) = generic(&stem[i + 1..]) {
            return Some(RawParse {
                name: format!("{} {}", &stem[..i], rest.name),
                price_units: rest.price_units,
                variant: rest.variant,
            });
        }
    }
    None
}

/// Last-resort split on `-`: all but the final two tokens form the name, the
/// penultimate token is the price, the final token the variant. Non-integer
/// price or variant means the stem is unparseable.
fn fallback_split(stem: &str) -> Option<RawParse> {
    let parts: Vec<&str> = stem.split('-').collect();
    if parts.len() < 3 {
        return None;
    }
    let price_units: u64 = parts[parts.len() - 2].trim().parse().ok()?;
    let variant: u32 = parts[parts.len() - 1].trim().parse().ok()?;
    Some(RawParse {
        name: parts[..parts.len() - 2].join("-"),
        price_units,
        variant,
    })
}

/// Match `-<digits>-<digits>` starting at the dash at byte `dash`, returning
/// the two numeric groups. Trailing characters after the second run are
/// allowed and ignored.
fn price_variant_at(stem: &str, dash: usize) -> Option<(u64, u32)> {
    let rest = &stem[dash + 1..];
    let (price, rest) = leading_digits(rest)?;
    let rest = rest.strip_prefix('-')?;
    let (variant, _) = leading_digits(rest)?;
    Some((price.parse().ok()?, variant.parse().ok()?))
}

/// Match `<digits>-<digits>-<digits>` at the start of `rest`.
fn code_price_variant(rest: &str) -> Option<(&str, u64, u32)> {
    let (code, rest) = leading_digits(rest)?;
    let rest = rest.strip_prefix('-')?;
    let (price, rest) = leading_digits(rest)?;
    let rest = rest.strip_prefix('-')?;
    let (variant, _) = leading_digits(rest)?;
    Some((code, price.parse().ok()?, variant.parse().ok()?))
}

fn leading_digits(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], &s[end..]))
}
