//! Amount extraction from loosely-shaped records.

use serde_json::{Map, Value};

use crate::models::RawRecord;

/// A place in a raw record where an amount may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// A top-level key.
    Field(&'static str),
    /// A key inside a top-level object.
    Nested {
        /// Top-level key holding the object.
        parent: &'static str,
        /// Key inside it.
        key: &'static str,
    },
    /// The `value` of the `factors[]` entry named "amount".
    Factors,
}

/// Candidate locations, highest priority first.
pub const AMOUNT_SOURCES: [AmountSource; 12] = [
    AmountSource::Field("amount"),
    AmountSource::Field("amt"),
    AmountSource::Field("amount_usd"),
    AmountSource::Field("amount_cents"),
    AmountSource::Field("value"),
    AmountSource::Field("price"),
    AmountSource::Field("amount_value"),
    AmountSource::Nested {
        parent: "data",
        key: "amount",
    },
    AmountSource::Nested {
        parent: "data",
        key: "value",
    },
    AmountSource::Field("transaction_amount"),
    AmountSource::Nested {
        parent: "transaction",
        key: "amount",
    },
    AmountSource::Factors,
];

/// Keys of an amount-bearing object, highest priority first.
const OBJECT_AMOUNT_KEYS: [&str; 4] = ["value", "amount", "cents", "price"];

impl AmountSource {
    /// Returns the value stored at this location, if any.
    #[must_use]
    pub fn locate(self, record: &RawRecord) -> Option<&Value> {
        match self {
            Self::Field(key) => record.get(key),
            Self::Nested { parent, key } => record
                .get(parent)
                .and_then(Value::as_object)
                .and_then(|inner| inner.get(key)),
            Self::Factors => record
                .get("factors")
                .and_then(Value::as_array)
                .and_then(|factors| factors.iter().find(|factor| is_amount_factor(factor)))
                .and_then(|factor| factor.get("value")),
        }
    }
}

/// Whether a factor entry describes the transaction amount.
fn is_amount_factor(factor: &Value) -> bool {
    ["feature", "name"].iter().any(|key| {
        factor
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|label| label.to_lowercase() == "amount")
    })
}

/// A JSON value decoded into one of the shapes an amount can take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountValue<'rec> {
    /// A JSON number.
    Number(f64),
    /// Free text such as `"$1,234.56"` or `"1234,56"`.
    Text(&'rec str),
    /// An object carrying the amount under `value`, `amount`, `cents` or
    /// `price`.
    Object(&'rec Map<String, Value>),
}

impl<'rec> AmountValue<'rec> {
    /// Picks the matching variant. Null, booleans and arrays carry no
    /// amount.
    #[must_use]
    pub fn decode(value: &'rec Value) -> Option<Self> {
        value
            .as_f64()
            .map(Self::Number)
            .or_else(|| value.as_str().map(Self::Text))
            .or_else(|| value.as_object().map(Self::Object))
    }

    /// Resolves the variant to a finite number.
    #[must_use]
    pub fn resolve(self) -> Option<f64> {
        match self {
            Self::Number(number) => number.is_finite().then_some(number),
            Self::Text(text) => parse_amount_text(text),
            Self::Object(map) => OBJECT_AMOUNT_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(parse_amount),
        }
    }
}

/// Parses any JSON value into a finite amount.
#[inline]
#[must_use]
pub fn parse_amount(value: &Value) -> Option<f64> {
    AmountValue::decode(value).and_then(AmountValue::resolve)
}

/// Parses amount text with thousands/decimal separator disambiguation.
///
/// With both `,` and `.` present, commas group thousands. With only `,`,
/// the comma is the decimal point and any dots group thousands. Currency
/// symbols, percent signs and spaces are dropped before parsing.
///
/// Text with nothing numeric left after cleaning, such as `"N/A"` or a
/// blank string, has no amount rather than an amount of zero, so
/// [`extract_amount`] moves on to the next candidate.
#[must_use]
pub fn parse_amount_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let has_comma = trimmed.contains(',');
    let separated = if has_comma && trimmed.contains('.') {
        trimmed.replace(',', "")
    } else if has_comma {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_owned()
    };
    let cleaned: String = separated
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Returns the first usable amount of `record`, trying [`AMOUNT_SOURCES`]
/// in order.
#[must_use]
pub fn extract_amount(record: &RawRecord) -> Option<f64> {
    AMOUNT_SOURCES
        .iter()
        .filter_map(|source| source.locate(record))
        .find_map(parse_amount)
}
