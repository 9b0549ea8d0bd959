//! Money crosses the wire as a JSON number with two decimals of precision.
//! Arithmetic stays in `BigDecimal`; use with `#[serde(with = "money")]`.

use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{de, ser, Deserialize, Deserializer, Serializer};

/// Currency amounts carry two fractional digits.
pub const SCALE: i64 = 2;

/// Parse a wire amount. `f64` display never uses exponent notation, so the
/// shortest round-trip text is an exact decimal.
fn from_f64(raw: f64) -> Option<BigDecimal> {
    if !raw.is_finite() {
        return None;
    }
    BigDecimal::from_str(&raw.to_string())
        .ok()
        .map(|d| d.round(SCALE).with_scale(SCALE))
}

pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let amount = value
        .to_f64()
        .ok_or_else(|| ser::Error::custom(format!("{value} does not fit a JSON number")))?;
    serializer.serialize_f64(amount)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    from_f64(raw).ok_or_else(|| de::Error::custom(format!("{raw} is not a valid amount")))
}

/// Same encoding for optional amounts. Pair with `#[serde(default)]`.
pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<f64>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => from_f64(raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("{raw} is not a valid amount"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, serde::Deserialize)]
    struct Priced {
        #[serde(with = "crate::domain::money")]
        price: BigDecimal,
        #[serde(default, with = "crate::domain::money::option")]
        was: Option<BigDecimal>,
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn amounts_serialize_as_numbers() {
        let value = serde_json::to_value(Priced {
            price: dec("64.70"),
            was: None,
        })
        .unwrap();

        assert!(value["price"].is_number());
        assert_eq!(value["price"].as_f64(), Some(64.7));
        assert!(value["was"].is_null());
    }

    #[test]
    fn numbers_read_back_exactly_at_two_decimals() {
        let priced: Priced = serde_json::from_value(json!({ "price": 24.9, "was": 29.9 })).unwrap();

        assert_eq!(priced.price.to_string(), "24.90");
        assert_eq!(priced.was.map(|w| w.to_string()).as_deref(), Some("29.90"));
    }

    #[test]
    fn missing_optional_amount_is_none() {
        let priced: Priced = serde_json::from_value(json!({ "price": 0 })).unwrap();
        assert_eq!(priced.price.to_string(), "0.00");
        assert_eq!(priced.was, None);
    }

    #[test]
    fn string_amounts_are_rejected() {
        assert!(serde_json::from_value::<Priced>(json!({ "price": "24.90" })).is_err());
    }
}
