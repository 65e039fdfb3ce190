//! Custom serde helpers for OMS wire formats.

/// Serializes a numeric field as a JSON string.
///
/// The OMS expects quantities and prices as strings (`"qty":"10"`,
/// `"prc":"101.5"`), and echoes them back the same way.
pub mod as_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.trim().parse::<T>().map_err(serde::de::Error::custom)
    }
}

/// `Option` variant of [`as_string`]; pair with
/// `skip_serializing_if = "Option::is_none"`.
pub mod opt_as_string {
    use serde::Serializer;
    use std::fmt::Display;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};
    use std::str::FromStr;

    #[derive(Serialize, Deserialize)]
    struct Row {
        #[serde(with = "super::as_string")]
        qty: u32,
        #[serde(with = "super::as_string")]
        prc: Decimal,
        #[serde(
            serialize_with = "super::opt_as_string::serialize",
            skip_serializing_if = "Option::is_none",
            default
        )]
        trgprc: Option<Decimal>,
    }

    #[test]
    fn test_numbers_serialize_as_strings() {
        let row = Row {
            qty: 10,
            prc: Decimal::from_str("101.50").unwrap(),
            trgprc: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"qty":"10","prc":"101.50"}"#);
    }

    #[test]
    fn test_strings_deserialize_to_numbers() {
        let row: Row = serde_json::from_str(r#"{"qty":" 25","prc":"3.2"}"#).unwrap();
        assert_eq!(row.qty, 25);
        assert_eq!(row.prc, Decimal::from_str("3.2").unwrap());
        assert!(row.trgprc.is_none());
    }
}
