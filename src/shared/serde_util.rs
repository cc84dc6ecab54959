//! Custom serde helpers for gateway wire formats.

/// Large integers carried as JSON decimal strings (or plain numbers).
///
/// Clients send anti-replay tokens and block limits that overflow `u64`, so
/// they travel as strings such as `"1234567890123456789012345"`.
pub mod dec_u256 {
    use primitive_types::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => U256::from_dec_str(s.trim())
                .map_err(|_| serde::de::Error::custom(format!("Invalid integer: {}", s))),
            Raw::Num(n) => Ok(U256::from(n)),
        }
    }

    /// `Option<U256>` variant; absent or `null` decode to `None`.
    pub mod option {
        use primitive_types::U256;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
        where
            D: Deserializer<'de>,
        {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] U256);

            Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
        }
    }
}

/// Byte vectors carried as standard base64 strings.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD
            .decode(s.trim())
            .map_err(|e| serde::de::Error::custom(format!("Invalid base64: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use primitive_types::U256;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Holder {
        #[serde(with = "super::dec_u256")]
        value: U256,
        #[serde(default, with = "super::dec_u256::option")]
        maybe: Option<U256>,
        #[serde(with = "super::base64_bytes")]
        blob: Vec<u8>,
    }

    #[test]
    fn test_dec_u256_accepts_string_and_number() {
        let h: Holder =
            serde_json::from_str(r#"{"value":"340282366920938463463374607431768211456","blob":"AQI="}"#)
                .unwrap();
        assert_eq!(h.value, U256::from(u128::MAX) + U256::one());
        assert_eq!(h.maybe, None);
        assert_eq!(h.blob, vec![1, 2]);

        let h: Holder =
            serde_json::from_str(r#"{"value":42,"maybe":"7","blob":""}"#).unwrap();
        assert_eq!(h.value, U256::from(42));
        assert_eq!(h.maybe, Some(U256::from(7)));
        assert!(h.blob.is_empty());
    }

    #[test]
    fn test_dec_u256_serializes_as_string() {
        let h = Holder {
            value: U256::from(600),
            maybe: None,
            blob: vec![0xff],
        };
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"value":"600","maybe":null,"blob":"/w=="}"#);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"value":"12ab","blob":""}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"value":"1","blob":"%%%"}"#).is_err());
    }
}
