//! Hex string encoding for byte fields in the JSON files.

pub(crate) mod hex_bytes {
    use rewind_types::HexBytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &HexBytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HexBytes, D::Error> {
        let s = String::deserialize(deserializer)?;
        HexBytes::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

pub(crate) mod hex_bytes_opt {
    use rewind_types::HexBytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<HexBytes>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&b.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<HexBytes>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| HexBytes::from_hex(&s))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rewind_types::HexBytes;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(with = "super::hex_bytes")]
        bytes: HexBytes,
        #[serde(default, with = "super::hex_bytes_opt")]
        maybe: Option<HexBytes>,
    }

    #[test]
    fn bytes_are_written_as_upper_hex() {
        let record = Record {
            bytes: HexBytes::new(vec![0xab, 0x01]),
            maybe: Some(HexBytes::new(vec![0xff])),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"bytes":"AB01","maybe":"FF"}"#);
        assert_eq!(serde_json::from_str::<Record>(&json).unwrap(), record);
    }

    #[test]
    fn null_and_missing_optional_bytes_are_none() {
        let record: Record = serde_json::from_str(r#"{"bytes":"","maybe":null}"#).unwrap();
        assert!(record.bytes.is_empty());
        assert_eq!(record.maybe, None);
        let record: Record = serde_json::from_str(r#"{"bytes":"00"}"#).unwrap();
        assert_eq!(record.maybe, None);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(serde_json::from_str::<Record>(r#"{"bytes":"xyz"}"#).is_err());
    }
}
