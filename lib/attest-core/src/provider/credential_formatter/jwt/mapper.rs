use ct_codecs::{Base64UrlSafeNoPadding, Encoder};

use super::super::error::FormatterError;

pub(super) fn string_to_b64url_string(string: &str) -> Result<String, FormatterError> {
    Base64UrlSafeNoPadding::encode_to_string(string)
        .map_err(|e| FormatterError::CouldNotFormat(format!("base64 encoding error: {e}")))
}

pub(super) fn bin_to_b64url_string(binary: &[u8]) -> Result<String, FormatterError> {
    Base64UrlSafeNoPadding::encode_to_string(binary)
        .map_err(|e| FormatterError::CouldNotFormat(format!("base64 encoding error: {e}")))
}

pub mod unix_timestamp_option {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(datetime) => serializer.serialize_i64(datetime.unix_timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        let timestamp: Option<i64> = Option::deserialize(deserializer)?;
        timestamp
            .map(|value| OffsetDateTime::from_unix_timestamp(value).map_err(D::Error::custom))
            .transpose()
    }
}
