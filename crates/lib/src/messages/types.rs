//! Client-facing and remote wire shapes for messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Message as seen by callers of the relay and the gateway (camelCase JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Overwritten by the relay on submit; whatever the caller sends is discarded.
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub received_at: Option<DateTime<Utc>>,
}

/// Body exchanged with the remote messages API in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEnvelope {
    /// A missing or `null` list decodes as empty; `null` entries decode as empty records.
    #[serde(rename = "Records", default, deserialize_with = "nullable_records")]
    pub records: Vec<RemoteRecord>,
}

/// One remote record; the payload lives under `FieldData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(rename = "FieldData", default, skip_serializing_if = "Option::is_none")]
    pub field_data: Option<RemoteFields>,
}

/// Remote field set. `None` fields are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize"
    )]
    pub received_at: Option<DateTime<Utc>>,
}

fn nullable_records<'de, D>(deserializer: D) -> Result<Vec<RemoteRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<RemoteRecord>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Lenient timestamp decoding: RFC 3339 with any offset, or a zone-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC. Values are held and re-encoded in UTC, so the
/// instant survives a round trip but the original offset text does not.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub fn parse(s: &str) -> Result<DateTime<Utc>, String> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(|_| format!("invalid timestamp: {:?}", s))
    }
}
