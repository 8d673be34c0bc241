//! Field mapping between [`ClientMessage`] and the remote record shape.
//!
//! | client       | remote                   |
//! |--------------|--------------------------|
//! | `id`         | `FieldData.Id`           |
//! | `title`      | `FieldData.Summary`      |
//! | `text`       | `FieldData.Message`      |
//! | `receivedAt` | `FieldData.ReceivedAt`   |

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{ClientMessage, RemoteEnvelope, RemoteFields, RemoteRecord};

/// Remote record to client message. A record without `FieldData` yields an all-`None` message.
pub fn to_client(record: &RemoteRecord) -> ClientMessage {
    match &record.field_data {
        Some(f) => ClientMessage {
            id: f.id.clone(),
            title: f.summary.clone(),
            text: f.message.clone(),
            received_at: f.received_at,
        },
        None => ClientMessage::default(),
    }
}

pub fn to_remote(message: &ClientMessage) -> RemoteRecord {
    RemoteRecord {
        field_data: Some(RemoteFields {
            id: message.id.clone(),
            summary: message.title.clone(),
            message: message.text.clone(),
            received_at: message.received_at,
        }),
    }
}

/// Translate every record, preserving order and count.
pub fn envelope_to_client(envelope: &RemoteEnvelope) -> Vec<ClientMessage> {
    envelope.records.iter().map(to_client).collect()
}

pub fn envelope_from_client(messages: &[ClientMessage]) -> RemoteEnvelope {
    RemoteEnvelope {
        records: messages.iter().map(to_remote).collect(),
    }
}

/// Copies of `messages` stamped for submission: each gets a fresh UUID v4 `id` and
/// `received_at = now`. Caller-supplied ids and timestamps are discarded.
pub fn enrich_outbound(messages: &[ClientMessage], now: DateTime<Utc>) -> Vec<ClientMessage> {
    messages
        .iter()
        .map(|m| ClientMessage {
            id: Some(Uuid::new_v4().to_string()),
            received_at: Some(now),
            ..m.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn full_record(id: &str) -> RemoteRecord {
        RemoteRecord {
            field_data: Some(RemoteFields {
                id: Some(id.to_string()),
                summary: Some(format!("summary {}", id)),
                message: Some(format!("message {}", id)),
                received_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            }),
        }
    }

    #[test]
    fn remote_to_client_to_remote_round_trips() {
        let record = full_record("1");
        assert_eq!(to_remote(&to_client(&record)), record);

        let sparse = RemoteRecord {
            field_data: Some(RemoteFields {
                summary: Some("only a summary".to_string()),
                ..Default::default()
            }),
        };
        assert_eq!(to_remote(&to_client(&sparse)), sparse);
    }

    #[test]
    fn missing_field_data_maps_to_all_none() {
        assert_eq!(to_client(&RemoteRecord::default()), ClientMessage::default());
    }

    #[test]
    fn field_names_follow_mapping_table() {
        let msg = to_client(&full_record("7"));
        assert_eq!(msg.id.as_deref(), Some("7"));
        assert_eq!(msg.title.as_deref(), Some("summary 7"));
        assert_eq!(msg.text.as_deref(), Some("message 7"));
    }

    #[test]
    fn envelope_translation_preserves_order() {
        let envelope = RemoteEnvelope {
            records: vec![full_record("a"), RemoteRecord::default(), full_record("c")],
        };
        let msgs = envelope_to_client(&envelope);
        let ids: Vec<_> = msgs.iter().map(|m| m.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("a"), None, Some("c")]);
        assert_eq!(envelope_from_client(&msgs).records.len(), 3);
    }

    #[test]
    fn enrich_overwrites_id_and_timestamp_only() {
        let t0 = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let input = vec![ClientMessage {
            id: Some("X".to_string()),
            title: Some("A".to_string()),
            text: None,
            received_at: Some(t0),
        }];

        let out = enrich_outbound(&input, now);

        assert_eq!(out.len(), 1);
        assert_ne!(out[0].id.as_deref(), Some("X"));
        assert!(Uuid::parse_str(out[0].id.as_deref().unwrap()).is_ok());
        assert_eq!(out[0].received_at, Some(now));
        assert_eq!(out[0].title.as_deref(), Some("A"));
        assert_eq!(out[0].text, None);
        // caller's copy untouched
        assert_eq!(input[0].id.as_deref(), Some("X"));
        assert_eq!(input[0].received_at, Some(t0));
    }

    #[test]
    fn enrich_assigns_distinct_ids() {
        let input = vec![ClientMessage::default(); 3];
        let out = enrich_outbound(&input, Utc::now());
        assert_ne!(out[0].id, out[1].id);
        assert_ne!(out[1].id, out[2].id);
    }
}
