//! Serde helpers for an optional chrono timestamp stored as a BSON date.
//!
//! Use with `#[serde(default, with = "optional_datetime")]`. BSON dates hold
//! milliseconds, so anything finer is truncated on the way in.

use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.map(bson::DateTime::from_chrono).serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<bson::DateTime>::deserialize(deserializer)?;
    Ok(value.map(bson::DateTime::to_chrono))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use mongodb::bson::{doc, from_document, to_document, Bson};
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Deadline {
        #[serde(default, with = "super")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn stored_as_bson_date() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 4).unwrap();
        let doc = to_document(&Deadline { at: Some(at) }).unwrap();
        assert_eq!(doc.get_datetime("at").unwrap().to_chrono(), at);

        let read: Deadline = from_document(doc).unwrap();
        assert_eq!(read.at, Some(at));
    }

    #[test]
    fn unset_is_null_or_missing() {
        let doc = to_document(&Deadline { at: None }).unwrap();
        assert_eq!(doc.get("at"), Some(&Bson::Null));
        assert_eq!(from_document::<Deadline>(doc).unwrap().at, None);
        assert_eq!(from_document::<Deadline>(doc! {}).unwrap().at, None);
    }

    #[test]
    fn sub_millisecond_precision_is_dropped() {
        let at = Utc.timestamp_opt(1_767_268_800, 1_234_567).unwrap();
        let doc = to_document(&Deadline { at: Some(at) }).unwrap();
        let read: Deadline = from_document(doc).unwrap();
        assert_eq!(read.at, Some(Utc.timestamp_millis_opt(1_767_268_800_001).unwrap()));
    }
}
