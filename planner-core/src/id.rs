//! Record identifiers.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Fresh identifier for a plan or pattern.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Accept string ids as well as the numeric ids older data files carry.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Record {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
    }

    #[test]
    fn ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn numeric_ids_become_strings() {
        let record: Record = serde_json::from_str(r#"{"id": 1718000000000}"#).unwrap();
        assert_eq!(record.id, "1718000000000");

        let record: Record = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(record.id, "abc");
    }
}
