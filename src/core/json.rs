use crate::core::errors::Result;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

pub fn parse(json: &str) -> Result<JsonIpRanges> {
    Ok(serde_json::from_str(json)?)
}

/*-------------------------------------------------------------------------------------------------
  JSON Data Structures
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  JSON IP Ranges
--------------------------------------------------------------------------------------*/

/// The Salesforce IP ranges document. Only `prefixes` is used by the check; the
/// publication date is kept for logging.
///
/// Decoding is lenient below the top level: a `createDate` that is not a string is
/// ignored, and a `prefixes` entry that does not decode becomes an empty entry that no
/// filter matches. Other fields of the document are ignored.
#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
pub struct JsonIpRanges {
    #[serde(rename = "createDate", default, deserialize_with = "lenient")]
    pub create_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_entries")]
    pub prefixes: Vec<JsonIpPrefix>,
}

/*--------------------------------------------------------------------------------------
  JSON IP Prefix
--------------------------------------------------------------------------------------*/

/// One entry of the `prefixes` list. Entries without a `provider` or `region` never match
/// a filter.
#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
pub struct JsonIpPrefix {
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub ip_prefix: Vec<String>,
}

/*-------------------------------------------------------------------------------------------------
  Lenient Deserializers
-------------------------------------------------------------------------------------------------*/

/// Decode a value, falling back to the default when it has an unexpected shape.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value)
        .inspect_err(|error| debug!("Ignoring unexpected value: {error}"))
        .unwrap_or_default())
}

/// Decode a list of entries one at a time; the list itself must still be an array.
fn lenient_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<JsonIpPrefix>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry)
                .inspect_err(|error| debug!("Ignoring unreadable prefixes entry: {error}"))
                .unwrap_or_default()
        })
        .collect())
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
