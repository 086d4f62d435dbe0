use serde::Deserialize;

/// Identifiers the store hands back for an uploaded receipt. `key` is the
/// selector for the follow-up update call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBill {
    pub file_url: String,
    pub key: String,
}
