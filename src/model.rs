use serde::{Deserialize, Serialize};

/// Routes understood by the navigation collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Route {
    Bills,
    NewBill,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
        }
    }
}

/// A bill exactly as the remote store returns it, before any formatting.
/// `status` stays an open string so server-side codes this client does not
/// know yet still round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawBill {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A bill after date and status formatting, ready for rendering.
/// `date` carries the localized display form; `formatted_date` is a second
/// rendering that is produced even when the primary formatter cannot parse
/// the stored date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBill {
    pub id: String,
    pub date: String,
    pub formatted_date: String,
    pub amount: f64,
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Identifiers returned by a receipt upload, held until the form is
/// submitted. Empty until the first successful upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub file_url: Option<String>,
    pub file_key: Option<String>,
    pub file_name: Option<String>,
}

/// Raw field values as the external form supplies them. Parsing into
/// numbers happens at submit time, not here.
#[derive(Debug, Clone, Default)]
pub struct BillForm {
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// The record sent to the remote store on form submit. `amount` is `None`
/// when the form value does not parse (serialized as null), `pct` falls
/// back to 20.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBillInput {
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: Option<i64>,
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: String,
}
