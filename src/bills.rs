//! Bill listing: fetch raw records from the store, normalize dates and
//! status labels, and order newest-first. A single corrupt record must not
//! take the whole listing down.
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::format;
use crate::model::{DisplayBill, RawBill, Route};
use crate::navigation::Navigator;
use crate::store::BillStore;

pub struct BillList {
    store: Option<Arc<dyn BillStore>>,
    navigator: Arc<dyn Navigator>,
}

impl BillList {
    pub fn new(store: Option<Arc<dyn BillStore>>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// The list page's "new bill" action lands here.
    pub fn open_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    /// Fetch and normalize the user's bills, newest first. Without a
    /// configured store the listing is simply empty. A rejected fetch
    /// propagates to the caller; per-record formatting trouble does not.
    #[instrument(skip_all)]
    pub async fn get_bills(&self) -> Result<Vec<DisplayBill>> {
        let store = match &self.store {
            Some(store) => store,
            None => return Ok(Vec::new()),
        };

        let raw = store.list_bills().await?;
        let mut entries: Vec<(Option<NaiveDate>, DisplayBill)> =
            raw.into_iter().map(to_display).collect();
        // Stable descending sort: ties keep store order, unparsable dates
        // (None) sink to the bottom.
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries.into_iter().map(|(_, bill)| bill).collect())
    }
}

fn to_display(raw: RawBill) -> (Option<NaiveDate>, DisplayBill) {
    let date = format::format_date(&raw.date);
    if date.sort_key.is_none() {
        warn!(bill = ?raw, "bill has an unparsable date; rendering raw value");
    }
    let bill = DisplayBill {
        id: raw.id,
        date: date.display,
        formatted_date: format::numeric_date(&raw.date),
        amount: raw.amount,
        name: raw.name,
        status: format::status_label(&raw.status).to_string(),
        file_url: raw.file_url,
        file_name: raw.file_name,
    };
    (date.sort_key, bill)
}
