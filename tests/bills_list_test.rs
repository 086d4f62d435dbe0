use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use billclerk::bills::BillList;
use billclerk::model::{NewBillInput, RawBill, Route};
use billclerk::navigation::Navigator;
use billclerk::store::model::CreatedBill;
use billclerk::store::{BillStore, NewUpload};

#[derive(Default)]
struct RecordingStore {
    list_responses: AsyncMutex<VecDeque<Result<Vec<RawBill>>>>,
    list_calls: AsyncMutex<usize>,
}

impl RecordingStore {
    fn with_list_responses(responses: Vec<Result<Vec<RawBill>>>) -> Self {
        Self {
            list_responses: AsyncMutex::new(VecDeque::from(responses)),
            ..Default::default()
        }
    }

    async fn list_calls(&self) -> usize {
        *self.list_calls.lock().await
    }
}

#[async_trait]
impl BillStore for RecordingStore {
    async fn list_bills(&self) -> Result<Vec<RawBill>> {
        *self.list_calls.lock().await += 1;
        let mut guard = self.list_responses.lock().await;
        guard.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_bill(&self, _upload: NewUpload) -> Result<CreatedBill> {
        Err(anyhow!("not used in listing tests"))
    }

    async fn update_bill(&self, _selector: &str, _data: &NewBillInput) -> Result<Value> {
        Err(anyhow!("not used in listing tests"))
    }
}

#[derive(Clone, Default)]
struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

fn raw_bill(id: &str, date: &str, amount: f64, name: &str, status: &str) -> RawBill {
    RawBill {
        id: id.into(),
        date: date.into(),
        amount,
        name: name.into(),
        status: status.into(),
        file_url: None,
        file_name: None,
    }
}

#[tokio::test]
async fn bills_come_back_newest_first_with_display_values() {
    let store = Arc::new(RecordingStore::with_list_responses(vec![Ok(vec![
        raw_bill("1", "2022-04-22", 100.0, "Bill 1", "pending"),
        raw_bill("2", "2022-04-23", 200.0, "Bill 2", "accepted"),
        raw_bill("3", "2022-04-21", 300.0, "Bill 3", "refused"),
    ])]));
    let list = BillList::new(
        Some(store.clone() as Arc<dyn BillStore>),
        Arc::new(RecordingNavigator::default()),
    );

    let bills = list.get_bills().await.unwrap();

    assert_eq!(store.list_calls().await, 1);
    let ids: Vec<&str> = bills.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1", "3"]);
    let statuses: Vec<&str> = bills.iter().map(|b| b.status.as_str()).collect();
    assert_eq!(statuses, vec!["Accepté", "En attente", "Refused"]);
    let dates: Vec<&str> = bills.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(dates, vec!["23 Avr. 22", "22 Avr. 22", "21 Avr. 22"]);
    for bill in &bills {
        assert!(!bill.formatted_date.is_empty());
    }
}

#[tokio::test]
async fn equal_dates_keep_store_order() {
    let store = Arc::new(RecordingStore::with_list_responses(vec![Ok(vec![
        raw_bill("a", "2022-04-22", 1.0, "first", "pending"),
        raw_bill("b", "2022-04-23", 2.0, "newest", "pending"),
        raw_bill("c", "2022-04-22", 3.0, "second", "pending"),
        raw_bill("d", "2022-04-22", 4.0, "third", "pending"),
    ])]));
    let list = BillList::new(
        Some(store as Arc<dyn BillStore>),
        Arc::new(RecordingNavigator::default()),
    );

    let bills = list.get_bills().await.unwrap();

    let ids: Vec<&str> = bills.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c", "d"]);
}

#[tokio::test]
async fn corrupt_record_is_kept_and_sorts_last() {
    let store = Arc::new(RecordingStore::with_list_responses(vec![Ok(vec![
        raw_bill("bad", "04/22/2022", 50.0, "corrupt date", "odd-status"),
        raw_bill("old", "2020-01-01", 60.0, "oldest valid", "pending"),
        raw_bill("new", "2022-04-23", 70.0, "newest", "accepted"),
    ])]));
    let list = BillList::new(
        Some(store as Arc<dyn BillStore>),
        Arc::new(RecordingNavigator::default()),
    );

    let bills = list.get_bills().await.unwrap();

    assert_eq!(bills.len(), 3);
    let ids: Vec<&str> = bills.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old", "bad"]);
    // the corrupt record renders its raw values instead of being dropped
    assert_eq!(bills[2].date, "04/22/2022");
    assert_eq!(bills[2].formatted_date, "04/22/2022");
    assert_eq!(bills[2].status, "odd-status");
}

#[tokio::test]
async fn missing_store_lists_nothing() {
    let list = BillList::new(None, Arc::new(RecordingNavigator::default()));
    let bills = list.get_bills().await.unwrap();
    assert!(bills.is_empty());
}

#[tokio::test]
async fn fetch_failure_propagates_to_the_caller() {
    let store = Arc::new(RecordingStore::with_list_responses(vec![Err(anyhow!(
        "store unavailable"
    ))]));
    let list = BillList::new(
        Some(store as Arc<dyn BillStore>),
        Arc::new(RecordingNavigator::default()),
    );

    let err = list.get_bills().await.unwrap_err();
    assert!(err.to_string().contains("store unavailable"));
}

#[tokio::test]
async fn new_bill_action_navigates() {
    let navigator = RecordingNavigator::default();
    let list = BillList::new(None, Arc::new(navigator.clone()));

    list.open_new_bill();

    assert_eq!(navigator.routes(), vec![Route::NewBill]);
}
