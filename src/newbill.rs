//! New-bill workflow: receipt selection and upload, then the form submit
//! that commits the record and navigates back to the list.
//!
//! The split is deliberate: the receipt uploads eagerly when selected, and
//! the authoritative record (amounts, dates, status) is only committed on
//! explicit submit. `UploadDraft` carries the upload identifiers across
//! that gap.
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, instrument, warn};

use crate::model::{BillForm, NewBillInput, Route, UploadDraft};
use crate::navigation::Navigator;
use crate::session::Session;
use crate::store::{BillStore, NewUpload};

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const DEFAULT_PCT: i64 = 20;

/// True when the filename ends in an allowed receipt-image extension.
/// Empty or missing extensions are rejected.
pub fn is_allowed_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => {
            ALLOWED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a))
        }
        _ => false,
    }
}

/// Snapshot of the view's file input at selection time. `value` is the
/// control's raw value (browsers prefix a fake path); the workflow clears
/// it to reset the control when the selection is rejected. A successful
/// upload consumes `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    pub value: String,
    pub content: Vec<u8>,
}

pub struct NewBill {
    store: Option<Arc<dyn BillStore>>,
    session: Arc<dyn Session>,
    navigator: Arc<dyn Navigator>,
    draft: UploadDraft,
}

impl NewBill {
    pub fn new(
        store: Option<Arc<dyn BillStore>>,
        session: Arc<dyn Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
            draft: UploadDraft::default(),
        }
    }

    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    /// The view calls this when the user picks a receipt file. An invalid
    /// extension resets the control and skips the store entirely; a valid
    /// one uploads eagerly and stashes the returned identifiers. An upload
    /// rejection is logged and leaves the draft empty, so a later submit
    /// sends an incomplete record instead of blocking the user.
    #[instrument(skip_all)]
    pub async fn handle_file_selected(&mut self, selection: &mut FileSelection) -> Result<()> {
        let file_name = selected_file_name(&selection.value).to_string();
        if !is_allowed_file(&file_name) {
            warn!(file = %file_name, "rejected receipt selection; resetting input");
            selection.value.clear();
            return Ok(());
        }

        let store = match &self.store {
            Some(store) => Arc::clone(store),
            None => return Ok(()),
        };
        let email = self.user_email()?;
        let upload = NewUpload {
            email,
            file_name: file_name.clone(),
            content: std::mem::take(&mut selection.content),
        };
        match store.create_bill(upload).await {
            Ok(created) => {
                self.draft = UploadDraft {
                    file_url: Some(created.file_url),
                    file_key: Some(created.key),
                    file_name: Some(file_name),
                };
            }
            Err(err) => error!(?err, "failed to upload receipt"),
        }
        Ok(())
    }

    /// The view calls this on form submit. Merges the form values with the
    /// upload draft, commits the record, and navigates to the bill list on
    /// success. A rejected update is logged and withholds navigation; the
    /// user stays on the form and can simply submit again.
    #[instrument(skip_all)]
    pub async fn handle_submit(&mut self, form: &BillForm) -> Result<()> {
        let store = match &self.store {
            Some(store) => Arc::clone(store),
            None => return Ok(()),
        };
        let bill = self.build_bill(form)?;
        let selector = self.draft.file_key.clone().unwrap_or_default();
        match store.update_bill(&selector, &bill).await {
            Ok(_) => self.navigator.navigate(Route::Bills),
            Err(err) => error!(?err, "failed to submit bill; staying on form"),
        }
        Ok(())
    }

    fn build_bill(&self, form: &BillForm) -> Result<NewBillInput> {
        Ok(NewBillInput {
            email: self.user_email()?,
            expense_type: form.expense_type.clone(),
            name: form.name.clone(),
            amount: form.amount.trim().parse().ok(),
            date: form.date.clone(),
            vat: form.vat.clone(),
            pct: form.pct.trim().parse().unwrap_or(DEFAULT_PCT),
            commentary: form.commentary.clone(),
            file_url: self.draft.file_url.clone(),
            file_name: self.draft.file_name.clone(),
            status: "pending".to_string(),
        })
    }

    fn user_email(&self) -> Result<String> {
        Ok(self
            .session
            .current_user()?
            .map(|user| user.email)
            .unwrap_or_default())
    }
}

// Browsers report file inputs as `C:\fakepath\name.ext`; keep the last
// backslash segment.
fn selected_file_name(value: &str) -> &str {
    value.rsplit('\\').next().unwrap_or(value)
}
