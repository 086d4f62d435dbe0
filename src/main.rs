use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use billclerk::bills::BillList;
use billclerk::config;
use billclerk::model::BillForm;
use billclerk::navigation::RouteLog;
use billclerk::newbill::{FileSelection, NewBill};
use billclerk::session::FileSession;
use billclerk::store::{BillStore, HttpBillStore};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List submitted bills, newest first
    List,
    /// Upload a receipt and submit a new bill
    Submit {
        /// Receipt image (.jpg, .jpeg or .png)
        #[arg(long)]
        file: PathBuf,
        /// Expense type, e.g. "Transports"
        #[arg(long = "type")]
        expense_type: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: String,
        /// Expense date, yyyy-mm-dd
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        vat: String,
        #[arg(long, default_value = "20")]
        pct: String,
        #[arg(long, default_value = "")]
        commentary: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let store: Arc<dyn BillStore> = Arc::new(HttpBillStore::from_config(&cfg)?);
    let session = Arc::new(FileSession::new(&cfg.app.data_dir));
    let navigator = Arc::new(RouteLog);

    match args.command {
        Command::List => {
            let list = BillList::new(Some(store), navigator);
            let bills = list.get_bills().await?;
            println!("{}", serde_json::to_string_pretty(&bills)?);
        }
        Command::Submit {
            file,
            expense_type,
            name,
            amount,
            date,
            vat,
            pct,
            commentary,
        } => {
            let content = tokio::fs::read(&file).await?;
            let mut workflow = NewBill::new(Some(store), session, navigator);

            // The workflow sees what a form control would carry: the bare
            // file name, not the local path.
            let value = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.to_string_lossy().into_owned());
            let mut selection = FileSelection { value, content };
            workflow.handle_file_selected(&mut selection).await?;
            if selection.value.is_empty() {
                warn!(file = %file.display(), "receipt type not accepted; submitting without it");
            }

            let form = BillForm {
                expense_type,
                name,
                amount,
                date,
                vat,
                pct,
                commentary,
            };
            workflow.handle_submit(&form).await?;
        }
    }

    Ok(())
}
