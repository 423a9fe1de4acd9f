//! Interactive flyer page in the terminal.
//!
//! Loads the page for `--type`, then reads commands from stdin until
//! `quit`, EOF or Ctrl+C.

use std::sync::Arc;

use clap::Parser;

use linkz_lib::cli::Cli;
use linkz_lib::clipboard::open_clipboard;
use linkz_lib::events::{self, HELP, PageEvent};
use linkz_lib::network::SiteNetwork;
use linkz_lib::session::{PageSession, run_event_loop};
use linkz_lib::ui::ConsoleUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    linkz_lib::init_tracing();

    let args = Cli::parse();
    let config = linkz_lib::init_foundation(&args)?;

    let network = Arc::new(SiteNetwork::from_config(&config));
    let mut session = PageSession::new(
        config,
        args.page_type(),
        network,
        Box::new(ConsoleUi),
        open_clipboard(),
    );

    let (tx, rx) = events::channel();
    tx.send(PageEvent::Load).await?;
    tokio::spawn(events::read_commands(tx));
    println!("{HELP}");

    tokio::select! {
        _ = run_event_loop(&mut session, rx) => {}
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Shutting down...");
        }
    }
    Ok(())
}
