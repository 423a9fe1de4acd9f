//! Page events and the command reader that produces them.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::pwa::InstallOutcome;

const EVENT_CHANNEL_CAPACITY: usize = 32;

pub const HELP: &str = "\
Commands:
  generate <url>             render the flyer for <url>
  download                   save the flyer as PNG
  copy                       copy the flyer to the clipboard
  check [version]            look for a new version (default: re-read settings)
  update                     switch to the new version and reload
  dismiss                    hide the update notification
  install [accept|dismiss]   answer the install prompt
  help                       show this help
  quit                       leave";

/// Everything the page session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Load,
    Generate(String),
    Download,
    Copy,
    /// Register the given cache version, or the one configured now.
    CheckUpdate(Option<u32>),
    Update,
    DismissUpdate,
    Install(InstallOutcome),
    Help,
    Quit,
}

/// Parse one input line. Blank lines are `None`.
pub fn parse_command(line: &str) -> Option<Result<PageEvent, String>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (cmd, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));

    let event = match cmd.to_ascii_lowercase().as_str() {
        // Empty URLs still go through; the session alerts on them.
        "generate" | "g" => Ok(PageEvent::Generate(rest.to_string())),
        "download" | "d" => Ok(PageEvent::Download),
        "copy" | "c" => Ok(PageEvent::Copy),
        "check" => {
            if rest.is_empty() {
                Ok(PageEvent::CheckUpdate(None))
            } else {
                rest.parse()
                    .map(|v| PageEvent::CheckUpdate(Some(v)))
                    .map_err(|_| format!("invalid version: {rest}"))
            }
        }
        "update" => Ok(PageEvent::Update),
        "dismiss" | "later" => Ok(PageEvent::DismissUpdate),
        "install" => rest.parse().map(PageEvent::Install),
        "help" | "?" => Ok(PageEvent::Help),
        "quit" | "exit" | "q" => Ok(PageEvent::Quit),
        other => Err(format!("unknown command: {other}")),
    };
    Some(event)
}

pub fn channel() -> (mpsc::Sender<PageEvent>, mpsc::Receiver<PageEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

/// Read commands from stdin until EOF, forwarding them as events.
///
/// Unparseable lines are reported and skipped. EOF sends [`PageEvent::Quit`].
pub async fn read_commands(tx: mpsc::Sender<PageEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Some(Ok(event)) => {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
                Some(Err(e)) => {
                    println!("{e}\n{HELP}");
                }
                None => {}
            },
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read command: {e}");
                break;
            }
        }
    }
    let _ = tx.send(PageEvent::Quit).await;
    tracing::debug!("Command reader stopped");
}
