//! Install prompt and update notification.

use std::fmt;
use std::str::FromStr;

pub const UPDATE_TITLE: &str = "Update Available";
pub const UPDATE_BODY: &str = "A new version of ZOLL-Linkz is available.";

/// The user's answer to the install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl FromStr for InstallOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "accept" | "accepted" | "yes" | "y" => Ok(Self::Accepted),
            "dismiss" | "dismissed" | "no" | "n" => Ok(Self::Dismissed),
            other => Err(format!("unknown install answer: {other}")),
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Dismissed => f.write_str("dismissed"),
        }
    }
}

/// A deferred install prompt, usable exactly once.
#[derive(Debug, Default)]
pub struct InstallPrompt {
    _private: (),
}

impl InstallPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the prompt and record the answer. Consumes the prompt.
    pub fn prompt(self, choice: InstallOutcome) -> InstallOutcome {
        if choice == InstallOutcome::Accepted {
            tracing::info!("User accepted the install prompt");
            tracing::info!("App was installed successfully");
        } else {
            tracing::info!("User dismissed the install prompt");
        }
        choice
    }
}

/// Text of the update notification with its two actions.
pub fn update_notification() -> String {
    format!("{UPDATE_TITLE}: {UPDATE_BODY} Type `update` to update now or `dismiss` for later.")
}
