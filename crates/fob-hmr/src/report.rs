//! Human-facing notifications for hot update decisions.
//!
//! These only describe a decision that was already made.

use owo_colors::OwoColorize;
use tracing::info;

use crate::payload::Update;

pub(crate) fn restarting(file: &str) {
    info!("{}", format!("{file} changed, restarting server...").green());
}

pub(crate) fn page_reload(file: &str) {
    info!("{} {}", "page reload".green(), file.dimmed());
}

pub(crate) fn hmr_updates(updates: &[Update]) {
    let lines = updates
        .iter()
        .map(|update| format!("{} {}", "hmr update".green(), update.path.dimmed()))
        .collect::<Vec<_>>();
    info!("{}", lines.join("\n"));
}
