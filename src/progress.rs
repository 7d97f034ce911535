use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

const BAR_TEMPLATE: &str = "{prefix} |{bar:40.green}| {percent:>3}% {msg}";

/// Bar currently drawing on stderr, if any.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// In-place progress bar with a filled/unfilled track and a percentage.
///
/// The bar stays registered until [`finish`] so log lines can clear it first.
pub fn bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█-"),
    );
    pb.set_prefix(prefix.to_string());
    if let Ok(mut active) = ACTIVE.lock() {
        *active = Some(pb.clone());
    }
    pb
}

/// Completes the bar and leaves a blank line under it.
pub fn finish(pb: &ProgressBar) {
    pb.finish_with_message("Complete");
    if let Ok(mut active) = ACTIVE.lock() {
        *active = None;
    }
    if !pb.is_hidden() {
        eprintln!();
    }
}

/// Runs `f` with the active bar hidden, redrawing it afterwards.
pub fn suspend<F: FnOnce() -> R, R>(f: F) -> R {
    let active = ACTIVE.lock().ok().and_then(|guard| guard.clone());
    match active {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}
