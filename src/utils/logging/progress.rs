//! Progress reporting for the row-level pipeline stages, using the
//! indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for a batch progress bar
pub const DEFAULT_BATCH_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches {msg}";

/// Create a progress bar over input batches
///
/// Returns a hidden bar when `visible` is false so callers can tick it
/// unconditionally.
#[must_use]
pub fn create_batch_progress_bar(length: u64, description: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(length);
    if let Ok(style) = ProgressStyle::default_bar().template(DEFAULT_BATCH_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(description.to_string());
    pb
}

/// Finish a progress bar with a completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}
