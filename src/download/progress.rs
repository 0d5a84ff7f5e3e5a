//! Per-file progress bars for active downloads.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Creates the byte-progress bar for one transfer.
///
/// When `total` is known the bar shows whole-file completion: its length is
/// the declared content length plus the resume offset, and its starting
/// position is the resume offset, so a resumed download does not appear to
/// restart from zero. Unknown totals get a spinner with a running byte count.
///
/// Returns a hidden bar when no [`MultiProgress`] is supplied, so the fetcher
/// can update progress unconditionally.
pub(crate) fn transfer_bar(
    progress: Option<&MultiProgress>,
    file_name: &str,
    total: Option<u64>,
    start: u64,
) -> ProgressBar {
    let Some(progress) = progress else {
        return ProgressBar::hidden();
    };

    let bar = match total {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template("{msg:30!} {bar:30} {bytes}/{total_bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg:30!} {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };
    bar.set_message(file_name.to_string());
    bar.set_position(start);
    progress.add(bar)
}
