use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Probe progress bar; position is fed from the prober's completion
/// callback.
pub fn probe_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.blue} [{bar:40.green}] {pos}/{len} probed ({eta} left)",
    )
    .unwrap()
    .progress_chars("=>-");

    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
