use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// A spinner with `msg`; hidden when not running the tui.
pub(crate) fn spinner(msg: &str, tui: bool) -> ProgressBar {
    if !tui {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner()
        .with_message(msg.to_string())
        .with_style(
            ProgressStyle::default_spinner()
                .template("{msg} {spinner:.magenta}")
                .expect("failed to set progress bar style"),
        );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Three stacked bars over `len` items: the total processed, those accepted (`kept`), and those
/// passed over (`skipped`). All hidden when not running the tui.
pub(crate) fn multi_progress(
    len: usize,
    kept: &'static str,
    skipped: &'static str,
    tui: bool,
) -> anyhow::Result<(MultiProgress, ProgressBar, ProgressBar, ProgressBar)> {
    if !tui {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let hidden = ProgressBar::hidden;
        return Ok((multi, hidden(), hidden(), hidden()));
    }

    // overall multi progress bar
    let multi = MultiProgress::new();

    let total = multi.add(
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.magenta}\n \
                        {msg:>9.white} |{bar:57.white/grey}| {pos:<2} / {human_len} \
                        ({percent_precise}%) [Time: {elapsed}, Rate: {per_sec}, ETA: {eta}]",
                )?
                .progress_chars("## "),
        ),
    );
    total.set_message("total");
    total.enable_steady_tick(Duration::from_millis(100));

    let success = multi.insert_after(
        &total,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.green} |{bar:57.green}| {pos:<2.green}")?
                .progress_chars("## "),
        ),
    );
    success.set_message(kept);

    let fails = multi.insert_after(
        &success,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.yellow} |{bar:57.yellow}| {pos:<2.yellow}")?
                .progress_chars("## "),
        ),
    );
    fails.set_message(skipped);

    Ok((multi, total, success, fails))
}
