/// Timestamped progress line on stderr, so stdout stays free for results.
/// Pass a start time first to also print how long it took from then to now.
/// ```
/// use chrono::Local;
/// use review_scrape::info_time;
///
/// info_time!("fetched {} pages", 3);
/// let time = Local::now();
/// info_time!(time, "crawl of {} done", "https://filmarks.com/animes/1/2");
/// ```
#[macro_export]
macro_rules! info_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {{
        let local_now = ::chrono::Local::now();
        eprintln!("{:<30} : {}", local_now, format!($strfm, $($arg),*));
    }};
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {{
        let local_now = ::chrono::Local::now();
        let run_time = (local_now - $time)
                .num_microseconds()
                .map(|n| n as f64 / 1_000_000.0)
                .unwrap_or(0.0);
        eprintln!(
            "{:<30} : {} ({} sec)",
            local_now,
            format!($strfm, $($arg),*),
            run_time
        );
    }};
}
