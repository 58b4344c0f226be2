/// Live countdown between daily passes
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

/// `HH:MM:SS`; hours are not wrapped at 24
pub fn format_countdown(remaining_secs: u64) -> String {
    let hours = remaining_secs / 3600;
    let minutes = (remaining_secs % 3600) / 60;
    let seconds = remaining_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Redraw one status line every second until `total_secs` have elapsed
pub async fn countdown(total_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    for remaining in (1..=total_secs).rev() {
        interval.tick().await;
        let line = format!("[⏳] Next run in: {} ...", format_countdown(remaining));
        print!("{}\r", line.cyan());
        let _ = std::io::stdout().flush();
    }
    if total_secs > 0 {
        interval.tick().await;
        println!();
    }
}
