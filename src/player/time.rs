/// Format a position in seconds as `MM:SS`.
///
/// Non-finite or negative input is shown as `00:00`. Minutes are not capped,
/// so an hour renders as `60:00`.
pub fn format_time(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
