pub struct StringUtils {}

impl StringUtils {
    /// `"2h 5m"` once past an hour, `"4m 12s"` below it.
    pub fn format_uptime(seconds: u64) -> String {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;

        if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}m {}s", minutes, secs)
        }
    }
}
