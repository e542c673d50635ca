/// Render whole seconds as `M:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `format_time` for a fractional duration, truncating to whole seconds
pub fn format_duration_secs(duration_secs: f64) -> String {
    format_time(duration_secs.max(0.0) as u64)
}
