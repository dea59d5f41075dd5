//! Human-readable durations for logs and CLI output.

/// Render `secs` using its two largest non-zero units, e.g. `30d`, `1h 5m`, `42s`.
pub fn format_duration(secs: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];
    if secs == 0 {
        return "0s".to_string();
    }
    let mut rest = secs;
    let mut parts = Vec::new();
    for (size, suffix) in UNITS {
        if rest >= size {
            parts.push(format!("{}{suffix}", rest / size));
            rest %= size;
        }
        if parts.len() == 2 {
            break;
        }
    }
    parts.join(" ")
}
