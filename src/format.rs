//! Human readable renderings shared by the terminal client

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Binary (1024) units, at most two decimals, trailing zeros dropped
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut exponent = 0;
    let mut whole = bytes;
    while whole >= 1024 && exponent < BYTE_UNITS.len() - 1 {
        whole /= 1024;
        exponent += 1;
    }

    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", BYTE_UNITS[exponent])
}

/// `1234567` → `1,234,567`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Age of `timestamp` relative to `now`, both in seconds
pub fn format_time_ago(timestamp: u64, now: u64) -> String {
    let seconds = now.saturating_sub(timestamp);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        plural(seconds, "second")
    }
}

/// First and last `keep` characters of a long hash
pub fn shorten_hash(hash: &str, keep: usize) -> String {
    if hash.len() <= keep * 2 + 3 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..keep], &hash[hash.len() - keep..])
}
