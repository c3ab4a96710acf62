/// Digit groups of three joined by dots: 1234567 -> "1.234.567"
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let head = match digits.len() % 3 {
        0 => 3.min(digits.len()),
        h => h,
    };
    let mut groups = vec![&digits[..head]];
    groups.extend((head..digits.len()).step_by(3).map(|i| &digits[i..i + 3]));
    groups.join(".")
}

/// Response size for the request log: bytes below 10k, then KB/MB with separators.
pub fn format_size(bytes: usize) -> String {
    match bytes {
        0..=9_999 => format!("{} B", bytes),
        10_000..=9_999_999 => format!("{} KB", format_number(bytes / 1024)),
        _ => format!("{} MB", format_number(bytes / (1024 * 1024))),
    }
}
