/// Horizontal bar for inline use, e.g. `████████░░░░`.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Share of `value` in `total`, in whole percent.
#[must_use]
pub fn percentage(value: u64, total: u64) -> u16 {
    if total == 0 {
        return 0;
    }
    ((value as f64 / total as f64) * 100.0).round().min(100.0) as u16
}
