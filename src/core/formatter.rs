/// Returns a proportional token bar: `ceil((value/max)*width)` filled blocks
/// out of `width`. A zero max yields a fully empty bar, never a division.
pub fn format_token_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }
    let fill = ((value as f64 / max as f64) * width as f64).ceil() as usize;
    let fill = fill.min(width);
    format!("{}{}", "█".repeat(fill), "░".repeat(width - fill))
}

/// Returns the count with thousands separators, e.g. `1234567` → "1,234,567".
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Share of `part` in `total` as a percentage rounded to the nearest integer.
/// A zero total reads as 0%.
pub fn percent_of(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u64
}
