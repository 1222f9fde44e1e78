//! Display helpers for amounts, counts and durations.

/// Compact count: `950`, `1.2K`, `3.4M`, `1.1B`.
pub fn format_count(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000, "K"), (1_000_000, "M"), (1_000_000_000, "B")];

    let Some(mut unit) = UNITS.iter().rposition(|(size, _)| n >= *size) else {
        return n.to_string();
    };

    let scaled = |unit: usize| format!("{:.1}", n as f64 / UNITS[unit].0 as f64);
    let mut text = scaled(unit);
    // Rounding can carry into the next unit: 999_950 is 1M, not 1000K.
    if unit + 1 < UNITS.len() && text.parse::<f64>().is_ok_and(|v| v >= 1_000.0) {
        unit += 1;
        text = scaled(unit);
    }

    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, UNITS[unit].1)
}

/// Groups the integer part with commas: `1234567.891` -> `1,234,567.89`.
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// Currency amount: `$1,234.56`, `-$20.00`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(amount, 2))
}

/// Profit/loss with an explicit sign: `+$250.00`, `-$20.00`.
pub fn format_profit(amount: f64) -> String {
    if amount > 0.0 {
        format!("+{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

/// Win multiplier: `1,250.00x`.
pub fn format_multiplier(multiplier: f64) -> String {
    format!("{}x", group_thousands(multiplier, 2))
}

/// Percentage with two decimals: `96.50%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Short duration: `45s`, `12m`, `2h 15m`, `3d 4h`.
pub fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().max(0);
    let (days, hours, minutes) = (secs / 86_400, (secs % 86_400) / 3_600, (secs % 3_600) / 60);

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", secs)
    }
}
