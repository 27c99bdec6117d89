//! # Shared Formatting Helpers
//!
//! Display helpers used by every front-end: prices, counts, phone numbers,
//! relative timestamps and the page list of a pagination control. Output
//! follows the `uk-UA` locale the marketplace is built for.
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::{format_currency, page_window, PageItem};
//!
//! assert_eq!(format_currency(1500.0, "UAH"), "1\u{a0}500\u{a0}грн.");
//! assert_eq!(
//!     page_window(1, 3, 5),
//!     vec![PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
//! );
//! ```

use chrono::{DateTime, Utc};

/// Thousands separator used by the `uk-UA` locale (no-break space).
const GROUP_SEPARATOR: char = '\u{a0}';

/// Format an amount of money, keeping up to two fraction digits and
/// dropping trailing zeros (`1 500 грн.`, `99,5 грн.`, `0,99 $`).
pub fn format_currency(amount: f64, currency: &str) -> String {
    let cents = (amount * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = group_digits(cents / 100);
    let fraction = cents % 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&whole);
    if fraction != 0 {
        out.push(',');
        if fraction % 10 == 0 {
            out.push_str(&(fraction / 10).to_string());
        } else {
            out.push_str(&format!("{fraction:02}"));
        }
    }
    out.push(GROUP_SEPARATOR);
    out.push_str(currency_symbol(currency));
    out
}

fn currency_symbol(currency: &str) -> &str {
    match currency {
        "UAH" => "грн.",
        "USD" => "$",
        "EUR" => "€",
        other => other,
    }
}

/// Group an integer into thousands (`1234567` -> `1 234 567`).
pub fn format_number(value: i64) -> String {
    let grouped = group_digits(value.unsigned_abs());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Format a Ukrainian number as `+38 (0XX) XXX-XX-XX`. Anything that is not
/// twelve digits starting with `38` is returned unchanged.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 12 || !digits.starts_with("38") {
        return phone.to_string();
    }
    format!(
        "+{} ({}) {}-{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..10],
        &digits[10..12]
    )
}

/// Human "time ago" text in Ukrainian. Older than 30 days falls back to a
/// short date (`dd.MM.yyyy`).
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "щойно".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes} {} тому", plural_uk(minutes, "хвилину", "хвилини", "хвилин"));
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} {} тому", plural_uk(hours, "годину", "години", "годин"));
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{days} {} тому", plural_uk(days, "день", "дні", "днів"));
    }

    then.format("%d.%m.%Y").to_string()
}

/// Ukrainian plural form for `n`.
fn plural_uk<'a>(n: i64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if mod10 == 1 && mod100 != 11 {
        one
    } else if (2..=4).contains(&mod10) && !(10..20).contains(&mod100) {
        few
    } else {
        many
    }
}

/// One slot in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Pages to show around `current`: a window of `max_visible` numbers, with the
/// first and last page pinned and gaps shown as [`PageItem::Ellipsis`].
pub fn page_window(current: u32, total_pages: u32, max_visible: u32) -> Vec<PageItem> {
    if total_pages == 0 || max_visible == 0 {
        return Vec::new();
    }

    let half = max_visible / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = (start + max_visible - 1).min(total_pages);
    if end + 1 - start < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    let mut items = Vec::new();
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}
