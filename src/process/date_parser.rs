use once_cell::sync::Lazy;
use regex::Regex;

use crate::process::utils::zero_pad2;

/// `D{1,2}[/.]D{1,2}[/.]D{2,4}` anchored at the start only.
static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[/.](\d{1,2})[/.](\d{2,4})").expect("valid date regex"));

static NOT_DATE_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d/.]").expect("valid date-char regex"));

/// Two-digit years below this land in the 2000s, the rest in the 1900s.
const CENTURY_CUTOFF: u32 = 50;

/// Normalize a date-like cell to `DD.MM.YYYY`.
///
/// Multi-date cells (`"23/9/2014; 29/01/2016"`) keep the last date.
/// Accepts `D/M/Y`, `D.M.Y`, `DDMMYYYY` and `DDMMYY`; anything else is
/// returned with all characters other than digits, `/` and `.` stripped.
/// Never fails.
pub fn normalize_date(input: Option<&str>) -> String {
    let s = match input {
        Some(s) => s.trim(),
        None => return String::new(),
    };
    if s.is_empty() {
        return String::new();
    }

    // most recent of several dates wins
    let s = match s.rsplit(';').next() {
        Some(last) if s.contains(';') => last.trim(),
        _ => s,
    };

    // already dot-delimited
    if s.contains('.') && !s.contains('/') {
        let parts: Vec<&str> = s.split('.').collect();
        if let [day, month, year] = parts.as_slice() {
            return format!("{}.{}.{}", zero_pad2(day), zero_pad2(month), year);
        }
    }

    let cleaned = NOT_DATE_CHAR.replace_all(s, "").into_owned();

    if let Some(caps) = DAY_MONTH_YEAR.captures(&cleaned) {
        return format!(
            "{}.{}.{}",
            zero_pad2(&caps[1]),
            zero_pad2(&caps[2]),
            expand_year(&caps[3])
        );
    }

    if cleaned.bytes().all(|b| b.is_ascii_digit()) {
        match cleaned.len() {
            8 => return format!("{}.{}.{}", &cleaned[..2], &cleaned[2..4], &cleaned[4..]),
            6 => {
                return format!(
                    "{}.{}.{}",
                    &cleaned[..2],
                    &cleaned[2..4],
                    expand_year(&cleaned[4..])
                )
            }
            _ => {}
        }
    }

    cleaned
}

/// `"12"` → `"2012"`, `"98"` → `"1998"`; other widths pass through.
fn expand_year(year: &str) -> String {
    if year.len() != 2 {
        return year.to_string();
    }
    match year.parse::<u32>() {
        Ok(yy) if yy < CENTURY_CUTOFF => format!("20{}", year),
        Ok(_) => format!("19{}", year),
        Err(_) => year.to_string(),
    }
}
