//! Vietnamese date-phrase normalization.
//!
//! Administrative headers date documents with the phrase
//! `ngày <d> tháng <m> năm <yyyy>`, usually preceded by a place name
//! (`Thái Nguyên, ngày 22 tháng 6 năm 2022`). Output is ISO 8601.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static VN_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ngày\s+(\d{1,2})\s+tháng\s+(\d{1,2})\s+năm\s+(\d{2,4})")
        .expect("static date pattern")
});

/// Parse the first Vietnamese date phrase in `text` to `YYYY-MM-DD`.
///
/// Two-digit years are widened (`<50` → 20xx, else 19xx). Returns
/// `None` when no phrase is present or the day/month combination is
/// not a real calendar date.
pub fn parse_vn_date(text: &str) -> Option<String> {
    let caps = VN_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += if year < 50 { 2000 } else { 1900 };
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}
