//! Time-description parsing into day/period slots.

use super::types::{Day, TimeSlot};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Tokens that name a weekday in provider time descriptions.
const DAY_TOKENS: [(&str, Day); 17] = [
    ("월", Day::Mon),
    ("화", Day::Tue),
    ("수", Day::Wed),
    ("목", Day::Thu),
    ("금", Day::Fri),
    ("Mon", Day::Mon),
    ("Mon.", Day::Mon),
    ("Tue", Day::Tue),
    ("Tue.", Day::Tue),
    ("Wed", Day::Wed),
    ("Wed.", Day::Wed),
    ("Thu", Day::Thu),
    ("Thu.", Day::Thu),
    ("Thur", Day::Thu),
    ("Thur.", Day::Thu),
    ("Fri", Day::Fri),
    ("Fri.", Day::Fri),
];

static PERIOD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Looks up a token in the day table.
fn day_for_token(token: &str) -> Option<Day> {
    DAY_TOKENS
        .iter()
        .find(|(text, _)| *text == token)
        .map(|(_, day)| *day)
}

/// Parses a raw time description such as `"월 1 2 (화 3)"` into slots.
///
/// Day tokens move a cursor; integer tokens are periods of the cursor day.
/// Everything else is ignored, so unrecognized text yields no slots rather
/// than an error. Repeated period tokens for a day are kept as-is.
pub fn parse_slots(raw: &str) -> Vec<TimeSlot> {
    let clean = raw.replace(['(', ')'], " ");
    let mut buckets: BTreeMap<Day, Vec<u32>> = BTreeMap::new();
    let mut current_day: Option<Day> = None;

    for token in clean.split_whitespace() {
        if let Some(day) = day_for_token(token) {
            current_day = Some(day);
            continue;
        }

        let Some(day) = current_day else {
            continue;
        };

        if PERIOD_REGEX.is_match(token) {
            // Literals too large for a period index are noise
            if let Ok(period) = token.parse::<u32>() {
                buckets.entry(day).or_default().push(period);
            }
        }
    }

    buckets
        .into_iter()
        .filter(|(_, periods)| !periods.is_empty())
        .map(|(day, mut periods)| {
            periods.sort_unstable();
            TimeSlot { day, periods }
        })
        .collect()
}

/// Renders slots for list views, e.g. `"월 1·2, 화 3"`.
pub fn format_slots(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(|slot| {
            if slot.periods.is_empty() {
                return format!("{} -", slot.day.glyph());
            }
            let periods: Vec<String> = slot.periods.iter().map(u32::to_string).collect();
            format!("{} {}", slot.day.glyph(), periods.join("·"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
