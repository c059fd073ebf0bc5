use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const CONTINUATION_MARKER: char = '…';

const DATE_TIME_FORMATS: [&str; 2] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses the date formats accepted in front matter. Offsets are converted to UTC.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    let buf = buf.trim();
    if buf.is_empty() {
        return Err("Empty date".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(buf) {
        return Ok(dt.naive_utc());
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(buf, fmt) {
            return Ok(dt);
        }
    }

    match NaiveDate::parse_from_str(buf, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("Unable to parse date time {}", buf)),
        Err(_) => Err(format!("Unable to parse date time {}", buf)),
    }
}

pub fn format_date_time(date_time: &NaiveDateTime) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

pub fn format_date(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%d").to_string()
}

/// RFC 2822 rendering used by the feed, always in UTC with a zero padded day.
pub fn to_rfc2822(date_time: &NaiveDateTime) -> String {
    let dt = Utc.from_utc_datetime(date_time);
    dt.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Reading time in minutes. Empty text reads in zero minutes, anything else in at least one.
pub fn time_to_read(word_count: usize, words_per_minute: u32) -> u32 {
    if word_count == 0 {
        return 0;
    }
    let wpm = words_per_minute.max(1) as f64;
    let minutes = (word_count as f64 / wpm).round() as u32;
    minutes.max(1)
}

/// Collapses whitespace and cuts `text` so the result, marker included, fits in
/// `max_len` characters. Words are never split.
pub fn truncate_excerpt(text: &str, max_len: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let full_len = words.iter().map(|w| w.chars().count()).sum::<usize>()
        + words.len().saturating_sub(1);
    if full_len <= max_len {
        return words.join(" ");
    }
    if max_len == 0 {
        return String::new();
    }

    let budget = max_len - 1;
    let mut excerpt = String::new();
    let mut len = 0usize;
    for word in words {
        let word_len = word.chars().count();
        let needed = if excerpt.is_empty() { word_len } else { word_len + 1 };
        if len + needed > budget {
            break;
        }
        if !excerpt.is_empty() {
            excerpt.push(' ');
        }
        excerpt.push_str(word);
        len += needed;
    }

    let trimmed = excerpt.trim_end_matches(|c: char| c.is_ascii_punctuation() && c != ')');
    let mut excerpt = trimmed.to_string();
    excerpt.push(CONTINUATION_MARKER);
    excerpt
}
