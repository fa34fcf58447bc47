use once_cell::sync::Lazy;
use regex_lite::Regex;

static FOUR_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Heuristic for authors presumed still alive (or deceased within the last
/// hundred years): a lifespan carrying exactly one 4-digit year within 100
/// years of `current_year`. Such records are excluded from ingestion.
///
/// A missing lifespan, or one with zero or several years (e.g. "1850-1920"),
/// never filters. False positives and negatives are accepted.
pub fn presumed_living(life_span: Option<&str>, current_year: i32) -> bool {
    let Some(text) = life_span else {
        return false;
    };

    let years: Vec<i32> = FOUR_DIGIT_YEAR
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    matches!(years.as_slice(), [year] if year + 100 > current_year)
}
