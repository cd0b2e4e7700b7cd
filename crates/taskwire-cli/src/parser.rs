use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_english::{parse_date_string, Dialect};

use taskwire_core::models::{Frequency, RecurrenceRule};

/// Parses a natural-language deadline ('tomorrow 5pm', 'next friday', ...).
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>> {
    parse_date_string(input, Utc::now(), Dialect::Us)
        .map_err(|e| anyhow::anyhow!("Failed to parse deadline '{}': {}", input, e))
}

/// Parses a human-friendly frequency name into a rule frequency.
pub fn parse_frequency(input: &str) -> Result<Frequency> {
    match input.to_lowercase().as_str() {
        "daily" | "day" => Ok(Frequency::Daily),
        "weekly" | "week" => Ok(Frequency::Weekly),
        "monthly" | "month" => Ok(Frequency::Monthly),
        "yearly" | "year" | "annually" => Ok(Frequency::Yearly),
        _ => Err(anyhow::anyhow!(
            "Unknown frequency '{}' (expected daily, weekly, monthly or yearly)",
            input
        )),
    }
}

/// Builds the wire rule string from `--every` / `--until` flags.
pub fn build_rrule(every: &str, until: Option<&str>) -> Result<String> {
    let frequency = parse_frequency(every)?;
    let rule = match until {
        Some(raw) => RecurrenceRule::with_until(frequency, parse_deadline(raw)?),
        None => RecurrenceRule::new(frequency),
    };
    Ok(rule.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_names_parse_case_insensitively() {
        assert_eq!(parse_frequency("Daily").unwrap(), Frequency::Daily);
        assert_eq!(parse_frequency("WEEKLY").unwrap(), Frequency::Weekly);
        assert_eq!(parse_frequency("month").unwrap(), Frequency::Monthly);
        assert!(parse_frequency("fortnightly").is_err());
    }

    #[test]
    fn build_rrule_without_until_is_open_ended() {
        assert_eq!(build_rrule("weekly", None).unwrap(), "FREQ=WEEKLY");
    }

    #[test]
    fn deadline_parser_accepts_absolute_dates() {
        assert!(parse_deadline("2026-12-31").is_ok());
        assert!(parse_deadline("not a date at all").is_err());
    }
}
