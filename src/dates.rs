//! Date arguments on the command line.

use anyhow::Result;
use planner_core::DateKey;

/// Accept a canonical `YYYY-MM-DD` key or a loose phrase like "next friday".
pub fn parse_date_arg(input: &str) -> Result<DateKey> {
    let input = input.trim();
    if let Ok(key) = DateKey::parse(input) {
        return Ok(key);
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{}\"", input))?;

    Ok(DateKey::from_date(dt.date())?)
}

/// Expand weekday abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| match word.to_lowercase().as_str() {
            "mon" => "monday".to_string(),
            "tue" | "tues" => "tuesday".to_string(),
            "wed" => "wednesday".to_string(),
            "thu" | "thur" | "thurs" => "thursday".to_string(),
            "fri" => "friday".to_string(),
            "sat" => "saturday".to_string(),
            "sun" => "sunday".to_string(),
            _ => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keys_pass_through() {
        assert_eq!(parse_date_arg("2025-06-10").unwrap().as_str(), "2025-06-10");
    }

    #[test]
    fn relative_phrases_resolve() {
        assert_eq!(parse_date_arg("today").unwrap(), DateKey::today());
        assert!(parse_date_arg("tomorrow").unwrap() > DateKey::today());
    }

    #[test]
    fn abbreviations_expand() {
        assert_eq!(expand_abbreviations("next Fri"), "next friday");
        assert_eq!(expand_abbreviations("march 20"), "march 20");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_date_arg("not a date at all xyz").is_err());
    }
}
