//! Parsing of typed console input.

use crate::directory::RecordId;
use crate::error::BookingError;
use chrono::NaiveDate;

pub fn parse_id(field: &'static str, text: &str) -> Result<RecordId, BookingError> {
    let text = text.trim();
    text.parse::<RecordId>()
        .map_err(|_| BookingError::invalid(field, text))
}

/// Parse a date with the first matching format, in list order
pub fn parse_date(text: &str, formats: &[String]) -> Result<NaiveDate, BookingError> {
    let text = text.trim();
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .ok_or_else(|| BookingError::invalid("date", text))
}

pub fn parse_specialty(text: &str) -> String {
    text.trim().to_string()
}
