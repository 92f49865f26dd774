use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const VISIT_DURATION_MINUTES: i64 = 45;

const CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";

/// Visit booking as submitted by the scheduling form.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
    /// `YYYY-MM-DD`
    #[validate(length(min = 1))]
    pub date: String,
    /// `HH:MM`
    #[validate(length(min = 1))]
    pub time: String,
    pub property_title: Option<String>,
    pub property_address: Option<String>,
    pub prospect_name: Option<String>,
    pub prospect_email: Option<String>,
    pub notes: Option<String>,
}

impl VisitRequest {
    pub fn when(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    fn start(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()?;
        Some(date.and_time(time).and_utc())
    }

    /// Google Calendar template link for a 45-minute slot, or `None` when the title or a
    /// parseable date and time is missing.
    pub fn calendar_url(&self) -> Option<String> {
        let title = self.property_title.as_deref().filter(|t| !t.is_empty())?;
        let start = self.start()?;
        let end = start + Duration::minutes(VISIT_DURATION_MINUTES);

        let fmt = |d: DateTime<Utc>| d.format("%Y%m%dT%H%M00Z").to_string();
        let details = format!(
            "{}\nProspect: {} {}",
            self.notes.as_deref().unwrap_or(""),
            self.prospect_name.as_deref().unwrap_or(""),
            self.prospect_email.as_deref().unwrap_or("")
        );

        Some(format!(
            "{}&dates={}/{}&text={}&details={}&location={}",
            CALENDAR_BASE,
            fmt(start),
            fmt(end),
            urlencoding::encode(&format!("Visit: {}", title)),
            urlencoding::encode(&details),
            urlencoding::encode(self.property_address.as_deref().unwrap_or(""))
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> VisitRequest {
        VisitRequest {
            date: "2025-03-09".to_string(),
            time: "23:30".to_string(),
            property_title: Some("Villa Almadies".to_string()),
            property_address: Some("Route des Almadies, Dakar".to_string()),
            prospect_name: Some("Awa".to_string()),
            prospect_email: Some("awa@example.com".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_calendar_url_spans_45_minutes() {
        let url = request().calendar_url().unwrap();
        assert!(url.starts_with(CALENDAR_BASE));
        assert!(url.contains("&dates=20250309T233000Z/20250310T001500Z"));
        assert!(url.contains("&text=Visit%3A%20Villa%20Almadies"));
        assert!(url.contains("&location=Route%20des%20Almadies%2C%20Dakar"));
        assert!(url.contains("Prospect%3A%20Awa%20awa%40example.com"));
    }

    #[test]
    fn test_calendar_url_requires_title_and_valid_time() {
        let mut missing_title = request();
        missing_title.property_title = None;
        assert!(missing_title.calendar_url().is_none());

        let mut bad_time = request();
        bad_time.time = "late".to_string();
        assert!(bad_time.calendar_url().is_none());
        assert_eq!(bad_time.when(), "2025-03-09 late");
    }
}
