//! Restaurant (tenant menu) model and the public menu access gate

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name_ar: String,
    pub name_en: String,
    /// Unique public URL key, assigned at creation and never recomputed
    pub menu_slug: String,
    pub menu_enabled: bool,
    #[serde(with = "access_time")]
    pub access_start_at: Option<NaiveDateTime>,
    #[serde(with = "access_time")]
    pub access_end_at: Option<NaiveDateTime>,
    pub logo: Option<String>,
    pub phone: String,
    pub whatsapp: String,
    pub instagram: String,
    pub theme_bg: Option<String>,
    pub theme_card: Option<String>,
    pub theme_text: Option<String>,
    pub theme_muted: Option<String>,
    pub theme_accent: Option<String>,
    pub theme_accent2: Option<String>,
    pub theme_border: Option<String>,
    pub font_family: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    pub fn access_window(&self) -> AccessWindow {
        AccessWindow {
            start: self.access_start_at,
            end: self.access_end_at,
        }
    }

    /// Public menu gate: enabled flag first, then the access window
    pub fn check_menu_access(&self, now: NaiveDateTime) -> Result<(), ErrorCode> {
        if !self.menu_enabled {
            return Err(ErrorCode::MenuDisabled);
        }
        self.access_window().check(now)
    }
}

/// Editable restaurant settings (create and update payload)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantSettings {
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub name_en: String,
    pub logo: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub instagram: String,
    pub theme_bg: Option<String>,
    pub theme_card: Option<String>,
    pub theme_text: Option<String>,
    pub theme_muted: Option<String>,
    pub theme_accent: Option<String>,
    pub theme_accent2: Option<String>,
    pub theme_border: Option<String>,
    pub font_family: Option<String>,
}

/// Optional `[start, end]` range bounding public menu visibility.
/// A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl AccessWindow {
    /// Check `now` against the window at one-second resolution; both bounds are inclusive
    pub fn check(&self, now: NaiveDateTime) -> Result<(), ErrorCode> {
        let now = now.with_nanosecond(0).unwrap_or(now);
        if self.start.is_some_and(|start| now < start) {
            return Err(ErrorCode::MenuNotYetActive);
        }
        if self.end.is_some_and(|end| now > end) {
            return Err(ErrorCode::MenuExpired);
        }
        Ok(())
    }

    /// Whether the bounds are ordered (open sides always are)
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

/// Which side of the access window a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Normalize an access window input.
///
/// - empty → `None` (open bound)
/// - `YYYY-MM` → first day 00:00:00 (start) or last calendar day 23:59:59 (end)
/// - `YYYY-MM-DD` → 00:00:00 (start) or 23:59:59 (end)
/// - `YYYY-MM-DD HH:MM:SS` (or `T` separated) → as given
pub fn normalize_access_bound(
    input: &str,
    bound: Bound,
) -> Result<Option<NaiveDateTime>, ErrorCode> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Some((year, month)) = parse_year_month(trimmed) {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ErrorCode::InvalidAccessWindow)?;
        let date = match bound {
            Bound::Start => first,
            Bound::End => last_day_of_month(first).ok_or(ErrorCode::InvalidAccessWindow)?,
        };
        return Ok(Some(date.and_time(bound_time(bound))));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(date.and_time(bound_time(bound))));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Some(value));
        }
    }

    Err(ErrorCode::InvalidAccessWindow)
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?))
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

fn bound_time(bound: Bound) -> NaiveTime {
    match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
    }
}

/// `YYYY-MM-DD HH:MM:SS` wire format for access window timestamps
pub mod access_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, access_time::FORMAT).unwrap()
    }

    #[test]
    fn test_end_bound_is_inclusive() {
        let window = AccessWindow {
            start: None,
            end: Some(at("2024-01-31 23:59:59")),
        };
        assert!(window.check(at("2024-01-31 23:59:59")).is_ok());
        assert_eq!(
            window.check(at("2024-02-01 00:00:01")),
            Err(ErrorCode::MenuExpired)
        );
    }

    #[test]
    fn test_sub_second_does_not_expire_last_second() {
        let window = AccessWindow {
            start: None,
            end: Some(at("2024-01-31 23:59:59")),
        };
        let now = at("2024-01-31 23:59:59")
            .with_nanosecond(500_000_000)
            .unwrap();
        assert!(window.check(now).is_ok());
    }

    #[test]
    fn test_start_bound() {
        let window = AccessWindow {
            start: Some(at("2024-03-01 00:00:00")),
            end: None,
        };
        assert_eq!(
            window.check(at("2024-02-29 23:59:59")),
            Err(ErrorCode::MenuNotYetActive)
        );
        assert!(window.check(at("2024-03-01 00:00:00")).is_ok());
    }

    #[test]
    fn test_open_window_always_allows() {
        assert!(AccessWindow::default().check(at("1999-01-01 00:00:00")).is_ok());
    }

    #[test]
    fn test_month_end_normalization_handles_leap_years() {
        assert_eq!(
            normalize_access_bound("2024-02", Bound::End).unwrap(),
            Some(at("2024-02-29 23:59:59"))
        );
        assert_eq!(
            normalize_access_bound("2023-02", Bound::End).unwrap(),
            Some(at("2023-02-28 23:59:59"))
        );
        assert_eq!(
            normalize_access_bound("2024-12", Bound::End).unwrap(),
            Some(at("2024-12-31 23:59:59"))
        );
        assert_eq!(
            normalize_access_bound("2100-02", Bound::End).unwrap(),
            Some(at("2100-02-28 23:59:59"))
        );
    }

    #[test]
    fn test_month_start_normalization() {
        assert_eq!(
            normalize_access_bound("2024-02", Bound::Start).unwrap(),
            Some(at("2024-02-01 00:00:00"))
        );
    }

    #[test]
    fn test_day_and_full_inputs() {
        assert_eq!(
            normalize_access_bound("2024-05-10", Bound::End).unwrap(),
            Some(at("2024-05-10 23:59:59"))
        );
        assert_eq!(
            normalize_access_bound("2024-05-10 12:30:00", Bound::End).unwrap(),
            Some(at("2024-05-10 12:30:00"))
        );
        assert_eq!(normalize_access_bound("   ", Bound::Start).unwrap(), None);
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["2024-13", "2024-00", "24-01", "next month", "2024-02-30"] {
            assert_eq!(
                normalize_access_bound(input, Bound::End),
                Err(ErrorCode::InvalidAccessWindow),
                "{input}"
            );
        }
    }

    #[test]
    fn test_window_ordering() {
        let window = AccessWindow {
            start: Some(at("2024-03-01 00:00:00")),
            end: Some(at("2024-02-29 23:59:59")),
        };
        assert!(!window.is_ordered());
        assert!(AccessWindow::default().is_ordered());
    }

    #[test]
    fn test_disabled_menu_is_checked_before_window() {
        let restaurant = Restaurant {
            id: 1,
            name_ar: String::new(),
            name_en: "Cafe".into(),
            menu_slug: "cafe".into(),
            menu_enabled: false,
            access_start_at: None,
            access_end_at: Some(at("2020-01-31 23:59:59")),
            logo: None,
            phone: String::new(),
            whatsapp: String::new(),
            instagram: String::new(),
            theme_bg: None,
            theme_card: None,
            theme_text: None,
            theme_muted: None,
            theme_accent: None,
            theme_accent2: None,
            theme_border: None,
            font_family: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(
            restaurant.check_menu_access(at("2024-01-01 00:00:00")),
            Err(ErrorCode::MenuDisabled)
        );
    }

    #[test]
    fn test_access_time_serde() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "access_time")]
            at: Option<NaiveDateTime>,
        }
        let json = serde_json::to_string(&Wrapper {
            at: Some(at("2024-02-29 23:59:59")),
        })
        .unwrap();
        assert_eq!(json, r#"{"at":"2024-02-29 23:59:59"}"#);
        let parsed: Wrapper = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(parsed.at.is_none());
    }
}
