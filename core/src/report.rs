use crate::error::ValidationError;
use crate::input::optional_id;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole-day range: `[from 00:00, to + 1 day 00:00)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn days(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::Invalid(
                "desde",
                "debe ser anterior o igual a hasta".to_owned(),
            ));
        }
        Ok(DateRange {
            start: from.and_time(Default::default()).and_utc(),
            end: (to + Duration::days(1)).and_time(Default::default()).and_utc(),
        })
    }

    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, ValidationError> {
        let from = day("desde", from)?;
        let to = day("hasta", to)?;
        DateRange::days(from, to)
    }

    /// The last seven days of the range.
    pub fn recent_week(&self) -> DateRange {
        DateRange {
            start: self.end - Duration::days(7),
            end: self.end,
        }
    }

    /// The seven days before [`DateRange::recent_week`].
    pub fn previous_week(&self) -> DateRange {
        let recent = self.recent_week();
        DateRange {
            start: recent.start - Duration::days(7),
            end: recent.start,
        }
    }
}

fn day(field: &'static str, raw: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::Missing(field))?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::Invalid(field, "se espera una fecha AAAA-MM-DD".to_owned()))
}

/// Query of the `/reportes` endpoints
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReportQuery {
    pub desde: Option<String>,
    pub hasta: Option<String>,
    #[serde(rename = "apiarioId")]
    pub apiario_id: Option<String>,
    #[serde(rename = "colmenaId")]
    pub colmena_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilter {
    pub range: DateRange,
    pub apiary_id: Option<i32>,
    pub hive_id: Option<i32>,
}

impl ReportQuery {
    pub fn range(&self) -> Result<DateRange, ValidationError> {
        DateRange::parse(self.desde.as_deref(), self.hasta.as_deref())
    }

    pub fn validate(&self) -> Result<ReportFilter, ValidationError> {
        let apiary = self.apiario_id.clone().map(Value::String);
        let hive = self.colmena_id.clone().map(Value::String);
        Ok(ReportFilter {
            range: self.range()?,
            apiary_id: optional_id("apiarioId", apiary.as_ref())?,
            hive_id: optional_id("colmenaId", hive.as_ref())?,
        })
    }
}

/// Percent change from `previous` to `recent`; 0 without a previous value.
pub fn percent_change(previous: Option<f64>, recent: Option<f64>) -> f64 {
    match (previous, recent) {
        (Some(previous), Some(recent)) if previous != 0.0 => {
            (recent - previous) / previous * 100.0
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_range_covers_whole_days() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        assert_eq!(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(), range.start);
        assert_eq!(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(), range.end);
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-01")).unwrap();
        assert_eq!(Duration::days(1), range.end - range.start);
    }

    #[test]
    fn test_range_errors() {
        assert_eq!(
            Err(ValidationError::Missing("desde")),
            DateRange::parse(None, Some("2024-03-01"))
        );
        assert_eq!(
            Err(ValidationError::Missing("hasta")),
            DateRange::parse(Some("2024-03-01"), Some(""))
        );
        assert!(DateRange::parse(Some("01-03-2024"), Some("2024-03-02")).is_err());
        assert!(DateRange::parse(Some("2024-03-02"), Some("2024-03-01")).is_err());
    }

    #[test]
    fn test_weeks_end_at_range_end() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        let recent = range.recent_week();
        let previous = range.previous_week();
        assert_eq!(range.end, recent.end);
        assert_eq!(Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap(), recent.start);
        assert_eq!(recent.start, previous.end);
        assert_eq!(Utc.with_ymd_and_hms(2024, 3, 18, 0, 0, 0).unwrap(), previous.start);
    }

    #[test]
    fn test_query_filters() {
        let query = ReportQuery {
            desde: Some("2024-03-01".to_owned()),
            hasta: Some("2024-03-02".to_owned()),
            apiario_id: Some("".to_owned()),
            colmena_id: Some("4".to_owned()),
        };
        let filter = query.validate().unwrap();
        assert_eq!(None, filter.apiary_id);
        assert_eq!(Some(4), filter.hive_id);

        let bad = ReportQuery {
            colmena_id: Some("cuatro".to_owned()),
            ..query
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(50.0, percent_change(Some(40.0), Some(60.0)));
        assert_eq!(-25.0, percent_change(Some(40.0), Some(30.0)));
        assert_eq!(0.0, percent_change(None, Some(60.0)));
        assert_eq!(0.0, percent_change(Some(0.0), Some(60.0)));
        assert_eq!(0.0, percent_change(Some(40.0), None));
    }
}
