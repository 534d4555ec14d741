use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// DB row for a menu availability window.
///
/// Times are stored as TEXT (`HH:MM` or `HH:MM:SS`) and days as SMALLINT[]
/// (0 = Monday .. 6 = Sunday), exactly as the owner entered them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MenuSchedule {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub days: Vec<i16>,
    pub priority: i32,
    pub timezone: String,
    pub is_active: bool,
    pub allow_overlap: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub badge: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for POST /menus/{id}/schedules.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleRequest {
    pub start_time: String,
    pub end_time: String,
    pub days: Vec<i16>,
    pub priority: Option<i32>,
    /// Falls back to the restaurant's default timezone when omitted.
    pub timezone: Option<String>,
    pub is_active: Option<bool>,
    pub allow_overlap: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub badge: Option<String>,
}

/// Body for PUT /schedules/{id}. Absent fields keep their stored value.
///
/// `start_date`, `end_date` and `badge` distinguish "absent" from an explicit
/// `null`, which clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScheduleRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub days: Option<Vec<i16>>,
    pub priority: Option<i32>,
    pub timezone: Option<String>,
    pub is_active: Option<bool>,
    pub allow_overlap: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub badge: Option<Option<String>>,
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Validated, normalized column values ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDraft {
    pub start_time: String,
    pub end_time: String,
    pub days: Vec<i16>,
    pub priority: i32,
    pub timezone: String,
    pub is_active: bool,
    pub allow_overlap: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub badge: Option<String>,
}

/// Identifies the schedule an error belongs to; `None` for a schedule
/// that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRef(pub Option<Uuid>);

impl fmt::Display for ScheduleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "(new)"),
        }
    }
}

/// A schedule whose stored or submitted fields cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("schedule {schedule}: unknown timezone '{timezone}'")]
    InvalidTimezone { schedule: ScheduleRef, timezone: String },

    #[error("schedule {schedule}: malformed {field} '{value}', expected HH:MM")]
    MalformedTime {
        schedule: ScheduleRef,
        field: &'static str,
        value: String,
    },

    #[error("schedule {schedule}: at least one day is required")]
    EmptyDays { schedule: ScheduleRef },

    #[error("schedule {schedule}: day index {day} is outside 0 (Monday) ..= 6 (Sunday)")]
    WeekdayOutOfRange { schedule: ScheduleRef, day: i16 },

    #[error("schedule {schedule}: start_date {start} is after end_date {end}")]
    InvertedDateRange {
        schedule: ScheduleRef,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl ConfigurationError {
    /// Short machine-readable tag, used as a metrics label and in API errors.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigurationError::InvalidTimezone { .. } => "invalid_timezone",
            ConfigurationError::MalformedTime { .. } => "malformed_time",
            ConfigurationError::EmptyDays { .. } => "empty_days",
            ConfigurationError::WeekdayOutOfRange { .. } => "weekday_out_of_range",
            ConfigurationError::InvertedDateRange { .. } => "inverted_date_range",
        }
    }
}

/// Set of weekdays stored as a 7-bit mask, bit 0 = Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Day indices in ascending order (0 = Monday).
    pub fn indices(&self) -> Vec<i16> {
        (0..7i16).filter(|&i| self.0 & (1u8 << i) != 0).collect()
    }
}

/// Parses `HH:MM`, also accepting `HH:MM:SS` as sent by browser time inputs.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Canonical text form: `HH:MM`, keeping seconds only when they are set.
pub fn format_time_of_day(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

pub fn parse_timezone(schedule: ScheduleRef, value: &str) -> Result<Tz, ConfigurationError> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| ConfigurationError::InvalidTimezone {
            schedule,
            timezone: value.to_string(),
        })
}

fn parse_time_field(
    schedule: ScheduleRef,
    field: &'static str,
    value: &str,
) -> Result<NaiveTime, ConfigurationError> {
    parse_time_of_day(value).ok_or_else(|| ConfigurationError::MalformedTime {
        schedule,
        field,
        value: value.to_string(),
    })
}

fn parse_days(schedule: ScheduleRef, days: &[i16]) -> Result<WeekdaySet, ConfigurationError> {
    let mut set = WeekdaySet::default();
    for &day in days {
        let weekday = u8::try_from(day)
            .ok()
            .and_then(|d| Weekday::try_from(d).ok())
            .ok_or(ConfigurationError::WeekdayOutOfRange { schedule, day })?;
        set.insert(weekday);
    }
    if set.is_empty() {
        return Err(ConfigurationError::EmptyDays { schedule });
    }
    Ok(set)
}

fn check_date_range(
    schedule: ScheduleRef,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ConfigurationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ConfigurationError::InvertedDateRange {
            schedule,
            start,
            end,
        }),
        _ => Ok(()),
    }
}

fn normalize_badge(badge: Option<String>) -> Option<String> {
    badge
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
}

/// A schedule in evaluable form: times parsed, zone resolved, days as a set.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRule {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub days: WeekdaySet,
    pub priority: i32,
    pub timezone: Tz,
    pub is_active: bool,
    pub allow_overlap: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub badge: Option<String>,
}

impl TryFrom<&MenuSchedule> for ScheduleRule {
    type Error = ConfigurationError;

    fn try_from(row: &MenuSchedule) -> Result<Self, Self::Error> {
        let schedule = ScheduleRef(Some(row.id));
        let timezone = parse_timezone(schedule, &row.timezone)?;
        let start_time = parse_time_field(schedule, "start_time", &row.start_time)?;
        let end_time = parse_time_field(schedule, "end_time", &row.end_time)?;
        let days = parse_days(schedule, &row.days)?;
        check_date_range(schedule, row.start_date, row.end_date)?;

        Ok(Self {
            id: row.id,
            menu_id: row.menu_id,
            start_time,
            end_time,
            days,
            priority: row.priority,
            timezone,
            is_active: row.is_active,
            allow_overlap: row.allow_overlap,
            start_date: row.start_date,
            end_date: row.end_date,
            badge: row.badge.clone(),
        })
    }
}

impl ScheduleRule {
    /// `now` as wall-clock time in this rule's zone.
    pub fn local(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.timezone).naive_local()
    }

    /// Whether `date` lies within the inclusive seasonal bounds.
    pub fn in_season(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// Whether the weekly window covers a local wall-clock moment.
    ///
    /// A window whose end precedes its start crosses midnight and belongs to
    /// the day it starts: its tail `[00:00, end)` is matched against the
    /// previous weekday. Equal start and end cover the whole day.
    pub fn covers(&self, local: NaiveDateTime) -> bool {
        let day = local.weekday();
        let time = local.time();

        if self.start_time == self.end_time {
            return self.days.contains(day);
        }
        if self.start_time < self.end_time {
            return self.days.contains(day) && time >= self.start_time && time < self.end_time;
        }
        (self.days.contains(day) && time >= self.start_time)
            || (self.days.contains(day.pred()) && time < self.end_time)
    }

    /// Active, in season and inside its window at `now`.
    pub fn matches(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        let local = self.local(now);
        self.in_season(local.date()) && self.covers(local)
    }
}

impl CreateScheduleRequest {
    /// Validates the request, filling the timezone from `default_timezone`.
    pub fn validate(self, default_timezone: &str) -> Result<ScheduleDraft, ConfigurationError> {
        let timezone = self
            .timezone
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or_else(|| default_timezone.to_string());

        build_draft(
            ScheduleRef(None),
            RawFields {
                start_time: &self.start_time,
                end_time: &self.end_time,
                days: &self.days,
                timezone: &timezone,
                start_date: self.start_date,
                end_date: self.end_date,
            },
            self.priority.unwrap_or(0),
            self.is_active.unwrap_or(true),
            self.allow_overlap.unwrap_or(false),
            self.badge,
        )
    }
}

impl UpdateScheduleRequest {
    /// Merges the request over `existing` and validates the result as a whole.
    pub fn merge_into(self, existing: &MenuSchedule) -> Result<ScheduleDraft, ConfigurationError> {
        let start_time = self.start_time.unwrap_or_else(|| existing.start_time.clone());
        let end_time = self.end_time.unwrap_or_else(|| existing.end_time.clone());
        let days = self.days.unwrap_or_else(|| existing.days.clone());
        let timezone = self.timezone.unwrap_or_else(|| existing.timezone.clone());

        build_draft(
            ScheduleRef(Some(existing.id)),
            RawFields {
                start_time: &start_time,
                end_time: &end_time,
                days: &days,
                timezone: &timezone,
                start_date: self.start_date.unwrap_or(existing.start_date),
                end_date: self.end_date.unwrap_or(existing.end_date),
            },
            self.priority.unwrap_or(existing.priority),
            self.is_active.unwrap_or(existing.is_active),
            self.allow_overlap.unwrap_or(existing.allow_overlap),
            self.badge.unwrap_or_else(|| existing.badge.clone()),
        )
    }
}

struct RawFields<'a> {
    start_time: &'a str,
    end_time: &'a str,
    days: &'a [i16],
    timezone: &'a str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

fn build_draft(
    schedule: ScheduleRef,
    raw: RawFields<'_>,
    priority: i32,
    is_active: bool,
    allow_overlap: bool,
    badge: Option<String>,
) -> Result<ScheduleDraft, ConfigurationError> {
    let timezone = parse_timezone(schedule, raw.timezone)?;
    let start_time = parse_time_field(schedule, "start_time", raw.start_time)?;
    let end_time = parse_time_field(schedule, "end_time", raw.end_time)?;
    let days = parse_days(schedule, raw.days)?;
    check_date_range(schedule, raw.start_date, raw.end_date)?;

    Ok(ScheduleDraft {
        start_time: format_time_of_day(start_time),
        end_time: format_time_of_day(end_time),
        days: days.indices(),
        priority,
        timezone: timezone.name().to_string(),
        is_active,
        allow_overlap,
        start_date: raw.start_date,
        end_date: raw.end_date,
        badge: normalize_badge(badge),
    })
}
