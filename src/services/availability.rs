//! Menu availability resolution.
//!
//! Decides which schedules govern a menu at a given instant. Everything here is
//! a pure function of its inputs: the caller passes the instant, nothing reads
//! the clock or touches the database.
//!
//! Resolution order:
//! 1. Inactive schedules are dropped.
//! 2. Seasonal bounds are checked against the local date in each schedule's zone.
//! 3. The weekly window is checked against local weekday and time.
//! 4. Among survivors, the highest-priority non-overlapping schedule is the
//!    exclusive winner; every overlap-allowed survivor is kept alongside it.
//! 5. Output is ordered by priority descending, then id ascending.
//!
//! A menu with no schedules at all is unrestricted. A menu whose schedules all
//! miss is hidden.

use std::cmp::Ordering;

use chrono::{
    DateTime, Days, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::schedule::{ConfigurationError, MenuSchedule, ScheduleRule};

/// How far ahead `next_transition` looks for a change.
pub const TRANSITION_HORIZON_DAYS: u64 = 7;

/// Upper bound when scanning past a DST gap; no zone skips more than a day.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// A schedule selected by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSchedule {
    pub id: Uuid,
    pub priority: i32,
    pub allow_overlap: bool,
    /// True for the single winner among non-overlapping candidates.
    pub exclusive: bool,
    pub badge: Option<String>,
}

/// A persisted schedule that could not be evaluated and was treated as inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSchedule {
    pub id: Uuid,
    pub code: &'static str,
    pub reason: String,
}

impl From<(Uuid, ConfigurationError)> for SkippedSchedule {
    fn from((id, err): (Uuid, ConfigurationError)) -> Self {
        Self {
            id,
            code: err.code(),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The menu has no schedules and is always shown.
    pub unrestricted: bool,
    /// Schedules in effect, highest priority first.
    pub in_effect: Vec<ResolvedSchedule>,
    pub skipped: Vec<SkippedSchedule>,
}

impl Resolution {
    pub fn is_visible(&self) -> bool {
        self.unrestricted || !self.in_effect.is_empty()
    }

    pub fn in_effect_ids(&self) -> Vec<Uuid> {
        self.in_effect.iter().map(|s| s.id).collect()
    }
}

/// Splits rows into evaluable rules and the ones that fail validation.
pub fn compile(schedules: &[MenuSchedule]) -> (Vec<ScheduleRule>, Vec<SkippedSchedule>) {
    let mut rules = Vec::with_capacity(schedules.len());
    let mut skipped = Vec::new();
    for row in schedules {
        match ScheduleRule::try_from(row) {
            Ok(rule) => rules.push(rule),
            Err(err) => skipped.push(SkippedSchedule::from((row.id, err))),
        }
    }
    (rules, skipped)
}

/// Resolves a menu's schedules at `now`.
pub fn resolve(schedules: &[MenuSchedule], now: DateTime<Utc>) -> Resolution {
    if schedules.is_empty() {
        return Resolution {
            unrestricted: true,
            in_effect: Vec::new(),
            skipped: Vec::new(),
        };
    }

    let (rules, skipped) = compile(schedules);
    Resolution {
        unrestricted: false,
        in_effect: resolve_rules(&rules, now),
        skipped,
    }
}

/// Resolution over already-validated rules.
pub fn resolve_rules(rules: &[ScheduleRule], now: DateTime<Utc>) -> Vec<ResolvedSchedule> {
    let mut candidates: Vec<&ScheduleRule> = rules.iter().filter(|r| r.matches(now)).collect();
    candidates.sort_by(|a, b| by_precedence(a, b));

    // First non-overlapping candidate in precedence order is the winner.
    let winner = candidates.iter().find(|r| !r.allow_overlap).map(|r| r.id);

    candidates
        .into_iter()
        .filter(|r| r.allow_overlap || Some(r.id) == winner)
        .map(|r| ResolvedSchedule {
            id: r.id,
            priority: r.priority,
            allow_overlap: r.allow_overlap,
            exclusive: Some(r.id) == winner,
            badge: r.badge.clone(),
        })
        .collect()
}

fn by_precedence(a: &ScheduleRule, b: &ScheduleRule) -> Ordering {
    b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id))
}

/// Earliest instant strictly after `now` at which the resolved set changes.
///
/// Only instants where some rule can change state are examined: window starts
/// and ends, and local midnights (season bounds and whole-day windows). Returns
/// `None` for unrestricted menus or when nothing changes within
/// [`TRANSITION_HORIZON_DAYS`].
pub fn next_transition(schedules: &[MenuSchedule], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if schedules.is_empty() {
        return None;
    }
    let (rules, _) = compile(schedules);
    next_transition_rules(&rules, now)
}

pub fn next_transition_rules(rules: &[ScheduleRule], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let horizon = now + Duration::days(TRANSITION_HORIZON_DAYS as i64);
    let current = resolve_rules(rules, now);

    let mut instants: Vec<DateTime<Utc>> = rules
        .iter()
        .filter(|r| r.is_active)
        .flat_map(|r| boundary_instants(r, now))
        .filter(|t| *t > now && *t <= horizon)
        .collect();
    instants.sort();
    instants.dedup();

    instants
        .into_iter()
        .find(|t| resolve_rules(rules, *t) != current)
}

fn boundary_instants(rule: &ScheduleRule, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let today = rule.local(now).date();
    let first = today.checked_sub_days(Days::new(1)).unwrap_or(today);

    let mut out = Vec::new();
    let mut day = first;
    for _ in 0..=TRANSITION_HORIZON_DAYS + 1 {
        for time in [NaiveTime::MIN, rule.start_time, rule.end_time] {
            out.extend(to_instants(rule, day.and_time(time)));
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    out
}

/// Every instant at which a local wall-clock time occurs.
///
/// A time skipped by a DST gap maps to the end of the gap, the first moment
/// the wall clock reads later than it. A time repeated when clocks fall back
/// yields both occurrences.
fn to_instants(rule: &ScheduleRule, local: NaiveDateTime) -> Vec<DateTime<Utc>> {
    match rule.timezone.from_local_datetime(&local) {
        LocalResult::Single(dt) => vec![dt.with_timezone(&Utc)],
        LocalResult::Ambiguous(first, second) => {
            vec![first.with_timezone(&Utc), second.with_timezone(&Utc)]
        }
        LocalResult::None => gap_end(rule, local).into_iter().collect(),
    }
}

/// First valid local minute after `local`, which lies inside a DST gap.
fn gap_end(rule: &ScheduleRule, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let minute = local.with_second(0)?.with_nanosecond(0)?;
    (1..=MAX_GAP_MINUTES)
        .find_map(|m| {
            rule.timezone
                .from_local_datetime(&(minute + Duration::minutes(m)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// Two non-overlapping schedules of equal priority that can both match at once.
///
/// Resolution still picks one deterministically (lowest id), but the owner
/// likely did not intend it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleConflict {
    pub first: Uuid,
    pub second: Uuid,
    pub priority: i32,
    /// Weekdays (0 = Monday) on which a shared period begins.
    pub days: Vec<i16>,
}

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

/// Reports pairs of active, exclusive schedules with equal priority whose
/// windows and seasons intersect.
///
/// Windows are compared on the local week, so only schedules sharing a
/// timezone are compared.
pub fn find_conflicts(rules: &[ScheduleRule]) -> Vec<ScheduleConflict> {
    let mut exclusive: Vec<&ScheduleRule> = rules
        .iter()
        .filter(|r| r.is_active && !r.allow_overlap)
        .collect();
    exclusive.sort_by_key(|r| r.id);

    let mut conflicts = Vec::new();
    for (i, a) in exclusive.iter().enumerate() {
        for b in &exclusive[i + 1..] {
            if a.priority != b.priority || a.timezone != b.timezone || !seasons_overlap(a, b) {
                continue;
            }
            let days = shared_days(a, b);
            if !days.is_empty() {
                conflicts.push(ScheduleConflict {
                    first: a.id,
                    second: b.id,
                    priority: a.priority,
                    days,
                });
            }
        }
    }
    conflicts
}

fn seasons_overlap(a: &ScheduleRule, b: &ScheduleRule) -> bool {
    let start = a.start_date.max(b.start_date);
    let end = match (a.end_date, b.end_date) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    };
    match (start, end) {
        (Some(s), Some(e)) => s <= e,
        _ => true,
    }
}

/// Half-open `[start, end)` intervals in seconds from local Monday 00:00,
/// wrapped so every interval lies within one week.
fn weekly_intervals(rule: &ScheduleRule) -> Vec<(i64, i64)> {
    let secs = |t: NaiveTime| i64::from(t.num_seconds_from_midnight());
    let (start, end) = (secs(rule.start_time), secs(rule.end_time));

    let mut out = Vec::new();
    for day in rule.days.indices() {
        let base = i64::from(day) * SECS_PER_DAY;
        let (from, to) = match start.cmp(&end) {
            Ordering::Equal => (base, base + SECS_PER_DAY),
            Ordering::Less => (base + start, base + end),
            Ordering::Greater => (base + start, base + SECS_PER_DAY + end),
        };
        if to > SECS_PER_WEEK {
            out.push((from, SECS_PER_WEEK));
            out.push((0, to - SECS_PER_WEEK));
        } else {
            out.push((from, to));
        }
    }
    out
}

fn shared_days(a: &ScheduleRule, b: &ScheduleRule) -> Vec<i16> {
    let (xs, ys) = (weekly_intervals(a), weekly_intervals(b));
    let mut days: Vec<i16> = Vec::new();
    for &(a_from, a_to) in &xs {
        for &(b_from, b_to) in &ys {
            let from = a_from.max(b_from);
            if from < a_to.min(b_to) {
                // Result is within 0..=6 since `from` < SECS_PER_WEEK.
                days.push((from / SECS_PER_DAY) as i16);
            }
        }
    }
    days.sort_unstable();
    days.dedup();
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn schedule(n: u128, start: &str, end: &str, days: &[i16], priority: i32) -> MenuSchedule {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        MenuSchedule {
            id: id(n),
            menu_id: id(1000),
            start_time: start.into(),
            end_time: end.into(),
            days: days.to_vec(),
            priority,
            timezone: "UTC".into(),
            is_active: true,
            allow_overlap: false,
            start_date: None,
            end_date: None,
            badge: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    const ALL_DAYS: &[i16] = &[0, 1, 2, 3, 4, 5, 6];

    #[test]
    fn test_no_schedules_is_unrestricted() {
        let res = resolve(&[], utc(2024, 3, 4, 12, 0));
        assert!(res.unrestricted);
        assert!(res.is_visible());
        assert!(res.in_effect.is_empty());
    }

    #[test]
    fn test_no_match_hides_menu() {
        let res = resolve(&[schedule(1, "09:00", "10:00", ALL_DAYS, 0)], utc(2024, 3, 4, 12, 0));
        assert!(!res.unrestricted);
        assert!(!res.is_visible());
    }

    #[test]
    fn test_inactive_never_selected() {
        let mut s = schedule(1, "00:00", "00:00", ALL_DAYS, 100);
        s.is_active = false;
        s.allow_overlap = true;
        for hour in [0, 6, 12, 18, 23] {
            let res = resolve(std::slice::from_ref(&s), utc(2024, 3, 4, hour, 0));
            assert!(res.in_effect.is_empty());
        }
    }

    #[test]
    fn test_date_range_bound() {
        let mut s = schedule(1, "09:00", "17:00", ALL_DAYS, 0);
        s.start_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        s.end_date = NaiveDate::from_ymd_opt(2024, 6, 30);
        let schedules = [s];

        assert!(resolve(&schedules, utc(2024, 5, 31, 12, 0)).in_effect.is_empty());
        assert_eq!(resolve(&schedules, utc(2024, 6, 1, 12, 0)).in_effect_ids(), vec![id(1)]);
        assert_eq!(resolve(&schedules, utc(2024, 6, 30, 12, 0)).in_effect_ids(), vec![id(1)]);
        assert!(resolve(&schedules, utc(2024, 7, 1, 12, 0)).in_effect.is_empty());
        // Time of day still applies inside the season.
        assert!(resolve(&schedules, utc(2024, 6, 15, 20, 0)).in_effect.is_empty());
    }

    #[test]
    fn test_date_range_uses_schedule_timezone() {
        // 2024-05-31T20:00Z is already June 1st in Colombo (UTC+05:30).
        let mut s = schedule(1, "00:00", "00:00", ALL_DAYS, 0);
        s.timezone = "Asia/Colombo".into();
        s.start_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        assert_eq!(resolve(&[s], utc(2024, 5, 31, 20, 0)).in_effect_ids(), vec![id(1)]);
    }

    #[test]
    fn test_priority_winner_is_deterministic() {
        let schedules = [
            schedule(1, "09:00", "17:00", ALL_DAYS, 5),
            schedule(2, "09:00", "17:00", ALL_DAYS, 10),
        ];
        let now = utc(2024, 3, 4, 12, 0);
        for _ in 0..5 {
            let res = resolve(&schedules, now);
            assert_eq!(res.in_effect_ids(), vec![id(2)]);
            assert!(res.in_effect[0].exclusive);
        }
    }

    #[test]
    fn test_equal_priority_tie_breaks_by_lowest_id() {
        let schedules = [
            schedule(7, "09:00", "17:00", ALL_DAYS, 3),
            schedule(4, "09:00", "17:00", ALL_DAYS, 3),
        ];
        let res = resolve(&schedules, utc(2024, 3, 4, 12, 0));
        assert_eq!(res.in_effect_ids(), vec![id(4)]);
    }

    #[test]
    fn test_overlap_is_additive() {
        let exclusive = schedule(1, "09:00", "17:00", ALL_DAYS, 5);
        let mut overlapping = schedule(2, "11:00", "14:00", ALL_DAYS, 0);
        overlapping.allow_overlap = true;

        let res = resolve(&[exclusive, overlapping], utc(2024, 3, 4, 12, 0));
        assert_eq!(res.in_effect_ids(), vec![id(1), id(2)]);
        assert!(res.in_effect[0].exclusive);
        assert!(!res.in_effect[1].exclusive);
    }

    #[test]
    fn test_overlap_only_candidates_all_kept_in_priority_order() {
        let mut a = schedule(1, "09:00", "17:00", ALL_DAYS, 1);
        let mut b = schedule(2, "09:00", "17:00", ALL_DAYS, 9);
        a.allow_overlap = true;
        b.allow_overlap = true;
        let res = resolve(&[a, b], utc(2024, 3, 4, 12, 0));
        assert_eq!(res.in_effect_ids(), vec![id(2), id(1)]);
        assert!(res.in_effect.iter().all(|s| !s.exclusive));
    }

    #[test]
    fn test_overlapping_schedule_outranking_winner_is_listed_first() {
        let exclusive = schedule(1, "09:00", "17:00", ALL_DAYS, 5);
        let lower = schedule(3, "09:00", "17:00", ALL_DAYS, 1);
        let mut promo = schedule(2, "09:00", "17:00", ALL_DAYS, 20);
        promo.allow_overlap = true;

        let res = resolve(&[exclusive, lower, promo], utc(2024, 3, 4, 12, 0));
        assert_eq!(res.in_effect_ids(), vec![id(2), id(1)]);
    }

    #[test]
    fn test_timezone_correctness_colombo() {
        let mut s = schedule(1, "09:00", "17:00", &[0], 0);
        s.timezone = "Asia/Colombo".into();
        let schedules = [s];

        // 04:30Z == 10:00 Monday in Colombo
        assert_eq!(resolve(&schedules, utc(2024, 3, 4, 4, 30)).in_effect_ids(), vec![id(1)]);
        // 13:30Z == 19:00 Monday in Colombo
        assert!(resolve(&schedules, utc(2024, 3, 4, 13, 30)).in_effect.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let mut b = schedule(2, "08:00", "20:00", ALL_DAYS, 1);
        b.allow_overlap = true;
        let schedules = [
            schedule(1, "09:00", "17:00", ALL_DAYS, 1),
            b,
            schedule(3, "10:00", "12:00", ALL_DAYS, 1),
        ];
        let now = utc(2024, 3, 4, 11, 0);
        assert_eq!(resolve(&schedules, now), resolve(&schedules, now));
    }

    #[test]
    fn test_happy_hour_scenario() {
        let weekdays = schedule(1, "09:00", "17:00", &[0, 1, 2, 3, 4], 0);
        let mut happy_hour = schedule(2, "17:00", "22:00", &[4], 10);
        happy_hour.badge = Some("Happy Hour".into());

        // 2024-03-08 is a Friday
        let res = resolve(&[weekdays, happy_hour], utc(2024, 3, 8, 18, 0));
        assert_eq!(res.in_effect.len(), 1);
        assert_eq!(res.in_effect[0].id, id(2));
        assert_eq!(res.in_effect[0].badge.as_deref(), Some("Happy Hour"));
        assert!(res.in_effect[0].exclusive);
    }

    #[test]
    fn test_midnight_crossing_window() {
        let late = schedule(1, "22:00", "02:00", &[4], 0);
        let schedules = [late];
        assert_eq!(resolve(&schedules, utc(2024, 3, 8, 23, 0)).in_effect_ids(), vec![id(1)]);
        assert_eq!(resolve(&schedules, utc(2024, 3, 9, 1, 0)).in_effect_ids(), vec![id(1)]);
        assert!(resolve(&schedules, utc(2024, 3, 9, 3, 0)).in_effect.is_empty());
        assert!(resolve(&schedules, utc(2024, 3, 8, 1, 0)).in_effect.is_empty());
    }

    #[test]
    fn test_malformed_schedule_is_skipped_not_fatal() {
        let good = schedule(1, "00:00", "00:00", ALL_DAYS, 0);
        let mut bad = schedule(2, "00:00", "00:00", ALL_DAYS, 99);
        bad.timezone = "Nowhere/Land".into();

        let res = resolve(&[good, bad], utc(2024, 3, 4, 12, 0));
        assert_eq!(res.in_effect_ids(), vec![id(1)]);
        assert_eq!(res.skipped.len(), 1);
        assert_eq!(res.skipped[0].id, id(2));
        assert_eq!(res.skipped[0].code, "invalid_timezone");
    }

    #[test]
    fn test_only_malformed_schedules_hide_menu() {
        let bad = schedule(1, "9am", "5pm", ALL_DAYS, 0);
        let res = resolve(&[bad], utc(2024, 3, 4, 12, 0));
        assert!(!res.unrestricted);
        assert!(!res.is_visible());
        assert_eq!(res.skipped[0].code, "malformed_time");
    }

    #[test]
    fn test_next_transition_at_window_end() {
        let schedules = [schedule(1, "09:00", "17:00", ALL_DAYS, 0)];
        assert_eq!(
            next_transition(&schedules, utc(2024, 3, 4, 12, 0)),
            Some(utc(2024, 3, 4, 17, 0))
        );
        assert_eq!(
            next_transition(&schedules, utc(2024, 3, 4, 18, 0)),
            Some(utc(2024, 3, 5, 9, 0))
        );
    }

    #[test]
    fn test_next_transition_skips_boundaries_without_change() {
        // The lunch window never outranks the all-day schedule, so its
        // boundaries do not change what is shown.
        let schedules = [
            schedule(1, "00:00", "00:00", ALL_DAYS, 0),
            schedule(2, "11:00", "14:00", ALL_DAYS, -1),
        ];
        assert_eq!(next_transition(&schedules, utc(2024, 3, 4, 9, 0)), None);
    }

    #[test]
    fn test_next_transition_finds_handover() {
        let schedules = [
            schedule(1, "09:00", "17:00", ALL_DAYS, 0),
            schedule(2, "17:00", "09:00", ALL_DAYS, 0),
        ];
        assert_eq!(
            next_transition(&schedules, utc(2024, 3, 4, 12, 0)),
            Some(utc(2024, 3, 4, 17, 0))
        );
    }

    #[test]
    fn test_next_transition_respects_timezone() {
        let mut s = schedule(1, "09:00", "17:00", &[0], 0);
        s.timezone = "Asia/Colombo".into();
        // 17:00 Colombo == 11:30Z
        assert_eq!(
            next_transition(&[s], utc(2024, 3, 4, 4, 30)),
            Some(utc(2024, 3, 4, 11, 30))
        );
    }

    #[test]
    fn test_next_transition_start_inside_spring_forward_gap() {
        // New York skips 02:00-03:00 on 2024-03-10, so the window opens at 03:00 EDT.
        let mut s = schedule(1, "02:30", "05:00", &[6], 0);
        s.timezone = "America/New_York".into();
        let schedules = [s];

        assert!(resolve(&schedules, utc(2024, 3, 10, 6, 59)).in_effect.is_empty());
        assert_eq!(resolve(&schedules, utc(2024, 3, 10, 7, 0)).in_effect_ids(), vec![id(1)]);
        assert_eq!(
            next_transition(&schedules, utc(2024, 3, 10, 6, 0)),
            Some(utc(2024, 3, 10, 7, 0))
        );
    }

    #[test]
    fn test_next_transition_repeated_hour_after_fall_back() {
        // 01:00-02:00 happens twice in New York on 2024-11-03 (EDT, then EST).
        let mut s = schedule(1, "01:30", "01:45", &[6], 0);
        s.timezone = "America/New_York".into();
        let schedules = [s];

        // 05:50Z is 01:50 EDT, after the first pass of the window.
        let now = utc(2024, 11, 3, 5, 50);
        assert!(resolve(&schedules, now).in_effect.is_empty());
        assert_eq!(resolve(&schedules, utc(2024, 11, 3, 6, 30)).in_effect_ids(), vec![id(1)]);
        assert_eq!(next_transition(&schedules, now), Some(utc(2024, 11, 3, 6, 30)));
        assert_eq!(
            next_transition(&schedules, utc(2024, 11, 3, 6, 30)),
            Some(utc(2024, 11, 3, 6, 45))
        );
    }

    #[test]
    fn test_next_transition_none_when_unrestricted_or_static() {
        assert_eq!(next_transition(&[], utc(2024, 3, 4, 12, 0)), None);
        let always = [schedule(1, "00:00", "00:00", ALL_DAYS, 0)];
        assert_eq!(next_transition(&always, utc(2024, 3, 4, 12, 0)), None);
    }

    #[test]
    fn test_next_transition_at_season_start() {
        let mut s = schedule(1, "00:00", "00:00", ALL_DAYS, 0);
        s.start_date = NaiveDate::from_ymd_opt(2024, 3, 6);
        assert_eq!(
            next_transition(&[s], utc(2024, 3, 4, 12, 0)),
            Some(utc(2024, 3, 6, 0, 0))
        );
    }

    fn rules(rows: &[MenuSchedule]) -> Vec<ScheduleRule> {
        let (rules, skipped) = compile(rows);
        assert!(skipped.is_empty());
        rules
    }

    #[test]
    fn test_find_conflicts_equal_priority_overlap() {
        let found = find_conflicts(&rules(&[
            schedule(1, "09:00", "17:00", &[0, 1], 2),
            schedule(2, "16:00", "20:00", &[1, 2], 2),
        ]));
        assert_eq!(
            found,
            vec![ScheduleConflict { first: id(1), second: id(2), priority: 2, days: vec![1] }]
        );
    }

    #[test]
    fn test_find_conflicts_ignores_distinct_priority_and_overlap_allowed() {
        let mut overlapping = schedule(3, "09:00", "17:00", &[0], 2);
        overlapping.allow_overlap = true;
        let found = find_conflicts(&rules(&[
            schedule(1, "09:00", "17:00", &[0], 2),
            schedule(2, "09:00", "17:00", &[0], 3),
            overlapping,
        ]));
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_conflicts_touching_windows_do_not_conflict() {
        let found = find_conflicts(&rules(&[
            schedule(1, "09:00", "17:00", &[4], 0),
            schedule(2, "17:00", "22:00", &[4], 0),
        ]));
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_conflicts_wraps_sunday_into_monday() {
        let found = find_conflicts(&rules(&[
            schedule(1, "22:00", "03:00", &[6], 0),
            schedule(2, "01:00", "05:00", &[0], 0),
        ]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].days, vec![0]);
    }

    #[test]
    fn test_find_conflicts_disjoint_seasons() {
        let mut summer = schedule(1, "09:00", "17:00", &[0], 0);
        summer.start_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        summer.end_date = NaiveDate::from_ymd_opt(2024, 8, 31);
        let mut winter = schedule(2, "09:00", "17:00", &[0], 0);
        winter.start_date = NaiveDate::from_ymd_opt(2024, 12, 1);
        assert!(find_conflicts(&rules(&[summer, winter])).is_empty());
    }
}
