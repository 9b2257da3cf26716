use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Deserializer, Serialize};

use crate::advance::SalaryAdvance;
use crate::decimal::{Money, Rate};
use crate::errors::{AdvanceError, Result, ValidationError};

/// east africa time, the zone the backend's calendar days are cut in
pub const EAT_OFFSET_SECS: i32 = 3 * 3600;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// english month name for 1-based `month`
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// 1-based month number for an english month name (case-insensitive)
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))
        .map(|i| i as u32 + 1)
}

/// the calendar day "now" falls on, in east africa time
pub fn local_today(time: &SafeTimeProvider) -> NaiveDate {
    to_local_date(time.now())
}

fn to_local_date(now: DateTime<Utc>) -> NaiveDate {
    match FixedOffset::east_opt(EAT_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// parse `YYYY-MM-DD`, also tolerating a full iso timestamp
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let head = input.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn deserialize_day<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

/// whether a day can originate an advance request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Actionable,
    /// nothing available to draw on this day
    NothingAvailable,
    /// the day has not arrived yet
    FutureDate,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Actionable => "Request",
            Availability::NothingAvailable => "No Advance Available",
            Availability::FutureDate => "Not Available for Future Dates",
        }
    }
}

/// the advance amount computable for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    pub available_amount: Money,
    pub percentage_of_salary: Rate,
    #[serde(default)]
    pub is_weekend: bool,
    #[serde(default)]
    pub is_holiday: bool,
}

impl DayEntry {
    /// The one rule both the table and the calendar use: a day is
    /// actionable iff something is available and the day is not after
    /// `today`. An empty day reports `NothingAvailable` even when it is
    /// also in the future.
    pub fn availability(&self, today: NaiveDate) -> Availability {
        if !self.available_amount.is_positive() {
            Availability::NothingAvailable
        } else if self.date > today {
            Availability::FutureDate
        } else {
            Availability::Actionable
        }
    }

    pub fn is_actionable(&self, today: NaiveDate) -> bool {
        self.availability(today) == Availability::Actionable
    }

    /// the availability check as a validation result
    pub fn ensure_actionable(&self, today: NaiveDate) -> std::result::Result<(), ValidationError> {
        match self.availability(today) {
            Availability::Actionable => Ok(()),
            Availability::NothingAvailable => Err(ValidationError::DayNotActionable { date: self.date }),
            Availability::FutureDate => Err(ValidationError::FutureDate { date: self.date }),
        }
    }
}

/// one row of the tabular presentation
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<'a> {
    pub entry: &'a DayEntry,
    pub availability: Availability,
}

/// one marked day of the calendar presentation
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMark {
    pub date: NaiveDate,
    pub available_amount: Money,
    pub availability: Availability,
    pub is_today: bool,
}

/// monthly eligibility returned by `/advances/summary/monthly/{month}/{year}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilitySummary {
    pub month: String,
    pub year: i32,
    pub basic_salary: Money,
    pub max_advance_percentage: Rate,
    #[serde(default)]
    pub max_advance_amount: Money,
    pub daily_advances: Vec<DayEntry>,
    #[serde(default)]
    pub total_available_today: Money,
    #[serde(default)]
    pub previous_advances: Vec<SalaryAdvance>,
}

impl EligibilitySummary {
    /// the monthly ceiling: basic salary × max advance percentage
    pub fn cap(&self) -> Money {
        self.basic_salary.percentage(self.max_advance_percentage)
    }

    /// the entry for `date`, or `DayNotFound` when the date is outside the month
    pub fn day(&self, date: NaiveDate) -> Result<&DayEntry> {
        self.daily_advances
            .iter()
            .find(|d| d.date == date)
            .ok_or_else(|| AdvanceError::DayNotFound {
                date: date.format("%Y-%m-%d").to_string(),
            })
    }

    /// `day` for an iso date string
    pub fn day_str(&self, date: &str) -> Result<&DayEntry> {
        let parsed = parse_day(date).ok_or_else(|| AdvanceError::DayNotFound {
            date: date.to_string(),
        })?;
        self.day(parsed)
    }

    pub fn actionable_days(&self, today: NaiveDate) -> impl Iterator<Item = &DayEntry> {
        self.daily_advances.iter().filter(move |d| d.is_actionable(today))
    }

    /// the actionable day with the most available, latest first on ties
    pub fn best_day(&self, today: NaiveDate) -> Option<&DayEntry> {
        self.actionable_days(today)
            .max_by(|a, b| a.available_amount.cmp(&b.available_amount).then(a.date.cmp(&b.date)))
    }

    pub fn table_rows(&self, today: NaiveDate) -> Vec<TableRow<'_>> {
        self.daily_advances
            .iter()
            .map(|entry| TableRow {
                entry,
                availability: entry.availability(today),
            })
            .collect()
    }

    pub fn calendar_marks(&self, today: NaiveDate) -> Vec<CalendarMark> {
        self.daily_advances
            .iter()
            .map(|entry| CalendarMark {
                date: entry.date,
                available_amount: entry.available_amount,
                availability: entry.availability(today),
                is_today: entry.date == today,
            })
            .collect()
    }

    /// days whose amount exceeds the monthly ceiling
    pub fn validate_caps(&self) -> Vec<NaiveDate> {
        let cap = self.cap();
        self.daily_advances
            .iter()
            .filter(|d| d.available_amount > cap || d.available_amount.is_negative())
            .map(|d| d.date)
            .collect()
    }

    /// calendar days of the queried month missing from `daily_advances`
    pub fn validate_coverage(&self) -> Result<Vec<NaiveDate>> {
        let month = month_number(&self.month)
            .or_else(|| self.month.trim().parse::<u32>().ok())
            .ok_or_else(|| AdvanceError::Decode(format!("unknown month: {}", self.month)))?;
        let first = NaiveDate::from_ymd_opt(self.year, month, 1)
            .ok_or_else(|| AdvanceError::Decode(format!("invalid month {} {}", self.month, self.year)))?;

        let missing = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .filter(|d| !self.daily_advances.iter().any(|e| e.date == *d))
            .collect();
        Ok(missing)
    }
}

/// the current-month snapshot from `/advances/summary/current`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdvanceSummary {
    pub available_advance: Money,
    pub max_advance: Money,
    pub basic_salary: Money,
    pub advance_percentage: Rate,
    /// total advanced so far
    #[serde(default)]
    pub previous_advances: Money,
    #[serde(default)]
    pub next_payday: Option<String>,
    #[serde(default)]
    pub total_amount_repaid: Money,
    #[serde(default)]
    pub repayment_balance: Money,
}

impl CurrentAdvanceSummary {
    /// repay is only offered while a balance is owed
    pub fn can_repay(&self) -> bool {
        self.repayment_balance.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(day: u32, amount: i64) -> DayEntry {
        DayEntry {
            date: date(2024, 2, day),
            available_amount: Money::from_major(amount),
            percentage_of_salary: Rate::from_percent(dec!(1.7)),
            is_weekend: false,
            is_holiday: false,
        }
    }

    fn february() -> EligibilitySummary {
        EligibilitySummary {
            month: "February".to_string(),
            year: 2024,
            basic_salary: Money::from_major(60_000),
            max_advance_percentage: Rate::from_percentage(50),
            max_advance_amount: Money::from_major(30_000),
            daily_advances: (1..=29).map(|d| entry(d, d as i64 * 1000)).collect(),
            total_available_today: Money::from_major(15_000),
            previous_advances: Vec::new(),
        }
    }

    #[test]
    fn test_zero_amount_never_actionable() {
        let past_empty = entry(1, 0);
        assert_eq!(past_empty.availability(date(2024, 2, 20)), Availability::NothingAvailable);

        let future_empty = entry(25, 0);
        assert_eq!(future_empty.availability(date(2024, 2, 20)), Availability::NothingAvailable);
    }

    #[test]
    fn test_future_day_never_actionable() {
        let future = entry(21, 50_000);
        assert_eq!(future.availability(date(2024, 2, 20)), Availability::FutureDate);
        assert!(!future.is_actionable(date(2024, 2, 20)));

        // today itself is not in the future
        let today = entry(20, 500);
        assert!(today.is_actionable(date(2024, 2, 20)));
    }

    #[test]
    fn test_ensure_actionable_reports_reason() {
        let today = date(2024, 2, 10);
        assert_eq!(
            entry(3, 0).ensure_actionable(today),
            Err(ValidationError::DayNotActionable { date: date(2024, 2, 3) })
        );
        assert_eq!(
            entry(11, 100).ensure_actionable(today),
            Err(ValidationError::FutureDate { date: date(2024, 2, 11) })
        );
        assert!(entry(9, 100).ensure_actionable(today).is_ok());
    }

    #[test]
    fn test_selector_not_found_outside_month() {
        let summary = february();
        assert!(summary.day(date(2024, 2, 29)).is_ok());
        assert!(matches!(
            summary.day(date(2024, 3, 1)),
            Err(AdvanceError::DayNotFound { .. })
        ));
        assert!(matches!(
            summary.day_str("not-a-date"),
            Err(AdvanceError::DayNotFound { .. })
        ));
        let found = summary.day_str("2024-02-05T00:00:00.000Z").unwrap();
        assert_eq!(found.available_amount, Money::from_major(5000));
    }

    #[test]
    fn test_table_and_calendar_agree() {
        let summary = february();
        let today = date(2024, 2, 15);
        let rows = summary.table_rows(today);
        let marks = summary.calendar_marks(today);
        assert_eq!(rows.len(), marks.len());
        for (row, mark) in rows.iter().zip(marks.iter()) {
            assert_eq!(row.entry.date, mark.date);
            assert_eq!(row.availability, mark.availability);
        }
        assert_eq!(marks.iter().filter(|m| m.is_today).count(), 1);
    }

    #[test]
    fn test_best_day_and_actionable_days() {
        let summary = february();
        let today = date(2024, 2, 15);
        assert_eq!(summary.actionable_days(today).count(), 15);
        let best = summary.best_day(today).unwrap();
        assert_eq!(best.date, today);
    }

    #[test]
    fn test_caps_and_coverage() {
        let mut summary = february();
        assert_eq!(summary.cap(), Money::from_major(30_000));
        assert!(summary.validate_caps().is_empty());
        assert!(summary.validate_coverage().unwrap().is_empty());

        summary.daily_advances[0].available_amount = Money::from_major(30_001);
        summary.daily_advances.pop();
        assert_eq!(summary.validate_caps(), vec![date(2024, 2, 1)]);
        assert_eq!(summary.validate_coverage().unwrap(), vec![date(2024, 2, 29)]);
    }

    #[test]
    fn test_local_today_uses_east_africa_time() {
        // 22:30 utc on the 14th is already the 15th in nairobi
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 2, 14, 22, 30, 0).unwrap(),
        ));
        assert_eq!(local_today(&time), date(2024, 2, 15));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(3), Some("March"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_number("december"), Some(12));
    }

    #[test]
    fn test_summary_from_backend_json() {
        let json = r#"{
            "month": "March",
            "year": 2024,
            "basicSalary": 45000,
            "maxAdvancePercentage": 50,
            "maxAdvanceAmount": 22500,
            "dailyAdvances": [
                {"date": "2024-03-01", "availableAmount": 725.81, "percentageOfSalary": 1.61, "isWeekend": false, "isHoliday": false},
                {"date": "2024-03-02", "availableAmount": 0, "percentageOfSalary": 0, "isWeekend": true, "isHoliday": false}
            ],
            "totalAvailableToday": 725.81,
            "previousAdvances": []
        }"#;
        let summary: EligibilitySummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.daily_advances.len(), 2);
        assert!(summary.daily_advances[1].is_weekend);
        let day = summary.day(date(2024, 3, 1)).unwrap();
        assert_eq!(day.available_amount, Money::from_str_exact("725.81").unwrap());
    }

    #[test]
    fn test_current_summary_repay_gate() {
        let json = r#"{
            "availableAdvance": 12000,
            "maxAdvance": 25000,
            "basicSalary": 50000,
            "advancePercentage": 50,
            "previousAdvances": 13000,
            "nextPayday": "2024-03-28",
            "totalAmountRepaid": 4000,
            "repaymentBalance": 9390
        }"#;
        let summary: CurrentAdvanceSummary = serde_json::from_str(json).unwrap();
        assert!(summary.can_repay());

        let settled = CurrentAdvanceSummary {
            repayment_balance: Money::ZERO,
            ..summary
        };
        assert!(!settled.can_repay());
    }
}
