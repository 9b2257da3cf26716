/// eligibility - table and calendar views over one month of day entries
use salary_advance_rs::chrono::{TimeZone, Utc};
use salary_advance_rs::eligibility::local_today;
use salary_advance_rs::{Availability, EligibilitySummary, SafeTimeProvider, TimeSource};

const SUMMARY: &str = r#"{
    "month": "March",
    "year": 2024,
    "basicSalary": 60000,
    "maxAdvancePercentage": 50,
    "maxAdvanceAmount": 30000,
    "totalAvailableToday": 2000,
    "dailyAdvances": [
        {"date": "2024-03-01", "availableAmount": 0, "percentageOfSalary": 50},
        {"date": "2024-03-02", "availableAmount": 1000, "percentageOfSalary": 50, "isWeekend": true},
        {"date": "2024-03-03", "availableAmount": 2000, "percentageOfSalary": 50, "isWeekend": true},
        {"date": "2024-03-04", "availableAmount": 3000, "percentageOfSalary": 50}
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 3, 3, 6, 0, 0).unwrap()));
    let today = local_today(&time);
    let summary: EligibilitySummary = serde_json::from_str(SUMMARY)?;

    println!("{} {}: cap {}", summary.month, summary.year, summary.cap().format_kes_whole());
    for row in summary.table_rows(today) {
        println!(
            "{}  {:>10}  {}",
            row.entry.date,
            row.entry.available_amount.format_kes_whole(),
            row.availability.label()
        );
    }

    let marked: Vec<_> = summary
        .calendar_marks(today)
        .into_iter()
        .filter(|mark| mark.availability == Availability::Actionable)
        .map(|mark| mark.date.to_string())
        .collect();
    println!("calendar dots: {}", marked.join(", "));

    if let Some(best) = summary.best_day(today) {
        println!("best day so far: {} ({})", best.date, best.available_amount.format_kes_whole());
    }

    Ok(())
}
