/// quick quote - what a 1,000 shilling advance costs over each period
use salary_advance_rs::{AdvanceCalculator, AdvanceConfig, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let calculator = AdvanceCalculator::new(AdvanceConfig::default());

    for quote in calculator.quote_all_periods(Money::from_major(1_000))? {
        println!(
            "{} month(s): interest {}, total {}, {} per month",
            quote.periods,
            quote.total_interest.format_kes(),
            quote.total_repayment.format_kes(),
            quote.monthly_installment.format_kes(),
        );
    }

    // the amount slider moves in steps of 100
    let snapped = calculator.snap_amount(Money::from_major(4_349), Money::from_major(12_000));
    println!("slider lands on {}", snapped.format_kes_whole());

    Ok(())
}
