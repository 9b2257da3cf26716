/// request flow - sign in, load eligibility and submit an advance
///
/// Talks to a real backend: set `ADVANCE_API_URL`, `ADVANCE_NATIONAL_ID`
/// and `ADVANCE_PIN` before running.
use salary_advance_rs::chrono::Datelike;
use salary_advance_rs::{
    AdvanceGateway, AdvanceRequestBuilder, AdvanceWorkflow, ApiClient, AuthGateway, ClientConfig,
    NationalId, Notice, NoticeQueue, NoticeSink, Pin, SafeTimeProvider, Session, TimeSource,
};
use salary_advance_rs::advance::SUBMIT_FALLBACK;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let base_url = std::env::var("ADVANCE_API_URL").unwrap_or_else(|_| "http://localhost:3000/api".into());
    let national_id = NationalId::parse(&std::env::var("ADVANCE_NATIONAL_ID")?)?;
    let pin = Pin::parse(&std::env::var("ADVANCE_PIN")?)?;

    let client = ApiClient::new(&ClientConfig::new(base_url))?;
    let mut session = Session::new();
    session.sign_in(client.login(&national_id, &pin).await?);
    let api = client.authorized(&session);

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut workflow = AdvanceWorkflow::new(&api, &time);
    let today = workflow.today();
    let summary = api.eligibility_summary(today.month(), today.year()).await?;

    let mut notices = NoticeQueue::new();
    match summary.best_day(today) {
        Some(day) => {
            let calculator = workflow.calculator().await;
            let amount = calculator.snap_amount(day.available_amount, day.available_amount);
            let draft = AdvanceRequestBuilder::new()
                .amount(amount)
                .purpose("Emergency");
            match workflow.submit(draft, day, today).await {
                Ok(advance) => notices.show(Notice::success(
                    "Advance requested",
                    format!("{} is awaiting approval", advance.amount.format_kes()),
                )),
                Err(err) => notices.show(Notice::from_error("Request failed", &err, SUBMIT_FALLBACK)),
            }
        }
        None => notices.show(Notice::info("Nothing yet", "No advance is available today")),
    }

    for notice in notices.drain() {
        println!("[{}] {}", notice.title(), notice.message());
    }
    Ok(())
}
