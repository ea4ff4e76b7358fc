// Lexboard operator tool
// Prints the performance report or a user's dashboard summary from the local store.

use log::{error, info};
use std::process::exit;

use lexboard::calendar::{CalendarSync, ChannelPrompt, GoogleCalendarClient, TokenStore};
use lexboard::config::{validate_config, Config, REPORT_PAGE_SIZE};
use lexboard::dashboard::{performance_report, Dashboard};
use lexboard::utils::logging::init_logging;
use lexboard::{AppError, AppResult, Database, Role, Session};

const USAGE: &str = "usage: lexboard report [PAGE] | lexboard dashboard USER_ID ROLE";

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(e) = run(&args).await {
        error!("{}", e);
        eprintln!("{}", e.to_safe_string());
        exit(1);
    }
}

async fn run(args: &[String]) -> AppResult<()> {
    let config = Config::from_env()?;
    validate_config(&config)?;

    if let Some(dir) = dirs::data_dir() {
        std::fs::create_dir_all(dir.join("lexboard"))
            .map_err(|e| AppError::config(format!("Cannot create data directory: {}", e)))?;
    }
    let db = Database::open(&config.database_url).await?;
    info!("Using database {}", config.database_url);

    match args.first().map(String::as_str) {
        Some("report") => {
            let page = match args.get(1) {
                Some(value) => value
                    .parse::<usize>()
                    .map_err(|_| AppError::invalid_input(format!("Bad page number '{}'", value)))?,
                None => 1,
            };
            let report = performance_report(&db, page, REPORT_PAGE_SIZE).await?;
            println!("Page {} of {}", report.page, report.total_pages);
            for row in &report.rows {
                println!(
                    "{:<24} tasks {:>3} ({:>3} done)  cases {:>3} ({:>3} decided)",
                    row.lawyer_name, row.total_tasks, row.completed_tasks, row.total_cases, row.decided_cases
                );
            }
            println!("Pages with activity: {:?}", report.pages_with_content);
        }
        Some("dashboard") => {
            let (Some(user_id), Some(role)) = (args.get(1), args.get(2)) else {
                return Err(AppError::invalid_input(USAGE));
            };
            let role = Role::from_claim(role).map_err(AppError::invalid_input)?;
            let session = Session::new(user_id.clone(), user_id.clone(), role);

            let (prompt_tx, mut prompt_rx) = tokio::sync::mpsc::unbounded_channel();
            let prompt = ChannelPrompt::new(&config, prompt_tx);
            let client = GoogleCalendarClient::new(&config)?;
            let sync = CalendarSync::new(client, TokenStore::new(), std::sync::Arc::new(prompt), None);

            let mut dashboard = Dashboard::start(db, sync, session, None).await;
            println!("Unseen announcements: {}", dashboard.announcements.unseen_count(user_id));
            println!("Unseen notifications: {}", dashboard.notifications.unseen_count());
            for event in dashboard.calendar.events() {
                println!("{:<12} {:<7} {:<40} {}", event.start, event.color.as_str(), event.title, event.url);
            }
            if config.google_client_id.is_some() {
                match dashboard.calendar.sync_all().await {
                    Ok(report) => println!("Mirrored {} events, {} failed", report.synced.len(), report.failed.len()),
                    Err(AppError::AuthRequired(_)) => {
                        if let Ok(request) = prompt_rx.try_recv() {
                            println!("Authorize Google Calendar at {}", request.consent_url);
                        }
                    }
                    Err(e) => return Err(e),
                }
            }
            dashboard.shutdown().await;
        }
        _ => return Err(AppError::invalid_input(USAGE)),
    }

    Ok(())
}
