//! Covenant API Server
//!
//! Main entry point for the Covenant backend service.

mod scheduler;

use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use covenant_adapters::{
    FcmPushSender, HttpDocumentFetcher, PdfExtractor, VisionOcrClient, build_http_client,
};
use covenant_api::{AppState, create_router};
use covenant_core::cleanup::ReceiptCleanup;
use covenant_core::notification::{MedicationReminder, StudyAnnouncer};
use covenant_core::receipt::ReceiptValidator;
use covenant_core::storage::{ReceiptStorage, StorageConfig};
use covenant_db::{EncounterRepository, FinancialRecordRepository, SubscriberRepository, connect};
use covenant_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "covenant=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    let timezone: Tz = config
        .schedule
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid schedule timezone {}: {e}", config.schedule.timezone))?;
    anyhow::ensure!(
        config.schedule.cleanup_hour < 24,
        "schedule.cleanup_hour must be between 0 and 23"
    );

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Outbound collaborators
    let http = build_http_client(&config.http)?;
    let records = Arc::new(FinancialRecordRepository::new(db.clone()));
    let push = Arc::new(FcmPushSender::new(http.clone(), &config.push));

    let validator = ReceiptValidator::new(
        Arc::new(HttpDocumentFetcher::new(http.clone())),
        Arc::new(PdfExtractor::new()),
        Arc::new(VisionOcrClient::new(http, &config.ocr)),
        records.clone(),
        config.validator.cnpj,
    );
    info!(cnpj = %config.validator.cnpj.formatted(), "Receipt validator configured");

    let announcer = StudyAnnouncer::new(Arc::new(SubscriberRepository::new(db.clone())), push.clone());
    let reminder = MedicationReminder::new(Arc::new(EncounterRepository::new(db)), push, timezone);

    // Create receipt storage (optional)
    let cleanup = match config.storage.clone() {
        Some(provider) => {
            let storage = ReceiptStorage::from_config(StorageConfig::new(provider))?;
            info!(provider = storage.provider_name(), "Receipt storage configured");
            Some(Arc::new(ReceiptCleanup::new(records, Arc::new(storage))))
        }
        None => {
            warn!("Receipt storage not configured - receipt cleanup disabled");
            None
        }
    };

    // Create application state
    let state = AppState {
        validator: Arc::new(validator),
        announcer: Arc::new(announcer),
        reminder: Arc::new(reminder),
        cleanup,
    };

    if config.schedule.enabled {
        scheduler::spawn(&state, &config.schedule, timezone);
    } else {
        info!("Background jobs disabled");
    }

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
