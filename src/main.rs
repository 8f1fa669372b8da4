//! ledgerd - demo runner for the transfer processing core
//!
//! Wires the pipeline against Postgres (when configured) or in-memory
//! stores, seeds two demo accounts, reads intent envelopes as JSON
//! lines from stdin and prints outcome notifications to stdout. The
//! queue transport in production deployments replaces this loop.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use ledger_core::config::AppConfig;
use ledger_core::idempotency::{
    IdempotencyStore, MemoryIdempotencyStore, PgIdempotencyStore, init_idempotency_schema,
};
use ledger_core::intent::{ConsumerConfig, IntentConsumer, IntentEnvelope, WorkerPool, intent_channel};
use ledger_core::ledger::{
    Account, AccountId, LedgerStore, MemoryLedgerStore, PgLedgerStore, TransferExecutor,
    init_ledger_schema,
};
use ledger_core::logging::init_logging;
use ledger_core::notify::BroadcastNotifier;
use ledger_core::risk::ThresholdScreen;

#[tokio::main]
async fn main() -> Result<()> {
    let env = std::env::var("LEDGER_ENV").unwrap_or_else(|_| "default".to_string());
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        "Starting ledgerd"
    );

    let (ledger, idempotency): (Arc<dyn LedgerStore>, Arc<dyn IdempotencyStore>) =
        match &config.postgres_url {
            Some(url) => {
                // statement_timeout bounds every store query, so a stuck
                // commit cannot hold a worker forever
                let connect_opts = url
                    .parse::<sqlx::postgres::PgConnectOptions>()
                    .context("parsing postgres_url")?
                    .options([(
                        "statement_timeout",
                        config.statement_timeout_ms.to_string(),
                    )]);
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .acquire_timeout(Duration::from_secs(5))
                    .connect_with(connect_opts)
                    .await
                    .context("connecting to PostgreSQL")?;
                init_ledger_schema(&pool).await?;
                init_idempotency_schema(&pool).await?;
                info!("PostgreSQL stores ready");
                (
                    Arc::new(PgLedgerStore::new(pool.clone())),
                    Arc::new(PgIdempotencyStore::new(pool)),
                )
            }
            None => {
                warn!("No postgres_url configured - using in-memory stores (demo only)");
                (
                    Arc::new(MemoryLedgerStore::new()),
                    Arc::new(MemoryIdempotencyStore::new()),
                )
            }
        };

    seed_demo_accounts(ledger.as_ref()).await?;

    let notifier = Arc::new(BroadcastNotifier::new(256));
    spawn_stdout_printer(&notifier);

    let consumer = Arc::new(IntentConsumer::new(
        TransferExecutor::new(ledger),
        idempotency,
        Arc::new(ThresholdScreen::new(config.risk.fraud_threshold)),
        notifier,
        ConsumerConfig {
            max_conflict_retries: config.retry.max_conflict_retries,
            backoff_base: Duration::from_millis(config.retry.backoff_base_ms),
            risk_timeout: Duration::from_millis(config.risk.timeout_ms),
            reservation_stale_after: Duration::from_secs(config.pipeline.reservation_stale_secs),
        },
    ));

    let (sender, receiver) = intent_channel(config.pipeline.queue_size);
    let pool = WorkerPool::spawn(consumer, receiver, config.pipeline.workers);

    info!(workers = config.pipeline.workers, "Reading intent envelopes from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<IntentEnvelope>(&line) {
            Ok(envelope) => {
                if sender.send(envelope.into()).await.is_err() {
                    error!("Intent channel closed - stopping ingest");
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Dropping malformed intent envelope"),
        }
    }

    drop(sender);
    pool.join().await;
    info!("All workers drained - shutting down");
    Ok(())
}

/// Seed two demo accounts with fixed ids so stdin intents can reference
/// them across restarts. No-op when they already exist.
async fn seed_demo_accounts(ledger: &dyn LedgerStore) -> Result<()> {
    let seeds = [
        (
            "11111111-1111-1111-1111-111111111111",
            "ACC-10001",
            "Alice Demo",
            "1000.00",
        ),
        (
            "22222222-2222-2222-2222-222222222222",
            "ACC-10002",
            "Bob Demo",
            "500.00",
        ),
    ];

    for (id, number, owner, balance) in seeds {
        let account_id = AccountId::from_str(id).expect("static uuid");
        if ledger.get_account(account_id).await?.is_none() {
            let balance: Decimal = balance.parse().expect("static decimal");
            ledger
                .insert_account(&Account::new(account_id, number, owner, balance, "USD"))
                .await?;
            info!(account = number, %account_id, %balance, "Seeded demo account");
        }
    }
    Ok(())
}

fn spawn_stdout_printer(notifier: &BroadcastNotifier) {
    let mut events = notifier.subscribe();
    tokio::spawn(async move {
        while let Ok(update) = events.recv().await {
            match serde_json::to_string(&update) {
                Ok(json) => println!("{json}"),
                Err(e) => error!(error = %e, "Failed to serialize outcome update"),
            }
        }
    });
}
