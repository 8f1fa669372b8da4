//! End-to-end pipeline scenarios through the public API only:
//! in-memory stores, real consumer, real broadcast notifier.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::timeout;

use ledger_core::idempotency::{IdempotencyStore, MemoryIdempotencyStore, OutcomeStatus};
use ledger_core::intent::{
    ConsumerConfig, IntentConsumer, IntentEnvelope, IntentState, TransferIntent, WorkerPool,
    intent_channel,
};
use ledger_core::ledger::{Account, AccountId, LedgerStore, MemoryLedgerStore, TransferExecutor};
use ledger_core::notify::{BroadcastNotifier, NotifyStatus};
use ledger_core::risk::ThresholdScreen;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

struct Harness {
    consumer: Arc<IntentConsumer>,
    ledger: Arc<MemoryLedgerStore>,
    idempotency: Arc<MemoryIdempotencyStore>,
    notifier: Arc<BroadcastNotifier>,
    alice: AccountId,
    bob: AccountId,
}

async fn harness() -> Harness {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let alice = AccountId::new();
    let bob = AccountId::new();
    ledger
        .insert_account(&Account::new(alice, "ACC-10001", "Alice", dec("1000.00"), "USD"))
        .await
        .unwrap();
    ledger
        .insert_account(&Account::new(bob, "ACC-10002", "Bob", dec("500.00"), "USD"))
        .await
        .unwrap();

    let idempotency = Arc::new(MemoryIdempotencyStore::new());
    let notifier = Arc::new(BroadcastNotifier::new(64));
    let consumer = Arc::new(IntentConsumer::new(
        TransferExecutor::new(ledger.clone() as Arc<dyn LedgerStore>),
        idempotency.clone() as Arc<dyn IdempotencyStore>,
        Arc::new(ThresholdScreen::new(dec("1000.00"))),
        notifier.clone(),
        ConsumerConfig::default(),
    ));

    Harness {
        consumer,
        ledger,
        idempotency,
        notifier,
        alice,
        bob,
    }
}

fn envelope(key: &str, from: AccountId, to: AccountId, amount: &str) -> IntentEnvelope {
    serde_json::from_str(&format!(
        r#"{{"key":"{key}","data":{{"fromId":"{from}","toId":"{to}","amount":"{amount}"}}}}"#
    ))
    .unwrap()
}

#[tokio::test]
async fn scenario_mixed_batch_through_worker_pool() {
    let h = harness().await;
    let mut events = h.notifier.subscribe();

    let (sender, receiver) = intent_channel(32);
    let pool = WorkerPool::spawn(h.consumer.clone(), receiver, 4);

    // Four intents: a success, its redelivery, a blocked one, an overdraft.
    let batch = [
        envelope("k-pay", h.alice, h.bob, "100.00"),
        envelope("k-pay", h.alice, h.bob, "100.00"),
        envelope("k-big", h.alice, h.bob, "5000.00"),
        envelope("k-over", h.bob, h.alice, "9999.00"),
    ];
    for e in batch {
        sender.send(e.into()).await.unwrap();
    }
    drop(sender);
    pool.join().await;

    let alice = h.ledger.get_account(h.alice).await.unwrap().unwrap();
    let bob = h.ledger.get_account(h.bob).await.unwrap().unwrap();
    assert_eq!(alice.balance, dec("900.00"));
    assert_eq!(bob.balance, dec("600.00"));

    let pay = h.idempotency.get("k-pay").await.unwrap().unwrap();
    assert_eq!(pay.status, OutcomeStatus::Success);
    assert_eq!(pay.status_code, 200);

    let big = h.idempotency.get("k-big").await.unwrap().unwrap();
    assert_eq!(big.status, OutcomeStatus::BlockedByRisk);
    assert_eq!(big.status_code, 403);

    let over = h.idempotency.get("k-over").await.unwrap().unwrap();
    assert_eq!(over.status, OutcomeStatus::InsufficientFunds);
    assert_eq!(over.status_code, 422);

    // Three distinct keys resolved, the redelivery resolved nothing new
    assert_eq!(h.idempotency.resolved_count(), 3);

    // Notifications land for each resolved intent. The redelivery of
    // k-pay either drops (in flight) or replays the recorded outcome
    // without a balance; the first resolution always carries one.
    let mut success_balances = Vec::new();
    while let Ok(Ok(update)) = timeout(Duration::from_millis(200), events.recv()).await {
        if update.status == NotifyStatus::Success {
            success_balances.push(update.new_balance);
        }
    }
    assert!(success_balances.contains(&Some(dec("900.00"))));
    for balance in &success_balances {
        assert!(matches!(balance, Some(b) if *b == dec("900.00")) || balance.is_none());
    }
}

#[tokio::test]
async fn scenario_replay_returns_original_outcome() {
    let h = harness().await;

    let intent: TransferIntent = envelope("k-once", h.alice, h.bob, "250.00").into();
    assert_eq!(h.consumer.process(&intent).await.unwrap(), IntentState::Succeeded);

    // Same key, tampered amount: no second movement, original record wins.
    let tampered: TransferIntent = envelope("k-once", h.alice, h.bob, "999.00").into();
    assert_eq!(h.consumer.process(&tampered).await.unwrap(), IntentState::Duplicate);

    let alice = h.ledger.get_account(h.alice).await.unwrap().unwrap();
    assert_eq!(alice.balance, dec("750.00"));
    assert_eq!(h.ledger.transaction_count(), 1);

    let record = h.idempotency.get("k-once").await.unwrap().unwrap();
    assert_eq!(record.amount, dec("250.00"));
}

#[tokio::test]
async fn scenario_contended_account_stays_consistent() {
    let h = harness().await;

    let (sender, receiver) = intent_channel(64);
    let pool = WorkerPool::spawn(h.consumer.clone(), receiver, 8);

    // 20 distinct 10.00 debits against the same source account.
    for i in 0..20 {
        sender
            .send(envelope(&format!("k-{i}"), h.alice, h.bob, "10.00").into())
            .await
            .unwrap();
    }
    drop(sender);
    pool.join().await;

    let alice = h.ledger.get_account(h.alice).await.unwrap().unwrap();
    let bob = h.ledger.get_account(h.bob).await.unwrap().unwrap();

    // Conservation holds no matter how many retries were needed.
    assert_eq!(alice.balance + bob.balance, dec("1500.00"));

    let mut succeeded = 0;
    for i in 0..20 {
        let record = h.idempotency.get(&format!("k-{i}")).await.unwrap().unwrap();
        if record.status == OutcomeStatus::Success {
            succeeded += 1;
        }
    }
    let moved = dec("10.00") * Decimal::from(succeeded);
    assert_eq!(alice.balance, dec("1000.00") - moved);
    assert_eq!(bob.balance, dec("500.00") + moved);
}
