//! Intent delivery channel
//!
//! In-process stand-in for the queue transport: an mpsc pair carrying
//! `TransferIntent`s from the ingress side to the worker pool.

use thiserror::Error;
use tokio::sync::mpsc;

use super::types::TransferIntent;

#[derive(Error, Debug)]
#[error("Intent channel closed")]
pub struct ChannelClosed;

/// Sender side (held by the transport/ingress layer)
#[derive(Clone)]
pub struct IntentSender {
    tx: mpsc::Sender<TransferIntent>,
}

impl IntentSender {
    pub async fn send(&self, intent: TransferIntent) -> Result<(), ChannelClosed> {
        self.tx.send(intent).await.map_err(|_| ChannelClosed)
    }
}

/// Receiver side (shared by the worker pool)
pub struct IntentReceiver {
    rx: mpsc::Receiver<TransferIntent>,
}

impl IntentReceiver {
    /// Receive the next intent; `None` once all senders are dropped
    pub async fn recv(&mut self) -> Option<TransferIntent> {
        self.rx.recv().await
    }
}

/// Create a bounded intent channel pair
pub fn intent_channel(buffer: usize) -> (IntentSender, IntentReceiver) {
    let (tx, rx) = mpsc::channel(buffer);
    (IntentSender { tx }, IntentReceiver { rx })
}
