//! Transfer intent wire types
//!
//! Intents arrive from the queue as JSON envelopes:
//! `{ "key": "...", "data": { "fromId": "...", "toId": "...", "amount": "..." } }`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountId;

/// Queue envelope as delivered by the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentEnvelope {
    pub key: String,
    pub data: IntentData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentData {
    pub from_id: AccountId,
    pub to_id: AccountId,
    pub amount: Decimal,
}

/// One unit of work: a transfer intent keyed by the caller's
/// idempotency key. Ephemeral, exists only in transit.
#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub key: String,
    pub from_id: AccountId,
    pub to_id: AccountId,
    pub amount: Decimal,
}

impl From<IntentEnvelope> for TransferIntent {
    fn from(envelope: IntentEnvelope) -> Self {
        Self {
            key: envelope.key,
            from_id: envelope.data.from_id,
            to_id: envelope.data.to_id,
            amount: envelope.data.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_wire_shape() {
        let json = r#"{
            "key": "K1",
            "data": {
                "fromId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "toId": "9b2d9fae-8c8f-4a2e-9a0e-6a4b8a1f0d2c",
                "amount": "500.00"
            }
        }"#;

        let envelope: IntentEnvelope = serde_json::from_str(json).unwrap();
        let intent = TransferIntent::from(envelope);
        assert_eq!(intent.key, "K1");
        assert_eq!(intent.amount, "500.00".parse::<Decimal>().unwrap());
        assert_ne!(intent.from_id, intent.to_id);
    }

    #[test]
    fn test_envelope_roundtrip_preserves_amount_string() {
        let envelope = IntentEnvelope {
            key: "K9".into(),
            data: IntentData {
                from_id: AccountId::new(),
                to_id: AccountId::new(),
                amount: "12.34".parse().unwrap(),
            },
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"]["amount"], "12.34");
        assert!(json["data"]["fromId"].is_string());
    }
}
