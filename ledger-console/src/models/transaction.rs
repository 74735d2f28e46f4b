use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Dr,
    Cr,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dr => "dr",
            Self::Cr => "cr",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dr => "Debit",
            Self::Cr => "Credit",
        }
    }
}

impl std::str::FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dr" => Ok(Self::Dr),
            "cr" => Ok(Self::Cr),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// One side of a double-entry posting, as recorded by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub uuid: String,
    pub account_uuid: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub tx_type: TxType,
    #[serde(default)]
    pub entity_unit_uuid: String,
    pub corresponding_account_uuid: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload of `POST .../create-transaction/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTransaction {
    pub account_uuid: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub tx_type: TxType,
    pub entity_unit_uuid: String,
    pub corresponding_account_uuid: String,
}

/// Count and per-side totals of a set of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSummary {
    pub count: usize,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
}

impl TransactionSummary {
    pub fn of(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut summary, tx| {
                summary.count += 1;
                match tx.tx_type {
                    TxType::Dr => summary.total_debits += tx.amount,
                    TxType::Cr => summary.total_credits += tx.amount,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn tx(amount: i64, tx_type: TxType) -> Transaction {
        Transaction {
            uuid: format!("T{}", amount),
            account_uuid: "A1".into(),
            amount: Decimal::new(amount, 0),
            description: String::new(),
            tx_type,
            entity_unit_uuid: "E1".into(),
            corresponding_account_uuid: "A2".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn summary_splits_debits_and_credits() {
        let summary = TransactionSummary::of(&[
            tx(100, TxType::Dr),
            tx(40, TxType::Cr),
            tx(60, TxType::Dr),
        ]);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_debits, Decimal::new(160, 0));
        assert_eq!(summary.total_credits, Decimal::new(40, 0));
    }

    #[test]
    fn new_transaction_sends_amount_as_number() {
        let body = NewTransaction {
            account_uuid: "A1".into(),
            amount: Decimal::new(10050, 2),
            description: "Rent".into(),
            tx_type: TxType::Dr,
            entity_unit_uuid: "E1".into(),
            corresponding_account_uuid: "A2".into(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["amount"], serde_json::json!(100.5));
        assert_eq!(json["tx_type"], "dr");
    }

    #[test]
    fn parses_api_transaction() {
        let tx: Transaction = serde_json::from_str(
            r#"{
                "uuid": "T1",
                "account_uuid": "A1",
                "amount": "250.00",
                "description": "Office chairs",
                "tx_type": "cr",
                "entity_unit_uuid": "E1",
                "corresponding_account_uuid": "A2",
                "timestamp": "2024-03-05T14:30:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(tx.tx_type, TxType::Cr);
        assert_eq!(tx.amount, Decimal::new(25000, 2));
    }
}
