use crate::error::Result;
use crate::lenient::{pick, pick_f64, pick_i64, pick_str};
use crate::status::{StatusLabel, Tone};
use crate::validation::{Validate, check, finite};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{EnumIter, EnumString};

pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Credit,
    Debit,
    Recharge,
    Payment,
    Payout,
    Withdrawal,
    #[strum(default)]
    Unknown(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Recharge => "RECHARGE",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Payout => "PAYOUT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Unknown(raw) => raw,
        }
    }

    /// Money leaving the wallet.
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionType::Debit | TransactionType::Payment)
    }
}

impl From<String> for TransactionType {
    fn from(raw: String) -> Self {
        raw.trim()
            .parse()
            .unwrap_or(TransactionType::Unknown(raw))
    }
}

impl From<TransactionType> for String {
    fn from(kind: TransactionType) -> Self {
        kind.as_str().to_string()
    }
}

impl StatusLabel for TransactionType {
    fn code(&self) -> &str {
        self.as_str()
    }

    fn label(&self) -> &'static str {
        match self {
            TransactionType::Credit => "Crédit",
            TransactionType::Debit => "Débit",
            TransactionType::Recharge => "Recharge",
            TransactionType::Payment => "Paiement",
            TransactionType::Payout => "Versement",
            TransactionType::Withdrawal => "Retrait",
            TransactionType::Unknown(_) => "Opération",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            TransactionType::Recharge | TransactionType::Credit => Tone::Primary,
            TransactionType::Payment | TransactionType::Debit => Tone::Accent,
            _ => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub currency: String,
    pub mission_title: Option<String>,
    pub milestone_title: Option<String>,
    pub created_at: Option<String>,
}

impl WalletTransaction {
    /// Reads one ledger line, accepting the backend's alternate key names.
    /// Lines without an id are discarded.
    pub fn from_value(raw: &Value) -> Option<Self> {
        Some(Self {
            id: pick_i64(raw, &["id", "transactionId"])?,
            kind: pick_str(raw, &["type", "transactionType"])
                .map(TransactionType::from)
                .unwrap_or(TransactionType::Payment),
            amount: pick_f64(raw, &["amount", "montant"]).unwrap_or(0.0),
            currency: pick_str(raw, &["currency", "devise"])
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            mission_title: pick_str(raw, &["missionTitle", "missionName", "mission.title"]),
            milestone_title: pick_str(raw, &["milestoneTitle", "milestone.title"]),
            created_at: pick_str(raw, &["createdAt", "date", "timestamp"]),
        })
    }
}

/// Read-only mirror of a party's wallet. All balance changes come from the
/// server; the client never computes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub id: Option<i64>,
    pub balance: f64,
    pub currency: String,
    pub transactions: Vec<WalletTransaction>,
}

impl Default for WalletSnapshot {
    fn default() -> Self {
        Self {
            id: None,
            balance: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            transactions: Vec::new(),
        }
    }
}

impl WalletSnapshot {
    /// Maps the `data` of a wallet endpoint.
    ///
    /// The wallet may be nested under `wallet`; French key names (`solde`,
    /// `devise`) are accepted; transactions are read from the wallet, then
    /// from the payload, then from the payload itself when it is an array.
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let Some(payload) = payload else {
            return Self::default();
        };
        let wallet = pick(payload, &["wallet"]).unwrap_or(payload);

        let transactions = pick(wallet, &["transactions"])
            .or_else(|| pick(payload, &["transactions"]))
            .unwrap_or(payload)
            .as_array()
            .map(|items| items.iter().filter_map(WalletTransaction::from_value).collect())
            .unwrap_or_default();

        Self {
            id: pick_i64(wallet, &["id", "walletId"]).or_else(|| pick_i64(payload, &["walletId"])),
            balance: pick_f64(wallet, &["balance", "solde"]).unwrap_or(0.0),
            currency: pick_str(wallet, &["currency", "devise"])
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            transactions,
        }
    }

    pub fn debits(&self) -> impl Iterator<Item = &WalletTransaction> {
        self.transactions.iter().filter(|tx| tx.kind.is_debit())
    }
}

/// `/payments/wallets/...` shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentWallet {
    pub id: Option<i64>,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

/// `/payments/transactions/...` shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentTransaction {
    pub id: Option<i64>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaidMilestone {
    pub milestone_id: i64,
    pub mission_title: Option<String>,
    pub milestone_title: Option<String>,
    pub amount: Option<f64>,
    pub paid_at: Option<String>,
}

/// Freelancer earnings summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Portfolio {
    pub total_amount_earned: f64,
    pub paid_milestones: Vec<PaidMilestone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct RechargeRequest {
    #[validate(
        range(min = 1.0, message = "Le montant doit être d'au moins 1 €."),
        custom(function = "finite")
    )]
    pub amount: f64,
}

impl RechargeRequest {
    pub fn validate(&self) -> Result<()> {
        check(self)
    }
}

/// `1234.5` → `1 234,50 €` (fr-FR grouping, two decimals).
pub fn format_money(amount: f64, currency: &str) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = group_thousands(cents / 100);
    let symbol = match currency {
        "EUR" => "€",
        "USD" => "$",
        other => other,
    };
    format!(
        "{}{},{:02} {}",
        if negative { "-" } else { "" },
        units,
        cents % 100,
        symbol
    )
}

/// Thousands separated by a narrow no-break space, as fr-FR does.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_wallet_with_french_keys() {
        let payload = json!({
            "wallet": {"walletId": 3, "solde": "250.5", "devise": "EUR"},
            "transactions": [
                {"transactionId": 1, "transactionType": "RECHARGE", "montant": 100},
                {"id": 2, "amount": 40, "mission": {"title": "Logo"}},
                {"amount": 10}
            ]
        });
        let wallet = WalletSnapshot::from_payload(Some(&payload));
        assert_eq!(wallet.id, Some(3));
        assert_eq!(wallet.balance, 250.5);
        assert_eq!(wallet.transactions.len(), 2);
        assert_eq!(wallet.transactions[0].kind, TransactionType::Recharge);
        assert_eq!(wallet.transactions[1].kind, TransactionType::Payment);
        assert_eq!(wallet.transactions[1].mission_title.as_deref(), Some("Logo"));
        assert_eq!(wallet.debits().count(), 1);
    }

    #[test]
    fn empty_payload_defaults() {
        let wallet = WalletSnapshot::from_payload(None);
        assert_eq!(wallet.balance, 0.0);
        assert_eq!(wallet.currency, "EUR");
        let wallet = WalletSnapshot::from_payload(Some(&json!({})));
        assert!(wallet.transactions.is_empty());
    }

    #[test]
    fn recharge_requires_positive_amount() {
        assert!(RechargeRequest { amount: 0.0 }.validate().is_err());
        assert!(RechargeRequest { amount: 50.0 }.validate().is_ok());
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(1234.5, "EUR"), "1\u{202f}234,50 €");
        assert_eq!(format_money(-5.0, "EUR"), "-5,00 €");
        assert_eq!(format_money(0.0, "CHF"), "0,00 CHF");
    }
}
