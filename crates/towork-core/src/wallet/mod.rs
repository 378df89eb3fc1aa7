//! Wallet, ledger and earnings.

mod model;

pub use model::{
    DEFAULT_CURRENCY, PaidMilestone, PaymentTransaction, PaymentWallet, Portfolio,
    RechargeRequest, TransactionType, WalletSnapshot, WalletTransaction, format_money,
    group_thousands,
};
