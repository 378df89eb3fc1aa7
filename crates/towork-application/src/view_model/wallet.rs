use super::record;
use crate::AppContext;
use std::sync::Arc;
use towork_core::auth::Role;
use towork_core::session::SessionStore;
use towork_core::wallet::{
    PaymentTransaction, RechargeRequest, WalletSnapshot, WalletTransaction, format_money,
};
use towork_core::{Result, ToworkError};
use towork_interaction::api::{PaymentApi, WalletApi};
use tracing::info;

/// The logged-in user's wallet and payment history.
///
/// Balances are only ever read from the backend.
pub struct WalletViewModel {
    wallet_api: WalletApi,
    payments_api: PaymentApi,
    session: Arc<SessionStore>,
    pub wallet: WalletSnapshot,
    pub payments: Vec<PaymentTransaction>,
    pub loading: bool,
    pub error: Option<String>,
}

impl WalletViewModel {
    pub fn new(wallet_api: WalletApi, payments_api: PaymentApi, session: Arc<SessionStore>) -> Self {
        Self {
            wallet_api,
            payments_api,
            session,
            wallet: WalletSnapshot::default(),
            payments: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(
            context.api().wallet.clone(),
            context.api().payments.clone(),
            context.session().clone(),
        )
    }

    /// Fetches the wallet and the payment ledger concurrently.
    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.fetch().await;
        self.loading = false;
        let (wallet, payments) = record(&mut self.error, result, "Impossible de charger le portefeuille")?;
        self.wallet = wallet;
        self.payments = payments;
        Ok(())
    }

    async fn fetch(&self) -> Result<(WalletSnapshot, Vec<PaymentTransaction>)> {
        let state = self.session.snapshot();
        let user_id = state.user_id().ok_or(ToworkError::NotAuthenticated)?;
        let role = state.role.ok_or(ToworkError::NotAuthenticated)?;

        let payments = async {
            match role {
                Role::Freelancer => self.payments_api.freelancer_transactions(user_id).await,
                _ => self.payments_api.client_transactions(user_id).await,
            }
        };
        tokio::try_join!(self.wallet_api.my_wallet(&role), payments)
    }

    /// Tops up the client wallet. Amounts below 1 never reach the backend.
    pub async fn recharge(&mut self, amount: f64) -> Result<()> {
        let request = RechargeRequest { amount };
        let result = match request.validate() {
            Ok(()) => self.wallet_api.recharge(&request).await,
            Err(err) => Err(err),
        };
        self.wallet = record(&mut self.error, result, "Recharge impossible")?;
        info!(amount, "Wallet recharged");
        Ok(())
    }

    pub fn balance(&self) -> f64 {
        self.wallet.balance
    }

    pub fn currency(&self) -> &str {
        &self.wallet.currency
    }

    pub fn formatted_balance(&self) -> String {
        format_money(self.wallet.balance, &self.wallet.currency)
    }

    pub fn debits(&self) -> Vec<&WalletTransaction> {
        self.wallet.debits().collect()
    }

    pub fn total_debited(&self) -> f64 {
        self.wallet.debits().map(|tx| tx.amount.abs()).sum()
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format_money(amount, &self.wallet.currency)
    }
}
