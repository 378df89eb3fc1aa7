use crate::client::ApiClient;
use towork_core::Result;
use towork_core::auth::Role;
use towork_core::wallet::{PaymentTransaction, PaymentWallet, Portfolio, RechargeRequest, WalletSnapshot};

const WALLET_FAILED: &str = "Impossible de charger le portefeuille";

/// Wallet of the logged-in user. Payloads are mapped leniently.
#[derive(Clone)]
pub struct WalletApi {
    client: ApiClient,
}

impl WalletApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn snapshot(&self, path: &str) -> Result<WalletSnapshot> {
        let payload = self
            .client
            .fetch_value(self.client.get(path), WALLET_FAILED)
            .await?;
        Ok(WalletSnapshot::from_payload(payload.as_ref()))
    }

    pub async fn client_wallet(&self) -> Result<WalletSnapshot> {
        self.snapshot("/api/client/wallet/me").await
    }

    pub async fn freelancer_wallet(&self) -> Result<WalletSnapshot> {
        self.snapshot("/api/freelancer/wallet/me").await
    }

    /// Freelancers get their own wallet; everyone else the client one.
    pub async fn my_wallet(&self, role: &Role) -> Result<WalletSnapshot> {
        if role.is_freelancer() {
            self.freelancer_wallet().await
        } else {
            self.client_wallet().await
        }
    }

    pub async fn recharge(&self, request: &RechargeRequest) -> Result<WalletSnapshot> {
        let call = self.client.post("/wallet/recharge").json(request)?;
        let payload = self
            .client
            .fetch_value(call, "Impossible de recharger le portefeuille")
            .await?;
        Ok(WalletSnapshot::from_payload(payload.as_ref()))
    }
}

/// `/payments` read endpoints, keyed by user id.
#[derive(Clone)]
pub struct PaymentApi {
    client: ApiClient,
}

impl PaymentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn client_wallet(&self, client_id: i64) -> Result<PaymentWallet> {
        let call = self
            .client
            .get(&format!("/payments/wallets/client/{client_id}"));
        self.client.fetch(call, WALLET_FAILED).await
    }

    pub async fn freelancer_wallet(&self, freelancer_id: i64) -> Result<PaymentWallet> {
        let call = self
            .client
            .get(&format!("/payments/wallets/freelancer/{freelancer_id}"));
        self.client.fetch(call, WALLET_FAILED).await
    }

    pub async fn client_transactions(&self, client_id: i64) -> Result<Vec<PaymentTransaction>> {
        let call = self
            .client
            .get(&format!("/payments/transactions/client/{client_id}"));
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les transactions")
            .await?
            .unwrap_or_default())
    }

    pub async fn freelancer_transactions(
        &self,
        freelancer_id: i64,
    ) -> Result<Vec<PaymentTransaction>> {
        let call = self
            .client
            .get(&format!("/payments/transactions/freelancer/{freelancer_id}"));
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les transactions")
            .await?
            .unwrap_or_default())
    }
}

#[derive(Clone)]
pub struct PortfolioApi {
    client: ApiClient,
}

impl PortfolioApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Earnings of the logged-in freelancer.
    pub async fn portfolio(&self) -> Result<Portfolio> {
        Ok(self
            .client
            .fetch_optional(
                self.client.get("/api/freelancer/portfolio"),
                "Impossible de charger le portfolio",
            )
            .await?
            .unwrap_or_default())
    }
}
