use super::record;
use crate::AppContext;
use towork_core::Result;
use towork_core::wallet::{DEFAULT_CURRENCY, PaidMilestone, Portfolio, format_money};
use towork_interaction::api::PortfolioApi;

/// Freelancer earnings: total and the milestones already paid.
pub struct PortfolioViewModel {
    api: PortfolioApi,
    pub portfolio: Portfolio,
    pub loading: bool,
    pub error: Option<String>,
}

impl PortfolioViewModel {
    pub fn new(api: PortfolioApi) -> Self {
        Self {
            api,
            portfolio: Portfolio::default(),
            loading: false,
            error: None,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(context.api().portfolio.clone())
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.api.portfolio().await;
        self.loading = false;
        let mut portfolio = record(&mut self.error, result, "Impossible de charger le portfolio")?;
        portfolio
            .paid_milestones
            .sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        self.portfolio = portfolio;
        Ok(())
    }

    pub fn total_earned(&self) -> String {
        format_money(self.portfolio.total_amount_earned, DEFAULT_CURRENCY)
    }

    /// Paid milestones, most recent first.
    pub fn paid(&self) -> &[PaidMilestone] {
        &self.portfolio.paid_milestones
    }

    pub fn format_amount(milestone: &PaidMilestone) -> String {
        format_money(milestone.amount.unwrap_or(0.0), DEFAULT_CURRENCY)
    }
}
