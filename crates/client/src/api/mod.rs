//! One namespace per backend resource.

use std::time::Duration;

use crate::{error::Result, gateway::Gateway, session::SessionStore};

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod recurring;
pub mod transactions;
pub mod user;

pub use auth::AuthApi;
pub use categories::CategoriesApi;
pub use dashboard::DashboardApi;
pub use recurring::RecurringApi;
pub use transactions::TransactionsApi;
pub use user::UserApi;

/// Entry point to every resource client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Api {
    gateway: Gateway,
}

impl Api {
    pub fn new(base_url: &str, timeout: Duration, session: SessionStore) -> Result<Self> {
        Ok(Self {
            gateway: Gateway::new(base_url, timeout, session)?,
        })
    }

    pub fn from_gateway(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &SessionStore {
        self.gateway.session()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.gateway)
    }

    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi::new(&self.gateway)
    }

    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(&self.gateway)
    }

    pub fn transactions(&self) -> TransactionsApi<'_> {
        TransactionsApi::new(&self.gateway)
    }

    pub fn recurring(&self) -> RecurringApi<'_> {
        RecurringApi::new(&self.gateway)
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(&self.gateway)
    }
}
