use api_types::recurring::{RawRecurringTransaction, RecurringRequest, RecurringTransaction};

use crate::{error::Result, gateway::Gateway, validation::validate_recurring};

pub struct RecurringApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> RecurringApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<RecurringTransaction>> {
        let raw: Vec<RawRecurringTransaction> = self.gateway.get("recurring").await?;
        Ok(raw.into_iter().map(flatten).collect())
    }

    pub async fn create(&self, req: &RecurringRequest) -> Result<RecurringTransaction> {
        validate_recurring(req).into_result()?;
        let raw: RawRecurringTransaction = self.gateway.post("recurring/new", req).await?;
        Ok(flatten(raw))
    }

    pub async fn update(&self, id: i64, req: &RecurringRequest) -> Result<RecurringTransaction> {
        validate_recurring(req).into_result()?;
        let raw: RawRecurringTransaction = self
            .gateway
            .put(&format!("recurring/update/{id}"), req)
            .await?;
        Ok(flatten(raw))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway.delete(&format!("recurring/delete/{id}")).await
    }
}

/// Lifts the nested owner and category records into flat fields.
pub fn flatten(raw: RawRecurringTransaction) -> RecurringTransaction {
    let (category_name, category_type) = match raw.category {
        Some(category) => (Some(category.name), Some(category.kind)),
        None => (None, None),
    };

    RecurringTransaction {
        id: raw.id,
        user_id: raw.user.map(|user| user.id),
        category_name,
        category_type,
        name: raw.name,
        amount: raw.amount,
        frequency: raw.frequency,
        next_run_date: raw.next_run_date,
    }
}
