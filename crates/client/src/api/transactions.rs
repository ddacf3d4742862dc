use api_types::transaction::{
    Transaction, TransactionFilters, TransactionPage, TransactionRequest,
};

use crate::{error::Result, gateway::Gateway, validation::validate_transaction};

pub struct TransactionsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> TransactionsApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Lists transactions matching `filters`. All filtering happens on the
    /// server.
    pub async fn list(&self, filters: &TransactionFilters) -> Result<TransactionPage> {
        self.gateway.get_with_query("transaction", filters).await
    }

    pub async fn create(&self, req: &TransactionRequest) -> Result<Transaction> {
        validate_transaction(req).into_result()?;
        self.gateway.post("transaction/new", req).await
    }

    pub async fn update(&self, id: i64, req: &TransactionRequest) -> Result<Transaction> {
        validate_transaction(req).into_result()?;
        self.gateway
            .put(&format!("transaction/update/{id}"), req)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway
            .delete(&format!("transaction/delete/{id}"))
            .await
    }
}
