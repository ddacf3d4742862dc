use api_types::dashboard::{ChartSlice, DashboardResponse, DashboardStats, ExpenseCategoryStat};
use chrono::NaiveDate;
use serde::Serialize;

use crate::{error::Result, gateway::Gateway};

#[derive(Debug, Serialize)]
struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<NaiveDate>,
}

pub struct DashboardApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Statistics over `[from, to]`. Missing bounds are filled in by the
    /// service, which echoes the range it actually used.
    pub async fn stats(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<DashboardStats> {
        let res: DashboardResponse = self
            .gateway
            .get_with_query("dashboard", &DateRange { from, to })
            .await?;
        Ok(into_stats(res))
    }
}

pub fn into_slice(stat: ExpenseCategoryStat) -> ChartSlice {
    ChartSlice {
        name: stat.category,
        value: stat.total_amount,
        transaction_count: stat.transaction_count,
    }
}

/// Reshapes the wire response for display. Totals are taken as given.
pub fn into_stats(res: DashboardResponse) -> DashboardStats {
    DashboardStats {
        username: res.username,
        from: res.from_date,
        to: res.to_date,
        total_income: res.total_income,
        total_expense: res.total_expense,
        total_delta: res.total_delta,
        transactions_count: res.transactions_count,
        total_salary_income: res.total_salary_income,
        total_other_income: res.total_other_income,
        income_transactions_count: res.income_transactions_count,
        expense_transactions_count: res.expense_transactions_count,
        breakdown: res.expense_breakdown.into_iter().map(into_slice).collect(),
    }
}
