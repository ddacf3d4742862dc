use serde::{Deserialize, Serialize};

mod amount;

pub use amount::{Amount, AmountParseError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub username: String,
        pub password: String,
        pub balance: Amount,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RegisterResponse {
        pub id: i64,
        pub username: String,
    }

    /// Identity persisted locally between login and logout.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SessionUser {
        pub username: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: i64,
        /// Server-side enum name, e.g. `FOOD_AND_BEVERAGES`.
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryType,
    }
}

pub mod transaction {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::category::Category;

    /// Owner of a transaction as embedded by the service.
    ///
    /// Only the stable identity fields are read; the rest of the nested user
    /// record is ignored.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserRef {
        pub id: i64,
        pub username: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: i64,
        pub user: Option<UserRef>,
        pub category: Category,
        pub name: String,
        pub amount: Amount,
        pub datetime: NaiveDateTime,
        pub payment_mode: Option<String>,
        pub note: Option<String>,
    }

    /// Response of the transaction list call. Totals are computed by the
    /// service over the filtered set.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct TransactionPage {
        pub username: String,
        pub transactions_count: u64,
        pub total_income: Amount,
        pub total_expense: Amount,
        pub total_delta: Amount,
        pub transactions: Vec<Transaction>,
    }

    /// The complete set of optional constraints of a list request.
    ///
    /// Unset fields are not sent; the service applies its own defaults.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionFilters {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub from: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub to: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_type: Option<CategoryType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub payment_mode: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub min_amount: Option<Amount>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub max_amount: Option<Amount>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionRequest {
        pub category_name: String,
        pub name: String,
        pub amount: Amount,
        pub payment_mode: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
    }
}

pub mod recurring {
    use chrono::NaiveDate;

    use super::*;
    use crate::{category::Category, transaction::UserRef};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum Frequency {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    impl Frequency {
        pub const ALL: [Frequency; 4] = [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ];

        pub fn label(self) -> &'static str {
            match self {
                Self::Daily => "Daily",
                Self::Weekly => "Weekly",
                Self::Monthly => "Monthly",
                Self::Yearly => "Yearly",
            }
        }
    }

    /// Recurring transaction as returned by the service, with nested owner
    /// and category records.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RawRecurringTransaction {
        pub id: i64,
        pub user: Option<UserRef>,
        pub category: Option<Category>,
        pub name: String,
        pub amount: Amount,
        pub frequency: Frequency,
        pub next_run_date: Option<NaiveDate>,
    }

    /// Flat view shape of a recurring transaction.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecurringTransaction {
        pub id: i64,
        pub user_id: Option<i64>,
        pub category_name: Option<String>,
        pub category_type: Option<CategoryType>,
        pub name: String,
        pub amount: Amount,
        pub frequency: Frequency,
        pub next_run_date: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecurringRequest {
        pub category_name: String,
        pub name: String,
        pub amount: Amount,
        pub frequency: Frequency,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub next_run_date: Option<NaiveDate>,
    }
}

pub mod dashboard {
    use chrono::NaiveDate;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseCategoryStat {
        pub category: String,
        pub total_amount: Amount,
        #[serde(default)]
        pub transaction_count: u64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct DashboardResponse {
        pub username: String,
        pub from_date: Option<NaiveDate>,
        pub to_date: Option<NaiveDate>,
        pub total_income: Amount,
        pub total_expense: Amount,
        /// Income minus expense over the range. Older service builds call
        /// this field `balance`.
        #[serde(alias = "balance")]
        pub total_delta: Amount,
        pub transactions_count: u64,
        pub total_salary_income: Amount,
        pub total_other_income: Amount,
        pub income_transactions_count: u64,
        pub expense_transactions_count: u64,
        pub expense_breakdown: Vec<ExpenseCategoryStat>,
    }

    /// One bar of the expense chart.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ChartSlice {
        pub name: String,
        pub value: Amount,
        pub transaction_count: u64,
    }

    /// Dashboard view model, reshaped for chart consumption.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct DashboardStats {
        pub username: String,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub total_income: Amount,
        pub total_expense: Amount,
        pub total_delta: Amount,
        pub transactions_count: u64,
        pub total_salary_income: Amount,
        pub total_other_income: Amount,
        pub income_transactions_count: u64,
        pub expense_transactions_count: u64,
        pub breakdown: Vec<ChartSlice>,
    }
}

pub mod user {
    use chrono::NaiveDateTime;

    use super::*;

    /// User profile.
    ///
    /// The service has shipped two shapes (`email` vs `balance`/`createdAt`);
    /// every non-identity field is optional so either one decodes.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Profile {
        pub id: i64,
        pub username: String,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub balance: Option<Amount>,
        #[serde(default)]
        pub created_at: Option<NaiveDateTime>,
    }
}
