//! Text forms behind the auth screens and the modal dialogs.
//!
//! A [`Form`] only holds raw input. Conversion into request types happens in
//! the `*_request` functions, which parse numbers and dates and then run the
//! same checks the client runs before submitting.

use api_types::{
    Amount, CategoryType,
    category::Category,
    recurring::{Frequency, RecurringRequest, RecurringTransaction},
    transaction::{Transaction, TransactionFilters, TransactionRequest},
};
use chrono::NaiveDate;
use fintrack_client::{
    FieldErrors,
    validation::{validate_recurring, validate_registration, validate_transaction},
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name of the field; also the key of its error message.
    pub key: &'static str,
    pub label: &'static str,
    pub secret: bool,
}

const fn field(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        secret: false,
    }
}

const fn secret(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        secret: true,
    }
}

pub const LOGIN_FIELDS: &[FieldSpec] = &[field("username", "Username"), secret("password", "Password")];

pub const REGISTER_FIELDS: &[FieldSpec] = &[
    field("username", "Username"),
    secret("password", "Password"),
    secret("confirmPassword", "Confirm password"),
    field("balance", "Initial balance"),
];

pub const TRANSACTION_FIELDS: &[FieldSpec] = &[
    field("categoryName", "Category"),
    field("name", "Name"),
    field("amount", "Amount"),
    field("paymentMode", "Payment mode"),
    field("note", "Note"),
];

pub const RECURRING_FIELDS: &[FieldSpec] = &[
    field("name", "Title"),
    field("amount", "Amount"),
    field("categoryName", "Category"),
    field("frequency", "Frequency"),
    field("nextRunDate", "Next run date"),
];

pub const FILTER_FIELDS: &[FieldSpec] = &[
    field("from", "From"),
    field("to", "To"),
    field("categoryType", "Type"),
    field("categoryName", "Category"),
    field("name", "Name"),
    field("paymentMode", "Payment mode"),
    field("note", "Note"),
    field("minAmount", "Min amount"),
    field("maxAmount", "Max amount"),
];

pub const DATE_RANGE_FIELDS: &[FieldSpec] = &[field("from", "From"), field("to", "To")];

/// Raw text input for a fixed list of fields, plus the messages to show
/// next to them.
#[derive(Debug, Clone)]
pub struct Form {
    specs: &'static [FieldSpec],
    values: Vec<String>,
    focus: usize,
    pub errors: FieldErrors,
}

impl Form {
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            specs,
            values: vec![String::new(); specs.len()],
            focus: 0,
            errors: FieldErrors::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    fn index(&self, key: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.key == key)
    }

    pub fn value(&self, key: &str) -> &str {
        self.index(key)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(i) = self.index(key) {
            self.values[i] = value.into();
        }
    }

    /// Trimmed value, or `None` when the field is blank.
    pub fn text(&self, key: &str) -> Option<String> {
        let value = self.value(key).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_key(&self) -> Option<&'static str> {
        self.specs.get(self.focus).map(|spec| spec.key)
    }

    pub fn next_field(&mut self) {
        if !self.specs.is_empty() {
            self.focus = (self.focus + 1) % self.specs.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.specs.is_empty() {
            self.focus = (self.focus + self.specs.len() - 1) % self.specs.len();
        }
    }

    pub fn input(&mut self, ch: char) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.pop();
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (usize, &FieldSpec, &str)> {
        self.specs
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(i, (spec, value))| (i, spec, value.as_str()))
    }
}

fn parse_amount(form: &Form, key: &str, errors: &mut FieldErrors) -> Option<Amount> {
    let raw = form.text(key)?;
    match raw.parse::<Amount>() {
        Ok(amount) => Some(amount),
        Err(err) => {
            errors.add(key, format!("Invalid amount: {err}"));
            None
        }
    }
}

fn parse_date(form: &Form, key: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let raw = form.text(key)?;
    match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(key, "Use the YYYY-MM-DD format");
            None
        }
    }
}

fn merge(errors: &mut FieldErrors, other: FieldErrors) {
    for (field, message) in other.iter() {
        errors.add(field, message);
    }
}

fn finish<T>(value: T, errors: FieldErrors) -> Result<T, FieldErrors> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

/// Normalizes free text such as `food and beverages` into the server's enum
/// spelling, `FOOD_AND_BEVERAGES`.
pub fn category_key(input: &str) -> String {
    input
        .trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Resolves the typed category against the known ones. An empty category
/// list accepts anything and leaves the check to the server.
fn resolve_category(
    form: &Form,
    key: &str,
    categories: &[Category],
    errors: &mut FieldErrors,
) -> String {
    let typed = category_key(form.value(key));
    if typed.is_empty() || categories.is_empty() {
        return typed;
    }
    match categories.iter().find(|c| c.name == typed) {
        Some(category) => category.name.clone(),
        None => {
            errors.add(key, format!("Unknown category {typed}"));
            typed
        }
    }
}

pub fn parse_category_type(input: &str) -> Option<CategoryType> {
    match input.trim().to_ascii_lowercase().as_str() {
        "income" | "i" => Some(CategoryType::Income),
        "expense" | "e" => Some(CategoryType::Expense),
        _ => None,
    }
}

pub fn parse_frequency(input: &str) -> Option<Frequency> {
    let input = input.trim();
    Frequency::ALL
        .into_iter()
        .find(|f| f.label().eq_ignore_ascii_case(input))
}

pub struct Registration {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub balance: Amount,
}

pub fn registration(form: &Form) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();
    let balance = parse_amount(form, "balance", &mut errors).unwrap_or(Amount::ZERO);
    let reg = Registration {
        username: form.value("username").trim().to_string(),
        password: form.value("password").to_string(),
        confirm_password: form.value("confirmPassword").to_string(),
        balance,
    };
    merge(
        &mut errors,
        validate_registration(&reg.username, &reg.password, &reg.confirm_password, reg.balance),
    );
    finish(reg, errors)
}

pub fn transaction_form(existing: Option<&Transaction>) -> Form {
    let form = Form::new(TRANSACTION_FIELDS);
    let Some(tx) = existing else {
        return form;
    };
    form.with("categoryName", tx.category.name.clone())
        .with("name", tx.name.clone())
        .with("amount", tx.amount.to_string())
        .with("paymentMode", tx.payment_mode.clone().unwrap_or_default())
        .with("note", tx.note.clone().unwrap_or_default())
}

pub fn transaction_request(
    form: &Form,
    categories: &[Category],
) -> Result<TransactionRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let amount = parse_amount(form, "amount", &mut errors).unwrap_or(Amount::ZERO);
    let req = TransactionRequest {
        category_name: resolve_category(form, "categoryName", categories, &mut errors),
        name: form.text("name").unwrap_or_default(),
        amount,
        payment_mode: form.text("paymentMode").unwrap_or_default(),
        note: form.text("note"),
    };
    merge(&mut errors, validate_transaction(&req));
    finish(req, errors)
}

pub fn recurring_form(existing: Option<&RecurringTransaction>) -> Form {
    let form = Form::new(RECURRING_FIELDS).with("frequency", Frequency::Monthly.label());
    let Some(item) = existing else {
        return form;
    };
    form.with("name", item.name.clone())
        .with("amount", item.amount.to_string())
        .with("categoryName", item.category_name.clone().unwrap_or_default())
        .with("frequency", item.frequency.label())
        .with(
            "nextRunDate",
            item.next_run_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        )
}

pub fn recurring_request(
    form: &Form,
    categories: &[Category],
) -> Result<RecurringRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let amount = parse_amount(form, "amount", &mut errors).unwrap_or(Amount::ZERO);
    let frequency = match parse_frequency(form.value("frequency")) {
        Some(frequency) => frequency,
        None => {
            errors.add("frequency", "Daily, Weekly, Monthly or Yearly");
            Frequency::Monthly
        }
    };
    let req = RecurringRequest {
        category_name: resolve_category(form, "categoryName", categories, &mut errors),
        name: form.text("name").unwrap_or_default(),
        amount,
        frequency,
        next_run_date: parse_date(form, "nextRunDate", &mut errors),
    };
    merge(&mut errors, validate_recurring(&req));
    finish(req, errors)
}

pub fn filter_form(filters: &TransactionFilters) -> Form {
    let date = |d: Option<NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    let amount = |a: Option<Amount>| a.map(|a| a.to_string()).unwrap_or_default();
    Form::new(FILTER_FIELDS)
        .with("from", date(filters.from))
        .with("to", date(filters.to))
        .with(
            "categoryType",
            filters.category_type.map(|t| t.as_str()).unwrap_or_default(),
        )
        .with("categoryName", filters.category_name.clone().unwrap_or_default())
        .with("name", filters.name.clone().unwrap_or_default())
        .with("paymentMode", filters.payment_mode.clone().unwrap_or_default())
        .with("note", filters.note.clone().unwrap_or_default())
        .with("minAmount", amount(filters.min_amount))
        .with("maxAmount", amount(filters.max_amount))
}

/// Reads the filter panel. A category name must be one of `categories`
/// once that list is known.
pub fn filters(form: &Form, categories: &[Category]) -> Result<TransactionFilters, FieldErrors> {
    let mut errors = FieldErrors::new();
    let category_type = match form.text("categoryType") {
        None => None,
        Some(raw) => {
            let parsed = parse_category_type(&raw);
            if parsed.is_none() {
                errors.add("categoryType", "Income or Expense");
            }
            parsed
        }
    };
    let filters = TransactionFilters {
        from: parse_date(form, "from", &mut errors),
        to: parse_date(form, "to", &mut errors),
        category_type,
        category_name: form
            .text("categoryName")
            .map(|_| resolve_category(form, "categoryName", categories, &mut errors)),
        name: form.text("name"),
        payment_mode: form.text("paymentMode"),
        note: form.text("note"),
        min_amount: parse_amount(form, "minAmount", &mut errors),
        max_amount: parse_amount(form, "maxAmount", &mut errors),
    };
    if let (Some(from), Some(to)) = (filters.from, filters.to)
        && from > to
    {
        errors.add("to", "Must not be before From");
    }
    finish(filters, errors)
}

pub fn date_range_form(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Form {
    let date = |d: Option<NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    Form::new(DATE_RANGE_FIELDS)
        .with("from", date(from))
        .with("to", date(to))
}

pub fn date_range(form: &Form) -> Result<(Option<NaiveDate>, Option<NaiveDate>), FieldErrors> {
    let mut errors = FieldErrors::new();
    let from = parse_date(form, "from", &mut errors);
    let to = parse_date(form, "to", &mut errors);
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        errors.add("to", "Must not be before From");
    }
    finish((from, to), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: "FOOD_AND_BEVERAGES".to_string(),
                kind: CategoryType::Expense,
            },
            Category {
                id: 2,
                name: "SALARY".to_string(),
                kind: CategoryType::Income,
            },
        ]
    }

    fn typed(form: &mut Form, text: &str) {
        for ch in text.chars() {
            form.input(ch);
        }
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = Form::new(LOGIN_FIELDS);
        assert_eq!(form.focused_key(), Some("username"));
        form.next_field();
        form.next_field();
        assert_eq!(form.focused_key(), Some("username"));
        form.prev_field();
        assert_eq!(form.focused_key(), Some("password"));
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = Form::new(LOGIN_FIELDS);
        typed(&mut form, "alice");
        form.next_field();
        typed(&mut form, "secret!");
        form.backspace();
        assert_eq!(form.value("username"), "alice");
        assert_eq!(form.value("password"), "secret");
    }

    #[test]
    fn registration_reports_mismatch() {
        let form = Form::new(REGISTER_FIELDS)
            .with("username", "alice")
            .with("password", "secret1")
            .with("confirmPassword", "secret2");
        let errors = registration(&form).err().unwrap();
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
    }

    #[test]
    fn registration_rejects_negative_balance() {
        let form = Form::new(REGISTER_FIELDS)
            .with("username", "alice")
            .with("password", "secret1")
            .with("confirmPassword", "secret1")
            .with("balance", "-5");
        let errors = registration(&form).err().unwrap();
        assert!(errors.get("balance").is_some());
    }

    #[test]
    fn transaction_request_from_valid_form() {
        let form = Form::new(TRANSACTION_FIELDS)
            .with("categoryName", "food and beverages")
            .with("name", " Lunch ")
            .with("amount", "12,50")
            .with("paymentMode", "Card");
        let req = transaction_request(&form, &categories()).unwrap();
        assert_eq!(req.category_name, "FOOD_AND_BEVERAGES");
        assert_eq!(req.name, "Lunch");
        assert_eq!(req.amount, Amount::new(1_250));
        assert_eq!(req.note, None);
    }

    #[test]
    fn transaction_amount_must_be_positive() {
        let form = Form::new(TRANSACTION_FIELDS)
            .with("categoryName", "SALARY")
            .with("name", "Pay")
            .with("amount", "0")
            .with("paymentMode", "Bank");
        let errors = transaction_request(&form, &categories()).err().unwrap();
        assert_eq!(errors.get("amount"), Some("Amount must be greater than 0"));
    }

    #[test]
    fn unparsable_amount_is_a_field_error() {
        let form = Form::new(TRANSACTION_FIELDS)
            .with("categoryName", "SALARY")
            .with("name", "Pay")
            .with("amount", "12.345")
            .with("paymentMode", "Bank");
        let errors = transaction_request(&form, &categories()).err().unwrap();
        assert!(errors.get("amount").unwrap().starts_with("Invalid amount"));
    }

    #[test]
    fn unknown_category_is_rejected_when_list_is_known() {
        let form = Form::new(TRANSACTION_FIELDS)
            .with("categoryName", "travel")
            .with("name", "Train")
            .with("amount", "30")
            .with("paymentMode", "Card");
        let errors = transaction_request(&form, &categories()).err().unwrap();
        assert!(errors.get("categoryName").is_some());
        assert!(transaction_request(&form, &[]).is_ok());
    }

    #[test]
    fn recurring_requires_date_and_frequency() {
        let form = Form::new(RECURRING_FIELDS)
            .with("name", "Rent")
            .with("amount", "950")
            .with("categoryName", "SALARY")
            .with("frequency", "fortnightly");
        let errors = recurring_request(&form, &categories()).err().unwrap();
        assert!(errors.get("frequency").is_some());
        assert!(errors.get("nextRunDate").is_some());

        let form = form
            .with("frequency", "weekly")
            .with("nextRunDate", "2025-02-01");
        let req = recurring_request(&form, &categories()).unwrap();
        assert_eq!(req.frequency, Frequency::Weekly);
        assert_eq!(req.next_run_date, NaiveDate::from_ymd_opt(2025, 2, 1));
    }

    #[test]
    fn filters_round_trip_through_the_form() {
        let original = TransactionFilters {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            category_type: Some(CategoryType::Expense),
            min_amount: Some(Amount::new(500)),
            note: Some("gift".to_string()),
            ..Default::default()
        };
        assert_eq!(filters(&filter_form(&original), &[]).unwrap(), original);
    }

    #[test]
    fn blank_filter_fields_are_unset() {
        let parsed = filters(&Form::new(FILTER_FIELDS).with("name", "   "), &[]).unwrap();
        assert_eq!(parsed, TransactionFilters::default());
    }

    #[test]
    fn filter_category_is_checked_against_known_categories() {
        let form = Form::new(FILTER_FIELDS).with("categoryName", "food and beverages");
        let parsed = filters(&form, &categories()).unwrap();
        assert_eq!(parsed.category_name.as_deref(), Some("FOOD_AND_BEVERAGES"));

        let form = Form::new(FILTER_FIELDS).with("categoryName", "fod");
        let errors = filters(&form, &categories()).unwrap_err();
        assert_eq!(errors.get("categoryName"), Some("Unknown category FOD"));

        let parsed = filters(&form, &[]).unwrap();
        assert_eq!(parsed.category_name.as_deref(), Some("FOD"));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let form = date_range_form(
            NaiveDate::from_ymd_opt(2025, 2, 1),
            NaiveDate::from_ymd_opt(2025, 1, 1),
        );
        assert!(date_range(&form).err().unwrap().get("to").is_some());
    }
}
