//! Local checks run before any request leaves the client.

use api_types::{Amount, recurring::RecurringRequest, transaction::TransactionRequest};

use crate::error::FieldErrors;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
    balance: Amount,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let username = username.trim();

    if username.is_empty() {
        errors.add("username", "Username is required");
    } else if username.chars().count() < MIN_USERNAME_LEN {
        errors.add("username", "Username must be at least 3 characters");
    }

    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Password must be at least 6 characters");
    }

    if confirm_password.is_empty() {
        errors.add("confirmPassword", "Please confirm your password");
    } else if password != confirm_password {
        errors.add("confirmPassword", "Passwords do not match");
    }

    if balance.is_negative() {
        errors.add("balance", "Balance cannot be negative");
    }

    errors
}

pub fn validate_transaction(req: &TransactionRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if req.category_name.trim().is_empty() {
        errors.add("categoryName", "Category is required");
    }
    if req.name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    if !req.amount.is_positive() {
        errors.add("amount", "Amount must be greater than 0");
    }
    if req.payment_mode.trim().is_empty() {
        errors.add("paymentMode", "Payment mode is required");
    }

    errors
}

pub fn validate_recurring(req: &RecurringRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if req.name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    if !req.amount.is_positive() {
        errors.add("amount", "Amount must be greater than 0");
    }
    if req.category_name.trim().is_empty() {
        errors.add("categoryName", "Category is required");
    }
    if req.next_run_date.is_none() {
        errors.add("nextRunDate", "Next run date is required");
    }

    errors
}
