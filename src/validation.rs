use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;
use crate::models::{NewContactRequest, NewTaskRequest, SignUpRequest, UpdateTaskRequest};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static CONTACT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ]+( [A-Za-zÀ-ÖØ-öø-ÿ]+)+$").expect("valid name pattern")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d +()-]{6,}$").expect("valid phone pattern"));

fn required(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

pub fn validate_new_task(req: &NewTaskRequest) -> Result<(), AppError> {
    required(&req.title, "title")?;
    required(&req.date, "date")?;
    required(&req.category, "category")
}

pub fn validate_task_edit(req: &UpdateTaskRequest) -> Result<(), AppError> {
    required(&req.title, "title")?;
    required(&req.date, "date")
}

/// Collapses runs of whitespace in names and strips it from email and phone.
pub fn sanitize_contact(req: &NewContactRequest) -> NewContactRequest {
    NewContactRequest {
        name: req.name.split_whitespace().collect::<Vec<_>>().join(" "),
        email: req.email.split_whitespace().collect(),
        phone: req.phone.split_whitespace().collect(),
    }
}

/// Expects an already sanitized request.
pub fn validate_contact(req: &NewContactRequest) -> Result<(), AppError> {
    if !CONTACT_NAME.is_match(&req.name) {
        return Err(AppError::BadRequest(
            "Please enter first and last name".to_string(),
        ));
    }
    if !EMAIL.is_match(&req.email) {
        return Err(AppError::BadRequest(
            "Please enter a valid email address.".to_string(),
        ));
    }
    if !PHONE.is_match(&req.phone) {
        return Err(AppError::BadRequest(
            "Please enter a valid phone number.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_sign_up(req: &SignUpRequest) -> Result<(), AppError> {
    if req.name.split_whitespace().count() < 2 {
        return Err(AppError::BadRequest(
            "Please enter your first and last name".to_string(),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::BadRequest(
            "Please enter a valid email address.".to_string(),
        ));
    }
    required(&req.password, "password")?;
    if req.password != req.password_confirm {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }
    if !req.accept_privacy {
        return Err(AppError::BadRequest(
            "Please accept the privacy policy".to_string(),
        ));
    }
    Ok(())
}
