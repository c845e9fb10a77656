use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use super::user::Role;
use super::task::NewTask;

pub const LOAN_TENURES: [u32; 5] = [6, 12, 18, 24, 36];
pub const ADMIN_LOAN_TENURES: [u32; 7] = [6, 12, 18, 24, 36, 48, 60];

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().chars().count() < 2 {
            return Err("Name must be at least 2 characters.".into());
        }
        if !self.email.contains('@') {
            return Err("Invalid email address.".into());
        }
        if self.password.chars().count() < 6 {
            return Err("Password must be at least 6 characters.".into());
        }
        if self.password != self.confirm_password {
            return Err("Passwords don't match.".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), String> {
        let name_len = self.name.trim().chars().count();
        if !(2..=50).contains(&name_len) {
            return Err("Name must be between 2 and 50 characters.".into());
        }
        if !self.email.contains('@') {
            return Err("Invalid email address.".into());
        }
        if self.bio.as_ref().map_or(false, |b| b.chars().count() > 300) {
            return Err("Bio must be at most 300 characters.".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplicationForm {
    pub amount: f64,
    pub tenure_months: u32,
}

impl LoanApplicationForm {
    pub fn validate(&self) -> Result<(), String> {
        if !(5000.0..=50000.0).contains(&self.amount) {
            return Err("Loan amount must be between 5,000 and 50,000.".into());
        }
        if !LOAN_TENURES.contains(&self.tenure_months) {
            return Err(format!("Tenure must be one of {:?} months.", LOAN_TENURES));
        }
        Ok(())
    }
}

pub fn validate_admin_loan(amount: f64, tenure_months: u32) -> Result<(), String> {
    if !(1000.0..=1_000_000.0).contains(&amount) {
        return Err("Loan amount must be between 1,000 and 1,000,000.".into());
    }
    if !ADMIN_LOAN_TENURES.contains(&tenure_months) {
        return Err(format!("Tenure must be one of {:?} months.", ADMIN_LOAN_TENURES));
    }
    Ok(())
}

pub const TIME_SLOT_OPTIONS: [&str; 4] = [
    "Morning (9 AM - 12 PM)",
    "Afternoon (1 PM - 5 PM)",
    "Evening (6 PM - 9 PM)",
    "Anytime",
];

// Credit is never taken from the poster; it always comes from the skill estimate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTaskForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub preferred_time_slot: Option<String>,
    #[serde(default)]
    pub skills_required: BTreeSet<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub data_ai_hint: Option<String>,
    #[serde(default)]
    pub funding_method: Option<String>,
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

impl PostTaskForm {
    pub fn validate(&self) -> Result<(), String> {
        if !(5..=100).contains(&char_len(&self.title)) {
            return Err("Title must be between 5 and 100 characters.".into());
        }
        if !(20..=1000).contains(&char_len(&self.description)) {
            return Err("Description must be between 20 and 1000 characters.".into());
        }
        let address = self.address.as_deref().map_or(0, char_len);
        if !(10..=200).contains(&address) {
            return Err("Service address must be between 10 and 200 characters.".into());
        }
        match self.preferred_time_slot.as_deref() {
            Some(slot) if TIME_SLOT_OPTIONS.contains(&slot) => {}
            _ => return Err("You need to select a preferred time slot.".into()),
        }
        if self.skills_required.is_empty() {
            return Err("You must select at least one skill.".into());
        }
        if let Some(url) = self.image_url.as_deref().filter(|u| !u.is_empty()) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("Please enter a valid URL for the image.".into());
            }
        }
        if self.data_ai_hint.as_deref().map_or(false, |h| h.chars().count() > 50) {
            return Err("AI hint should be concise (max 50 chars).".into());
        }
        Ok(())
    }

    /// Converts to engine input priced at `credit_amount`.
    pub fn into_new_task(self, credit_amount: f64) -> NewTask {
        let image_url = self.image_url.filter(|u| !u.is_empty());
        NewTask {
            credit_amount,
            title: self.title,
            description: self.description,
            address: self.address,
            preferred_time_slot: self.preferred_time_slot,
            skills_required: self.skills_required,
            deadline: self.deadline,
            data_ai_hint: image_url.as_ref().and(self.data_ai_hint),
            image_url,
            funding_method: self.funding_method,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskForm {
    pub user_id: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct TaskQuery {
    pub search: Option<String>,
    pub skill: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UserQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EstimateQuery {
    /// Comma separated skill names.
    pub skills: Option<String>,
}

impl EstimateQuery {
    pub fn skill_set(&self) -> BTreeSet<String> {
        self.skills
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Envelope for every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data) }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), data: Some(data) }
    }

    pub fn failure(message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: false, message: Some(message.into()), data }
    }
}
