use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;

// Define task status enum
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Open,
    Assigned,
    InProgress,
    PendingVerification,
    Completed,
    Cancelled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub const COD_FUNDING: &str = "cod";
pub const SIMULATED_PLATFORM_PAYMENT: &str = "SimulatedPlatformPayment";

/// Stamped when the worker confirms a cash-on-delivery payment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodPaymentDetails {
    pub payment_method: String,
    pub paid_date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time_slot: Option<String>,
    #[serde(default)]
    pub skills_required: BTreeSet<String>,
    pub credit_amount: f64,
    pub status: TaskStatus,
    pub posted_by: String,                  // poster's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,        // user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ai_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_requested_date: Option<NaiveDate>,
    #[serde(
        default,
        rename = "loanSeekerPaymentDetailsForCOD",
        skip_serializing_if = "Option::is_none"
    )]
    pub loan_seeker_payment_details_for_cod: Option<CodPaymentDetails>,
}

impl Task {
    pub fn is_cod_funded(&self) -> bool {
        self.funding_method.as_deref() == Some(COD_FUNDING)
    }
}

/// Poster-supplied fields of a new task; everything else is set by the engine.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub address: Option<String>,
    pub preferred_time_slot: Option<String>,
    pub skills_required: BTreeSet<String>,
    pub credit_amount: f64,
    pub deadline: Option<String>,
    pub image_url: Option<String>,
    pub data_ai_hint: Option<String>,
    pub funding_method: Option<String>,
}
