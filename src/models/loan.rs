use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoanStatus {
    Pending,
    Approved,
    Active,
    Rejected,
    Paid,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub interest_rate: f64,    // annual, 0.08 == 8%
    pub tenure_months: u32,
    pub emi_amount: f64,       // fixed at origination
    pub status: LoanStatus,
    pub application_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<NaiveDate>,
    pub total_repaid: f64,
    pub remaining_balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<String>,
}

/// Admin-issued loan request.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoanPayload {
    pub user_id: String,
    pub amount: f64,
    pub tenure_months: u32,
    pub status: LoanStatus,
    #[serde(default)]
    pub bank_details: Option<String>,
}
