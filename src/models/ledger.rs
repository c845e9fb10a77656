use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    #[serde(rename = "EMI")]
    Emi,
    TaskCredit,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub loan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,   // only for TaskCredit
    pub payment_type: PaymentType,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
}

/// Repayment view of one loan. Always computed, never persisted.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub loan_id: String,
    pub loan_amount: f64,
    pub emi_amount: f64,
    pub remaining_balance: f64,
    pub total_paid_by_emi: f64,
    pub total_task_credit: f64,
    pub total_repaid: f64,
    pub entries: Vec<LedgerEntry>,
}
