use crate::errors::{AppResult, EngineError};
use crate::models::{LedgerEntry, LedgerSummary, Loan, PaymentType, Role, User};
use crate::services::{LedgerRepository, LoanRepository};
use super::authorize;

/// Repayment view of `loan` over the recorded `entries`, newest first.
/// Entries of other loans are ignored.
pub fn summarize(loan: &Loan, entries: &[LedgerEntry]) -> LedgerSummary {
    let mut entries: Vec<LedgerEntry> = entries
        .iter()
        .filter(|e| e.loan_id == loan.id)
        .cloned()
        .collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    let total_of = |kind: PaymentType| -> f64 {
        entries.iter().filter(|e| e.payment_type == kind).map(|e| e.amount).sum()
    };
    let total_paid_by_emi = total_of(PaymentType::Emi);
    let total_task_credit = total_of(PaymentType::TaskCredit);

    LedgerSummary {
        loan_id: loan.id.clone(),
        loan_amount: loan.amount,
        emi_amount: loan.emi_amount,
        remaining_balance: loan.remaining_balance,
        total_paid_by_emi,
        total_task_credit,
        total_repaid: total_paid_by_emi + total_task_credit,
        entries,
    }
}

/// Ledger of one loan, visible to its borrower and to admins.
pub async fn loan_ledger(
    loans: &LoanRepository,
    ledger: &LedgerRepository,
    actor: &User,
    loan_id: &str,
) -> AppResult<LedgerSummary> {
    let loan = loans
        .all()
        .await?
        .into_iter()
        .find(|l| l.id == loan_id)
        .ok_or_else(|| EngineError::NotFound(format!("Loan {} not found.", loan_id)))?;
    if loan.user_id != actor.id {
        authorize(actor, &[Role::Admin], "You can only view the ledger of your own loans.")?;
    }
    Ok(summarize(&loan, &ledger.list().await?))
}
