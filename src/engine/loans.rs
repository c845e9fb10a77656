//! Loan origination and loan views.
use chrono::NaiveDate;
use crate::errors::{AppResult, EngineError};
use crate::models::{AdminLoanPayload, Loan, LoanStatus, Role, User};
use crate::services::LoanRepository;
use super::{authorize, new_id, today};

/// Annual rate applied to every loan on the platform.
pub const FIXED_INTEREST_RATE: f64 = 0.08;
pub const MAX_ACTIVE_LOANS: usize = 2;

/// Monthly installment of an amortized loan:
/// `P·r·(1+r)^n / ((1+r)^n − 1)` with `r = annual_rate / 12`.
/// Zero for a zero tenure or a non-positive rate.
pub fn compute_emi(principal: f64, annual_rate: f64, tenure_months: u32) -> f64 {
    let r = annual_rate / 12.0;
    if tenure_months == 0 || r <= 0.0 {
        return 0.0;
    }
    let growth = (1.0 + r).powi(tenure_months as i32);
    let emi = principal * r * growth / (growth - 1.0);
    if emi.is_finite() { emi } else { 0.0 }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn originate(
    id: String,
    user_id: &str,
    amount: f64,
    tenure_months: u32,
    status: LoanStatus,
    on: NaiveDate,
) -> Loan {
    Loan {
        id,
        user_id: user_id.to_string(),
        amount,
        interest_rate: FIXED_INTEREST_RATE,
        tenure_months,
        emi_amount: round_to_cents(compute_emi(amount, FIXED_INTEREST_RATE, tenure_months)),
        status,
        application_date: on,
        approved_date: None,
        total_repaid: 0.0,
        remaining_balance: amount,
        bank_details: None,
    }
}

/// Self-service application. The loan is active immediately.
pub async fn apply_for_loan(
    loans: &LoanRepository,
    actor: &User,
    amount: f64,
    tenure_months: u32,
) -> AppResult<Loan> {
    authorize(actor, &[Role::LoanSeeker], "Only Loan Seekers can apply for loans.")?;

    let result = loans
        .originate(&actor.id, |existing| {
            let active = existing
                .iter()
                .filter(|l| l.user_id == actor.id && l.status == LoanStatus::Active)
                .count();
            if active >= MAX_ACTIVE_LOANS {
                return Err(EngineError::LoanLimitExceeded(MAX_ACTIVE_LOANS));
            }
            Ok(originate(new_id("loan"), &actor.id, amount, tenure_months, LoanStatus::Active, today()))
        })
        .await;

    match &result {
        Ok(loan) => tracing::info!(
            "Loan {} of {:.2} over {} months issued to {} (EMI {:.2})",
            loan.id, loan.amount, loan.tenure_months, actor.id, loan.emi_amount
        ),
        Err(e) => tracing::warn!("Loan application by {} rejected: {}", actor.id, e),
    }
    result
}

/// Admin-issued loan with an explicit status. The active-loan cap does not apply.
pub async fn admin_create_loan(
    loans: &LoanRepository,
    actor: &User,
    payload: AdminLoanPayload,
) -> AppResult<Loan> {
    authorize(
        actor,
        &[Role::Admin],
        "Unauthorized action. Only Admins can create loans this way.",
    )?;

    let issued_on = today();
    let loan = loans
        .originate(&payload.user_id, |_| {
            let mut loan = originate(
                new_id("loan-admin"),
                &payload.user_id,
                payload.amount,
                payload.tenure_months,
                payload.status,
                issued_on,
            );
            if matches!(payload.status, LoanStatus::Approved | LoanStatus::Active) {
                loan.approved_date = Some(issued_on);
            }
            loan.bank_details = payload.bank_details.clone();
            Ok(loan)
        })
        .await?;

    tracing::info!(
        "Admin {} created loan {} ({}) for user {}",
        actor.id, loan.id, loan.status, loan.user_id
    );
    Ok(loan)
}

pub async fn user_loans(loans: &LoanRepository, actor: &User) -> AppResult<Vec<Loan>> {
    loans.for_user(&actor.id).await
}

pub async fn all_loans(loans: &LoanRepository, actor: &User) -> AppResult<Vec<Loan>> {
    authorize(actor, &[Role::Admin], "Only Admins can view all loans.")?;
    loans.all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{empty_repos, user};
    use crate::errors::AppError;

    #[test]
    fn test_compute_emi_reference_value() {
        let emi = compute_emi(5000.0, 0.08, 12);
        assert!((emi - 434.94).abs() < 0.01, "emi was {}", emi);
        assert_eq!(round_to_cents(emi), 434.94);
    }

    #[test]
    fn test_compute_emi_degenerate_inputs() {
        assert_eq!(compute_emi(5000.0, 0.08, 0), 0.0);
        assert_eq!(compute_emi(5000.0, 0.0, 12), 0.0);
        assert_eq!(compute_emi(5000.0, -0.05, 12), 0.0);
    }

    #[tokio::test]
    async fn test_apply_for_loan_creates_active_loan() {
        let repos = empty_repos();
        let seeker = user("seeker", Role::LoanSeeker, &[]);

        let loan = apply_for_loan(&repos.loans, &seeker, 5000.0, 12).await.unwrap();
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.interest_rate, FIXED_INTEREST_RATE);
        assert_eq!(loan.emi_amount, 434.94);
        assert_eq!(loan.total_repaid, 0.0);
        assert_eq!(loan.remaining_balance, 5000.0);
        assert_eq!(loan.application_date, today());
        assert_eq!(loan.approved_date, None);

        assert_eq!(repos.loans.for_user("seeker").await.unwrap(), vec![loan.clone()]);
        assert_eq!(repos.loans.all().await.unwrap(), vec![loan]);
    }

    #[tokio::test]
    async fn test_apply_for_loan_requires_loan_seeker() {
        let repos = empty_repos();
        let provider = user("wp", Role::WorkProvider, &[]);
        let err = apply_for_loan(&repos.loans, &provider, 5000.0, 12).await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::Unauthorized(_))));
        assert!(repos.loans.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_third_active_loan_is_refused() {
        let repos = empty_repos();
        let seeker = user("seeker", Role::LoanSeeker, &[]);
        apply_for_loan(&repos.loans, &seeker, 5000.0, 12).await.unwrap();
        apply_for_loan(&repos.loans, &seeker, 8000.0, 24).await.unwrap();

        let err = apply_for_loan(&repos.loans, &seeker, 6000.0, 6).await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::LoanLimitExceeded(2))));
        assert_eq!(repos.loans.all().await.unwrap().len(), 2);
        assert_eq!(repos.loans.for_user("seeker").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_active_loans_do_not_count_toward_cap() {
        let repos = empty_repos();
        let admin = user("admin", Role::Admin, &[]);
        let seeker = user("seeker", Role::LoanSeeker, &[]);
        for status in [LoanStatus::Paid, LoanStatus::Pending, LoanStatus::Active] {
            let payload = AdminLoanPayload {
                user_id: "seeker".into(),
                amount: 2000.0,
                tenure_months: 6,
                status,
                bank_details: None,
            };
            admin_create_loan(&repos.loans, &admin, payload).await.unwrap();
        }
        assert!(apply_for_loan(&repos.loans, &seeker, 5000.0, 12).await.is_ok());
        assert!(apply_for_loan(&repos.loans, &seeker, 5000.0, 12).await.is_err());
    }

    #[tokio::test]
    async fn test_admin_create_loan_dates_and_mirror() {
        let repos = empty_repos();
        let admin = user("admin", Role::Admin, &[]);

        let pending = admin_create_loan(
            &repos.loans,
            &admin,
            AdminLoanPayload {
                user_id: "seeker".into(),
                amount: 20000.0,
                tenure_months: 24,
                status: LoanStatus::Pending,
                bank_details: Some("SBIN0001234 / 123456789".into()),
            },
        )
        .await
        .unwrap();
        assert!(pending.id.starts_with("loan-admin-"));
        assert_eq!(pending.approved_date, None);
        assert_eq!(pending.bank_details.as_deref(), Some("SBIN0001234 / 123456789"));

        let approved = admin_create_loan(
            &repos.loans,
            &admin,
            AdminLoanPayload {
                user_id: "seeker".into(),
                amount: 20000.0,
                tenure_months: 24,
                status: LoanStatus::Approved,
                bank_details: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(approved.approved_date, Some(today()));

        let mirror = repos.loans.for_user("seeker").await.unwrap();
        assert_eq!(mirror.len(), 2);
        assert_eq!(repos.loans.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_admin_only_views() {
        let repos = empty_repos();
        let seeker = user("seeker", Role::LoanSeeker, &[]);
        assert!(all_loans(&repos.loans, &seeker).await.is_err());
        let payload = AdminLoanPayload {
            user_id: "seeker".into(),
            amount: 1000.0,
            tenure_months: 6,
            status: LoanStatus::Active,
            bank_details: None,
        };
        assert!(admin_create_loan(&repos.loans, &seeker, payload).await.is_err());
    }
}
