use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;
use crate::config::Config;
use crate::engine::{ledger, loans};
use crate::errors::{AppError, AppResult};
use crate::models::{
    validate_admin_loan, AdminLoanPayload, ApiResponse, LedgerSummary, Loan, LoanApplicationForm,
};
use crate::services::Repositories;
use super::session_user;

pub async fn list_my_loans(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
) -> AppResult<Json<ApiResponse<Vec<Loan>>>> {
    let actor = session_user(&session, &repos.users).await?;
    Ok(Json(ApiResponse::ok(loans::user_loans(&repos.loans, &actor).await?)))
}

pub async fn apply_loan(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Json(form): Json<LoanApplicationForm>,
) -> AppResult<Response> {
    let actor = session_user(&session, &repos.users).await?;
    form.validate().map_err(AppError::Validation)?;

    let loan = loans::apply_for_loan(&repos.loans, &actor, form.amount, form.tenure_months).await?;
    let body = ApiResponse::ok_with_message(loan, "Loan application submitted and approved.");
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub async fn get_loan_ledger(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Path(loan_id): Path<String>,
) -> AppResult<Json<ApiResponse<LedgerSummary>>> {
    let actor = session_user(&session, &repos.users).await?;
    let summary = ledger::loan_ledger(&repos.loans, &repos.ledger, &actor, &loan_id).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

pub async fn admin_list_loans(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
) -> AppResult<Json<ApiResponse<Vec<Loan>>>> {
    let actor = session_user(&session, &repos.users).await?;
    Ok(Json(ApiResponse::ok(loans::all_loans(&repos.loans, &actor).await?)))
}

pub async fn admin_create_loan(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Json(payload): Json<AdminLoanPayload>,
) -> AppResult<Response> {
    let actor = session_user(&session, &repos.users).await?;
    validate_admin_loan(payload.amount, payload.tenure_months).map_err(AppError::Validation)?;

    let loan = loans::admin_create_loan(&repos.loans, &actor, payload).await?;
    let message = format!("Loan {} created for user {}.", loan.id, loan.user_id);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok_with_message(loan, message))).into_response())
}
