mod auth;
mod loans;
mod task;
mod dashboard;
mod pricing;

use tower_sessions::Session;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserProfile};
use crate::services::UserRepository;

pub use auth::{handle_signup, handle_login, handle_logout, get_me, update_me};
pub use loans::{list_my_loans, apply_loan, get_loan_ledger, admin_list_loans, admin_create_loan};
pub use task::{
    list_tasks, post_task, apply_task, assign_task, eligible_assignees, request_verification,
    approve_task, reject_task,
};
pub use dashboard::{task_dashboard, admin_stats, list_users};
pub use pricing::{estimate_price, list_skills};

/// Session key holding the logged-in user's profile.
pub const CURRENT_USER: &str = "currentUser";

// Resolves the session user against the directory so role and profile
// changes made since login are honored.
pub(crate) async fn session_user(session: &Session, users: &UserRepository) -> AppResult<User> {
    let profile = session
        .get::<UserProfile>(CURRENT_USER)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))?;

    users
        .get(&profile.id)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".into()))
}
