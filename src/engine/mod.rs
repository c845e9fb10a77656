//! SkillCredit domain rules. Every operation takes the repositories it
//! touches and the acting user explicitly.
pub mod identity;
pub mod ledger;
pub mod loans;
pub mod pricing;
pub mod stats;
pub mod tasks;

use chrono::{NaiveDate, Utc};
use crate::errors::{EngineError, EngineResult};
use crate::models::{Role, User};

/// Calendar date used for every `*Date` field (UTC, `YYYY-MM-DD`).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Fails with `Unauthorized` unless `actor` holds one of `allowed`.
pub(crate) fn authorize(actor: &User, allowed: &[Role], denial: &str) -> EngineResult<()> {
    if allowed.contains(&actor.role) {
        return Ok(());
    }
    tracing::warn!("Denied {} ({}): {}", actor.id, actor.role, denial);
    Err(EngineError::Unauthorized(denial.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::user;

    #[test]
    fn test_authorize() {
        let admin = user("a", Role::Admin, &[]);
        assert!(authorize(&admin, &[Role::Admin, Role::WorkProvider], "post").is_ok());
        let err = authorize(&admin, &[Role::LoanSeeker], "Only Loan Seekers can apply for loans.")
            .unwrap_err();
        assert_eq!(err, EngineError::Unauthorized("Only Loan Seekers can apply for loans.".into()));
    }

    #[test]
    fn test_new_id_is_prefixed_and_unique() {
        let a = new_id("task");
        let b = new_id("task");
        assert!(a.starts_with("task-"));
        assert_ne!(a, b);
    }
}
