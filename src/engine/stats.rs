use serde::Serialize;
use std::collections::BTreeMap;
use crate::errors::AppResult;
use crate::models::{Loan, LoanStatus, Role, Task, TaskStatus, User};
use crate::services::{LoanRepository, TaskRepository};
use super::authorize;

/// Platform totals shown on the admin dashboard.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_loans: usize,
    pub outstanding_balance: f64,
    pub loans_by_status: BTreeMap<LoanStatus, usize>,
    pub open_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
}

pub fn compute_stats(loans: &[Loan], tasks: &[Task]) -> AdminStats {
    let mut loans_by_status = BTreeMap::new();
    for loan in loans {
        *loans_by_status.entry(loan.status).or_insert(0) += 1;
    }
    let count = |keep: fn(TaskStatus) -> bool| tasks.iter().filter(|t| keep(t.status)).count();

    AdminStats {
        total_loans: loans.len(),
        outstanding_balance: loans
            .iter()
            .filter(|l| l.status == LoanStatus::Active)
            .map(|l| l.remaining_balance)
            .sum(),
        loans_by_status,
        open_tasks: count(|s| s == TaskStatus::Open),
        in_progress_tasks: count(|s| matches!(s, TaskStatus::Assigned | TaskStatus::InProgress)),
        completed_tasks: count(|s| s == TaskStatus::Completed),
    }
}

pub async fn admin_stats(loans: &LoanRepository, tasks: &TaskRepository, actor: &User) -> AppResult<AdminStats> {
    authorize(actor, &[Role::Admin], "Only Admins can view platform statistics.")?;
    let stats = compute_stats(&loans.all().await?, &tasks.list().await?);
    tracing::debug!("Computed admin stats: {:?}", stats);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::engine::testing::user;
    use crate::seed::SeedData;
    use crate::services::{InMemoryStore, Repositories};

    #[test]
    fn test_compute_stats_over_seed() {
        let seed = SeedData::demo("hash");
        let stats = compute_stats(&seed.loans, &seed.tasks);
        assert_eq!(stats.total_loans, 2);
        assert!((stats.outstanding_balance - 13260.24).abs() < 1e-9);
        assert_eq!(stats.loans_by_status.get(&LoanStatus::Active), Some(&2));
        assert_eq!(stats.open_tasks, 3);
        assert_eq!(stats.in_progress_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
    }

    #[test]
    fn test_compute_stats_empty() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats.total_loans, 0);
        assert_eq!(stats.outstanding_balance, 0.0);
        assert!(stats.loans_by_status.is_empty());
    }

    #[tokio::test]
    async fn test_admin_stats_is_admin_only() {
        let repos = Repositories::new(Arc::new(InMemoryStore::new()), SeedData::demo("hash"));
        let admin = user("a", Role::Admin, &[]);
        let seeker = user("s", Role::LoanSeeker, &[]);
        assert_eq!(admin_stats(&repos.loans, &repos.tasks, &admin).await.unwrap().total_loans, 2);
        assert!(admin_stats(&repos.loans, &repos.tasks, &seeker).await.is_err());
    }
}
