//! Task lifecycle:
//! `Open -> Assigned -> InProgress -> PendingVerification -> Completed`,
//! with a rejected verification going back to `InProgress`.
use serde::Serialize;
use crate::errors::{AppResult, EngineError};
use crate::models::{
    CodPaymentDetails, NewTask, Role, Task, TaskQuery, TaskStatus, User,
    SIMULATED_PLATFORM_PAYMENT,
};
use crate::services::{TaskRepository, UserRepository};
use super::{authorize, new_id, today};

fn not_open(task: &Task, action: &str) -> EngineError {
    EngineError::InvalidState {
        reason: format!(
            "Task \"{}\" is no longer open for {}. Its status is {}.",
            task.title, action, task.status
        ),
        current: Some(Box::new(task.clone())),
    }
}

fn task_not_found(task_id: &str) -> EngineError {
    EngineError::NotFound(format!("Task {} not found.", task_id))
}

/// Publishes a new `Open` task at the front of the list.
pub async fn post_task(tasks: &TaskRepository, actor: &User, data: NewTask) -> AppResult<Task> {
    authorize(
        actor,
        &[Role::WorkProvider, Role::Admin],
        "Only Work Providers or Admins can post tasks.",
    )?;

    let task = Task {
        id: new_id("task"),
        title: data.title,
        description: data.description,
        address: data.address,
        preferred_time_slot: data.preferred_time_slot,
        skills_required: data.skills_required,
        credit_amount: data.credit_amount,
        status: TaskStatus::Open,
        posted_by: actor.name.clone(),
        assigned_to: None,
        deadline: data.deadline,
        image_url: data.image_url,
        data_ai_hint: data.data_ai_hint,
        funding_method: data.funding_method,
        completion_requested_date: None,
        loan_seeker_payment_details_for_cod: None,
    };

    let task = tasks
        .modify(|all| {
            all.insert(0, task.clone());
            Ok(task)
        })
        .await?;
    tracing::info!("Task {} posted by {}", task.id, actor.id);
    Ok(task)
}

/// A Loan Seeker takes an open task. Only one applicant can win.
pub async fn apply_for_task(tasks: &TaskRepository, actor: &User, task_id: &str) -> AppResult<Task> {
    authorize(actor, &[Role::LoanSeeker], "Only Loan Seekers can apply for tasks.")?;

    let result = tasks
        .modify(|all| {
            let task = all
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| task_not_found(task_id))?;
            if task.status != TaskStatus::Open {
                return Err(not_open(task, "applications"));
            }
            task.status = TaskStatus::Assigned;
            task.assigned_to = Some(actor.id.clone());
            Ok(task.clone())
        })
        .await;

    match &result {
        Ok(_) => tracing::info!("Task {} assigned to applicant {}", task_id, actor.id),
        Err(e) => tracing::warn!("Application by {} for task {} rejected: {}", actor.id, task_id, e),
    }
    result
}

pub async fn admin_assign_task(
    tasks: &TaskRepository,
    users: &UserRepository,
    actor: &User,
    task_id: &str,
    user_id: &str,
) -> AppResult<Task> {
    authorize(actor, &[Role::Admin], "Only Admins can assign tasks.")?;
    let assignee = users.get(user_id).await?;

    let task = tasks
        .modify(|all| {
            let task = all
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| task_not_found(task_id))?;
            if task.status != TaskStatus::Open {
                return Err(not_open(task, "assignment"));
            }
            match &assignee {
                Some(u) if u.has_role(Role::LoanSeeker) => {}
                _ => {
                    return Err(EngineError::InvalidTarget(format!(
                        "User {} is not a Loan Seeker.",
                        user_id
                    )))
                }
            }
            task.status = TaskStatus::Assigned;
            task.assigned_to = Some(user_id.to_string());
            Ok(task.clone())
        })
        .await?;

    tracing::info!("Admin {} assigned task {} to {}", actor.id, task.id, user_id);
    Ok(task)
}

/// The assignee marks their work as done and asks for review.
pub async fn request_task_verification(
    tasks: &TaskRepository,
    actor: &User,
    task_id: &str,
) -> AppResult<Task> {
    authorize(
        actor,
        &[Role::LoanSeeker],
        "Only Loan Seekers can request task verification.",
    )?;

    let task = tasks
        .modify(|all| {
            let task = all
                .iter_mut()
                .find(|t| t.id == task_id && t.assigned_to.as_deref() == Some(actor.id.as_str()))
                .ok_or_else(|| {
                    EngineError::NotFound(format!("Task {} is not assigned to you.", task_id))
                })?;
            if !matches!(task.status, TaskStatus::Assigned | TaskStatus::InProgress) {
                return Err(EngineError::InvalidState {
                    reason: format!(
                        "Task \"{}\" cannot be submitted for verification. Its status is {}.",
                        task.title, task.status
                    ),
                    current: Some(Box::new(task.clone())),
                });
            }

            let on = today();
            task.status = TaskStatus::PendingVerification;
            task.completion_requested_date = Some(on);
            if task.is_cod_funded() {
                task.loan_seeker_payment_details_for_cod = Some(CodPaymentDetails {
                    payment_method: SIMULATED_PLATFORM_PAYMENT.to_string(),
                    paid_date: on,
                });
            }
            Ok(task.clone())
        })
        .await?;

    tracing::info!("Task {} submitted for verification by {}", task.id, actor.id);
    Ok(task)
}

// Approve and reject share their guard: the task must exist and be awaiting review.
async fn review(
    tasks: &TaskRepository,
    actor: &User,
    task_id: &str,
    outcome: TaskStatus,
) -> AppResult<Task> {
    authorize(actor, &[Role::Admin], "Only Admins can review task completion.")?;

    let task = tasks
        .modify(|all| {
            let task = all
                .iter_mut()
                .find(|t| t.id == task_id && t.status == TaskStatus::PendingVerification)
                .ok_or_else(|| {
                    EngineError::invalid_state(format!(
                        "Task {} is not awaiting verification.",
                        task_id
                    ))
                })?;
            task.status = outcome;
            Ok(task.clone())
        })
        .await?;

    tracing::info!("Admin {} moved task {} to {}", actor.id, task.id, task.status);
    Ok(task)
}

pub async fn admin_approve_task_completion(
    tasks: &TaskRepository,
    actor: &User,
    task_id: &str,
) -> AppResult<Task> {
    review(tasks, actor, task_id, TaskStatus::Completed).await
}

pub async fn admin_reject_task_completion(
    tasks: &TaskRepository,
    actor: &User,
    task_id: &str,
) -> AppResult<Task> {
    review(tasks, actor, task_id, TaskStatus::InProgress).await
}

/// Case-insensitive text search over title and description, plus an exact skill match.
pub fn filter_tasks(tasks: Vec<Task>, query: &TaskQuery) -> Vec<Task> {
    let needle = query
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());
    let skill = query.skill.as_deref().filter(|s| !s.is_empty());

    tasks
        .into_iter()
        .filter(|t| {
            needle.as_ref().map_or(true, |n| {
                t.title.to_lowercase().contains(n) || t.description.to_lowercase().contains(n)
            })
        })
        .filter(|t| skill.map_or(true, |s| t.skills_required.contains(s)))
        .collect()
}

pub async fn list_tasks(tasks: &TaskRepository, query: &TaskQuery) -> AppResult<Vec<Task>> {
    Ok(filter_tasks(tasks.list().await?, query))
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTasks {
    pub active: Vec<Task>,
    pub completed: Vec<Task>,
}

pub fn dashboard_for(actor: &User, tasks: &[Task]) -> DashboardTasks {
    let pick = |keep: &dyn Fn(&Task) -> bool| -> Vec<Task> {
        tasks.iter().filter(|t| keep(t)).cloned().collect()
    };
    let assigned_to_me = |t: &Task| t.assigned_to.as_deref() == Some(actor.id.as_str());
    let posted_by_me = |t: &Task| t.posted_by == actor.name;

    match actor.role {
        Role::LoanSeeker => DashboardTasks {
            active: pick(&|t| {
                assigned_to_me(t) && matches!(t.status, TaskStatus::Assigned | TaskStatus::InProgress)
            }),
            completed: pick(&|t| assigned_to_me(t) && t.status == TaskStatus::Completed),
        },
        Role::WorkProvider => DashboardTasks {
            active: pick(&|t| {
                posted_by_me(t)
                    && matches!(
                        t.status,
                        TaskStatus::Open | TaskStatus::Assigned | TaskStatus::InProgress
                    )
            }),
            completed: pick(&|t| posted_by_me(t) && t.status == TaskStatus::Completed),
        },
        Role::Admin => DashboardTasks::default(),
    }
}

pub async fn dashboard_tasks(tasks: &TaskRepository, actor: &User) -> AppResult<DashboardTasks> {
    Ok(dashboard_for(actor, &tasks.list().await?))
}
