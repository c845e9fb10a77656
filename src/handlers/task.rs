use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;
use crate::config::Config;
use crate::engine::{authorize, identity, pricing, tasks};
use crate::errors::{AppError, AppResult, EngineError};
use crate::models::{
    ApiResponse, AssignTaskForm, PostTaskForm, Role, Task, TaskQuery, UserProfile,
};
use crate::services::Repositories;
use super::session_user;

pub async fn list_tasks(
    State((repos, _config)): State<(Repositories, Config)>,
    Query(query): Query<TaskQuery>,
) -> AppResult<Json<ApiResponse<Vec<Task>>>> {
    let found = tasks::list_tasks(&repos.tasks, &query).await?;
    tracing::debug!("Task query {:?} matched {} tasks", query, found.len());
    Ok(Json(ApiResponse::ok(found)))
}

pub async fn post_task(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Json(form): Json<PostTaskForm>,
) -> AppResult<Response> {
    let actor = session_user(&session, &repos.users).await?;
    form.validate().map_err(AppError::Validation)?;

    let estimated = pricing::estimate_credit(&form.skills_required);
    if estimated == 0 {
        return Err(AppError::Validation(
            "Please select at least one skill to determine the task credit amount.".into(),
        ));
    }
    let task = tasks::post_task(&repos.tasks, &actor, form.into_new_task(estimated as f64)).await?;
    let body = ApiResponse::ok_with_message(task, "Task posted.");
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub async fn apply_task(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Path(task_id): Path<String>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let actor = session_user(&session, &repos.users).await?;
    let task = tasks::apply_for_task(&repos.tasks, &actor, &task_id).await?;
    let message = format!("You have been assigned \"{}\".", task.title);
    Ok(Json(ApiResponse::ok_with_message(task, message)))
}

pub async fn assign_task(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Path(task_id): Path<String>,
    Json(form): Json<AssignTaskForm>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let actor = session_user(&session, &repos.users).await?;
    let task =
        tasks::admin_assign_task(&repos.tasks, &repos.users, &actor, &task_id, &form.user_id).await?;
    Ok(Json(ApiResponse::ok_with_message(task, "Task assigned.")))
}

pub async fn eligible_assignees(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Path(task_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    let actor = session_user(&session, &repos.users).await?;
    authorize(&actor, &[Role::Admin], "Only Admins can assign tasks.")?;

    let task = repos
        .tasks
        .get(&task_id)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("Task {} not found.", task_id)))?;
    let eligible = identity::find_eligible_assignees(&repos.users, &task).await?;
    Ok(Json(ApiResponse::ok(eligible.iter().map(UserProfile::from).collect())))
}

pub async fn request_verification(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Path(task_id): Path<String>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let actor = session_user(&session, &repos.users).await?;
    let task = tasks::request_task_verification(&repos.tasks, &actor, &task_id).await?;
    Ok(Json(ApiResponse::ok_with_message(task, "Verification requested.")))
}

pub async fn approve_task(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Path(task_id): Path<String>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let actor = session_user(&session, &repos.users).await?;
    let task = tasks::admin_approve_task_completion(&repos.tasks, &actor, &task_id).await?;
    Ok(Json(ApiResponse::ok_with_message(task, "Task completion approved.")))
}

pub async fn reject_task(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Path(task_id): Path<String>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let actor = session_user(&session, &repos.users).await?;
    let task = tasks::admin_reject_task_completion(&repos.tasks, &actor, &task_id).await?;
    Ok(Json(ApiResponse::ok_with_message(task, "Task sent back for rework.")))
}
