use axum::{
    extract::{Query, State},
    Json,
};
use tower_sessions::Session;
use crate::config::Config;
use crate::engine::{identity, stats, tasks};
use crate::errors::AppResult;
use crate::models::{ApiResponse, UserProfile, UserQuery};
use crate::services::Repositories;
use super::session_user;

pub async fn task_dashboard(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
) -> AppResult<Json<ApiResponse<tasks::DashboardTasks>>> {
    let actor = session_user(&session, &repos.users).await?;
    tracing::info!("Serving task dashboard for {} ({})", actor.id, actor.role);

    let sections = tasks::dashboard_tasks(&repos.tasks, &actor).await?;
    tracing::debug!(
        "Dashboard for {}: {} active, {} completed",
        actor.id,
        sections.active.len(),
        sections.completed.len()
    );
    Ok(Json(ApiResponse::ok(sections)))
}

pub async fn admin_stats(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
) -> AppResult<Json<ApiResponse<stats::AdminStats>>> {
    let actor = session_user(&session, &repos.users).await?;
    let summary = stats::admin_stats(&repos.loans, &repos.tasks, &actor).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

pub async fn list_users(
    State((repos, _config)): State<(Repositories, Config)>,
    session: Session,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    let actor = session_user(&session, &repos.users).await?;
    let users = identity::list_users(&repos.users, &actor, query.role, query.search.as_deref()).await?;
    Ok(Json(ApiResponse::ok(users.iter().map(UserProfile::from).collect())))
}
