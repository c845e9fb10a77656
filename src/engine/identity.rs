//! Sign-up, login and the user directory.
use bcrypt::{hash, verify};
use serde::Serialize;
use crate::errors::{AppResult, EngineError};
use crate::models::{ProfileForm, Role, Task, User, UserProfile};
use crate::services::{LoanRepository, UserRepository};
use super::{authorize, new_id};

pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user: UserProfile,
    /// First successful login for this account; drives the welcome message only.
    pub first_login: bool,
}

/// Registers a user. The caller is not logged in by this.
pub async fn sign_up(
    users: &UserRepository,
    loans: &LoanRepository,
    request: SignUp,
    bcrypt_cost: u32,
) -> AppResult<User> {
    let password_hash = hash(request.password.as_bytes(), bcrypt_cost)?;
    let user = User {
        id: new_id("user"),
        avatar_url: Some(format!("https://avatar.vercel.sh/{}.png", request.name)),
        bio: Some(format!("Newly registered {}.", request.role)),
        name: request.name,
        email: request.email,
        password_hash,
        legacy_password: None,
        role: request.role,
        skills: Default::default(),
    };

    let created = users
        .modify(|all| {
            if all.iter().any(|u| u.email == user.email) {
                return Err(EngineError::EmailTaken);
            }
            all.push(user.clone());
            Ok(user)
        })
        .await
        .map_err(|e| {
            tracing::warn!("Sign-up rejected: {}", e);
            e
        })?;

    if created.has_role(Role::LoanSeeker) {
        loans.init_for_user(&created.id).await?;
    }
    tracing::info!("Registered {} as {}", created.id, created.role);
    Ok(created)
}

/// Checks the password against the stored hash. An account written by an
/// older client with a plaintext `password` is upgraded to a bcrypt hash on
/// its first successful login.
pub async fn login(
    users: &UserRepository,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> AppResult<LoginOutcome> {
    let user = users.find_by_email(email).await?.filter(|u| {
        // A stored hash that bcrypt cannot parse counts as a mismatch.
        verify(password, &u.password_hash).unwrap_or(false)
            || u.legacy_password.as_deref() == Some(password)
    });
    let user = match user {
        Some(user) => user,
        None => {
            tracing::warn!("Failed login for {}", email);
            return Err(EngineError::InvalidCredentials.into());
        }
    };

    if user.legacy_password.is_some() {
        upgrade_legacy_password(users, &user.id, hash(password.as_bytes(), bcrypt_cost)?).await?;
    }

    let first_login = users.mark_first_login(&user.id).await?;
    tracing::info!("User {} logged in (first login: {})", user.id, first_login);
    Ok(LoginOutcome { user: UserProfile::from(&user), first_login })
}

async fn upgrade_legacy_password(users: &UserRepository, user_id: &str, password_hash: String) -> AppResult<()> {
    users
        .modify(|all| {
            let user = all
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| EngineError::NotFound("User not found.".into()))?;
            user.password_hash = password_hash;
            user.legacy_password = None;
            Ok(())
        })
        .await?;
    tracing::info!("Replaced plaintext password of {} with a bcrypt hash", user_id);
    Ok(())
}

/// Edits name, email, bio, skills and avatar. The role never changes.
pub async fn update_profile(users: &UserRepository, actor: &User, form: ProfileForm) -> AppResult<User> {
    let updated = users
        .modify(|all| {
            if all.iter().any(|u| u.email == form.email && u.id != actor.id) {
                return Err(EngineError::EmailTaken);
            }
            let user = all
                .iter_mut()
                .find(|u| u.id == actor.id)
                .ok_or_else(|| EngineError::NotFound("User not found.".into()))?;
            user.name = form.name;
            user.email = form.email;
            user.bio = form.bio;
            user.skills = form.skills;
            user.avatar_url = form.avatar_url.filter(|url| !url.is_empty());
            Ok(user.clone())
        })
        .await?;
    tracing::info!("Updated profile of {}", updated.id);
    Ok(updated)
}

/// Loan Seekers sharing at least one skill with `task`, in directory order.
pub fn eligible_assignees<'a>(directory: &'a [User], task: &Task) -> Vec<&'a User> {
    directory
        .iter()
        .filter(|u| u.has_role(Role::LoanSeeker) && u.shares_skill_with(&task.skills_required))
        .collect()
}

pub async fn find_eligible_assignees(users: &UserRepository, task: &Task) -> AppResult<Vec<User>> {
    let directory = users.list().await?;
    Ok(eligible_assignees(&directory, task).into_iter().cloned().collect())
}

/// Admin search over the directory by role and a name/email fragment.
pub async fn list_users(
    users: &UserRepository,
    actor: &User,
    role: Option<Role>,
    search: Option<&str>,
) -> AppResult<Vec<User>> {
    authorize(actor, &[Role::Admin], "Only Admins can browse the user directory.")?;
    let needle = search.map(str::to_lowercase).filter(|s| !s.is_empty());
    Ok(users
        .list()
        .await?
        .into_iter()
        .filter(|u| role.map_or(true, |r| u.role == r))
        .filter(|u| {
            needle.as_ref().map_or(true, |n| {
                u.name.to_lowercase().contains(n) || u.email.to_lowercase().contains(n)
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use crate::engine::testing::{empty_repos, user};
    use crate::errors::AppError;
    use crate::models::TaskStatus;
    use crate::services::Repositories;

    const COST: u32 = 4;

    fn request(name: &str, email: &str, role: Role) -> SignUp {
        SignUp {
            name: name.into(),
            email: email.into(),
            password: "hunter22".into(),
            role,
        }
    }

    fn task_needing(skills: &[&str]) -> Task {
        Task {
            id: "task-1".into(),
            title: "Wire a room".into(),
            description: "Full rewiring".into(),
            address: None,
            preferred_time_slot: None,
            skills_required: skills.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            credit_amount: 500.0,
            status: TaskStatus::Open,
            posted_by: "Builder".into(),
            assigned_to: None,
            deadline: None,
            image_url: None,
            data_ai_hint: None,
            funding_method: None,
            completion_requested_date: None,
            loan_seeker_payment_details_for_cod: None,
        }
    }

    async fn signed_up(repos: &Repositories, name: &str, email: &str, role: Role) -> User {
        sign_up(&repos.users, &repos.loans, request(name, email, role), COST).await.unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_defaults() {
        let repos = empty_repos();
        let user = signed_up(&repos, "Meera", "meera@example.com", Role::LoanSeeker).await;
        assert!(user.id.starts_with("user-"));
        assert!(user.skills.is_empty());
        assert_eq!(user.bio.as_deref(), Some("Newly registered Loan Seeker."));
        assert_ne!(user.password_hash, "hunter22");
        assert!(repos.loans.for_user(&user.id).await.unwrap().is_empty());
        assert_eq!(repos.users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repos = empty_repos();
        signed_up(&repos, "Meera", "meera@example.com", Role::LoanSeeker).await;

        let err = sign_up(
            &repos.users,
            &repos.loans,
            request("Other", "meera@example.com", Role::WorkProvider),
            COST,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::EmailTaken)));
        assert_eq!(repos.users.list().await.unwrap().len(), 1);

        // Exact match only.
        signed_up(&repos, "Upper", "Meera@example.com", Role::LoanSeeker).await;
        assert_eq!(repos.users.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_login_and_first_login_flag() {
        let repos = empty_repos();
        signed_up(&repos, "Meera", "meera@example.com", Role::LoanSeeker).await;

        let first = login(&repos.users, "meera@example.com", "hunter22", COST).await.unwrap();
        assert!(first.first_login);
        assert_eq!(first.user.email, "meera@example.com");

        let again = login(&repos.users, "meera@example.com", "hunter22", COST).await.unwrap();
        assert!(!again.first_login);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let repos = empty_repos();
        signed_up(&repos, "Meera", "meera@example.com", Role::LoanSeeker).await;

        for (email, password) in [("meera@example.com", "wrong-pass"), ("nobody@example.com", "hunter22")] {
            let err = login(&repos.users, email, password, COST).await.unwrap_err();
            assert!(matches!(err, AppError::Engine(EngineError::InvalidCredentials)));
        }
    }

    #[tokio::test]
    async fn test_plaintext_account_is_upgraded_on_login() {
        let repos = empty_repos();
        let legacy = User {
            email: "old@example.com".into(),
            legacy_password: Some("pw1234".into()),
            ..user("old", Role::LoanSeeker, &[])
        };
        repos
            .users
            .modify(move |all| {
                all.push(legacy);
                Ok(())
            })
            .await
            .unwrap();

        let err = login(&repos.users, "old@example.com", "wrong-pass", COST).await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::InvalidCredentials)));

        let outcome = login(&repos.users, "old@example.com", "pw1234", COST).await.unwrap();
        assert_eq!(outcome.user.id, "old");
        let stored = repos.users.get("old").await.unwrap().unwrap();
        assert_eq!(stored.legacy_password, None);
        assert!(verify("pw1234", &stored.password_hash).unwrap());

        assert!(login(&repos.users, "old@example.com", "pw1234", COST).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_keeps_role() {
        let repos = empty_repos();
        let me = signed_up(&repos, "Meera", "meera@example.com", Role::LoanSeeker).await;
        signed_up(&repos, "Ravi", "ravi@example.com", Role::WorkProvider).await;

        let form = ProfileForm {
            name: "Meera K".into(),
            email: "meera.k@example.com".into(),
            bio: Some("Plumber".into()),
            skills: ["Plumbing".to_string()].into_iter().collect(),
            avatar_url: Some(String::new()),
        };
        let updated = update_profile(&repos.users, &me, form.clone()).await.unwrap();
        assert_eq!(updated.role, Role::LoanSeeker);
        assert_eq!(updated.name, "Meera K");
        assert_eq!(updated.avatar_url, None);
        assert!(updated.skills.contains("Plumbing"));

        let taken = ProfileForm { email: "ravi@example.com".into(), ..form };
        let err = update_profile(&repos.users, &updated, taken).await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::EmailTaken)));
    }

    #[test]
    fn test_eligible_assignees() {
        let directory = vec![
            user("s1", Role::LoanSeeker, &["Electrician", "Plumbing"]),
            user("s2", Role::LoanSeeker, &["Tutoring"]),
            user("wp", Role::WorkProvider, &["Electrician"]),
            user("s3", Role::LoanSeeker, &["Welding", "Electrician"]),
        ];
        let task = task_needing(&["Electrician"]);
        let ids: Vec<&str> = eligible_assignees(&directory, &task).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
        assert!(eligible_assignees(&directory, &task_needing(&[])).is_empty());
    }

    #[tokio::test]
    async fn test_list_users_filters() {
        let repos = empty_repos();
        signed_up(&repos, "Meera", "meera@example.com", Role::LoanSeeker).await;
        signed_up(&repos, "Ravi", "ravi@builders.in", Role::WorkProvider).await;
        signed_up(&repos, "Anil", "anil@example.com", Role::LoanSeeker).await;
        let admin = user("admin", Role::Admin, &[]);

        let seekers = list_users(&repos.users, &admin, Some(Role::LoanSeeker), None).await.unwrap();
        assert_eq!(seekers.len(), 2);
        let by_term = list_users(&repos.users, &admin, None, Some("BUILDERS")).await.unwrap();
        assert_eq!(by_term.len(), 1);
        assert_eq!(by_term[0].name, "Ravi");

        let seeker = user("s", Role::LoanSeeker, &[]);
        assert!(list_users(&repos.users, &seeker, None, None).await.is_err());
    }
}
