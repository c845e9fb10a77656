//! Per-entity repositories over a [`KeyValueStore`].
//!
//! Each collection is stored whole under one key and rewritten whole on
//! every change. Writers to the same collection are serialized by a
//! per-repository lock, so a read-check-write (such as "is this task still
//! Open?") cannot interleave with another writer in this process.
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use crate::errors::{AppResult, EngineResult};
use crate::models::{LedgerEntry, Loan, Task, User};
use crate::seed::SeedData;
use super::store::KeyValueStore;

pub mod keys {
    pub const ALL_USERS: &str = "allUsers";
    pub const ALL_SYSTEM_LOANS: &str = "allSystemLoans";
    pub const USER_TASKS: &str = "userTasks";
    pub const LEDGER_ENTRIES: &str = "ledgerEntries";

    pub fn user_loans(user_id: &str) -> String {
        format!("userLoans-{}", user_id)
    }

    pub fn first_login_complete(user_id: &str) -> String {
        format!("firstLoginComplete-{}", user_id)
    }
}

// Reads a JSON list, falling back when the key is absent or unreadable.
async fn load_list<T>(store: &dyn KeyValueStore, key: &str, fallback: &[T]) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Clone,
{
    match store.get(key).await? {
        Some(raw) => match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::error!("Failed to parse {} from store, using fallback: {}", key, e);
                Ok(fallback.to_vec())
            }
        },
        None => Ok(fallback.to_vec()),
    }
}

async fn save_list<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> AppResult<()> {
    store.set(key, serde_json::to_string(items)?).await
}

/// One JSON list under one key with a single-writer lock.
struct Collection<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    fallback: Arc<Vec<T>>,
    fallback_when_empty: bool,
    writer: Arc<Mutex<()>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            fallback: self.fallback.clone(),
            fallback_when_empty: self.fallback_when_empty,
            writer: self.writer.clone(),
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn new(store: Arc<dyn KeyValueStore>, key: &'static str, fallback: Vec<T>) -> Self {
        Self {
            store,
            key,
            fallback: Arc::new(fallback),
            fallback_when_empty: false,
            writer: Arc::new(Mutex::new(())),
        }
    }

    async fn list(&self) -> AppResult<Vec<T>> {
        let items = load_list(self.store.as_ref(), self.key, &self.fallback).await?;
        if items.is_empty() && self.fallback_when_empty {
            return Ok(self.fallback.to_vec());
        }
        Ok(items)
    }

    /// Runs `change` on the current list and persists the result. Nothing is
    /// written when `change` fails.
    async fn modify<R, F>(&self, change: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> EngineResult<R>,
    {
        let _guard = self.writer.lock().await;
        let mut items = self.list().await?;
        let outcome = change(&mut items)?;
        save_list(self.store.as_ref(), self.key, &items).await?;
        Ok(outcome)
    }

    async fn seed_if_missing(&self) -> AppResult<bool> {
        let _guard = self.writer.lock().await;
        if self.store.exists(self.key).await? {
            return Ok(false);
        }
        save_list(self.store.as_ref(), self.key, &self.fallback).await?;
        tracing::info!("Seeded {} with {} entries", self.key, self.fallback.len());
        Ok(true)
    }
}

/// The user directory plus first-login flags.
#[derive(Clone)]
pub struct UserRepository {
    users: Collection<User>,
}

impl UserRepository {
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    pub async fn get(&self, user_id: &str) -> AppResult<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.id == user_id))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.email == email))
    }

    pub async fn modify<R, F>(&self, change: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<User>) -> EngineResult<R>,
    {
        self.users.modify(change).await
    }

    /// Sets the first-login flag; true when it was not set before.
    pub async fn mark_first_login(&self, user_id: &str) -> AppResult<bool> {
        let key = keys::first_login_complete(user_id);
        let _guard = self.users.writer.lock().await;
        if self.users.store.exists(&key).await? {
            return Ok(false);
        }
        self.users.store.set(&key, "true".to_string()).await?;
        Ok(true)
    }
}

/// System-wide loan list plus the per-user mirrors.
#[derive(Clone)]
pub struct LoanRepository {
    loans: Collection<Loan>,
}

impl LoanRepository {
    pub async fn all(&self) -> AppResult<Vec<Loan>> {
        self.loans.list().await
    }

    /// Personal list of one user; seed loans of that user when absent or unreadable.
    pub async fn for_user(&self, user_id: &str) -> AppResult<Vec<Loan>> {
        let seeded: Vec<Loan> = self
            .loans
            .fallback
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        load_list(self.loans.store.as_ref(), &keys::user_loans(user_id), &seeded).await
    }

    /// Writes an empty personal list for a new borrower.
    pub async fn init_for_user(&self, user_id: &str) -> AppResult<()> {
        let _guard = self.loans.writer.lock().await;
        save_list::<Loan>(self.loans.store.as_ref(), &keys::user_loans(user_id), &[]).await
    }

    /// Builds a loan from the user's current personal list and appends it to
    /// both the system-wide list and that personal list. The personal list
    /// never receives the same loan id twice.
    pub async fn originate<F>(&self, user_id: &str, build: F) -> AppResult<Loan>
    where
        F: FnOnce(&[Loan]) -> EngineResult<Loan>,
    {
        let _guard = self.loans.writer.lock().await;
        let mut personal = self.for_user(user_id).await?;
        let loan = build(&personal)?;

        let mut all = self.all().await?;
        all.push(loan.clone());
        save_list(self.loans.store.as_ref(), self.loans.key, &all).await?;

        if !personal.iter().any(|l| l.id == loan.id) {
            personal.push(loan.clone());
            save_list(self.loans.store.as_ref(), &keys::user_loans(user_id), &personal).await?;
        }
        Ok(loan)
    }
}

/// The single global task list, newest first.
#[derive(Clone)]
pub struct TaskRepository {
    tasks: Collection<Task>,
}

impl TaskRepository {
    pub async fn list(&self) -> AppResult<Vec<Task>> {
        self.tasks.list().await
    }

    pub async fn get(&self, task_id: &str) -> AppResult<Option<Task>> {
        Ok(self.list().await?.into_iter().find(|t| t.id == task_id))
    }

    pub async fn modify<R, F>(&self, change: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<Task>) -> EngineResult<R>,
    {
        self.tasks.modify(change).await
    }
}

/// Recorded repayment entries.
#[derive(Clone)]
pub struct LedgerRepository {
    entries: Collection<LedgerEntry>,
}

impl LedgerRepository {
    pub async fn list(&self) -> AppResult<Vec<LedgerEntry>> {
        self.entries.list().await
    }
}

/// Every repository, built over one shared store.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub loans: LoanRepository,
    pub tasks: TaskRepository,
    pub ledger: LedgerRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn KeyValueStore>, seed: SeedData) -> Self {
        let mut users = Collection::new(store.clone(), keys::ALL_USERS, seed.users);
        // An empty directory is treated like a missing one.
        users.fallback_when_empty = true;

        Self {
            users: UserRepository { users },
            loans: LoanRepository {
                loans: Collection::new(store.clone(), keys::ALL_SYSTEM_LOANS, seed.loans),
            },
            tasks: TaskRepository {
                tasks: Collection::new(store.clone(), keys::USER_TASKS, seed.tasks),
            },
            ledger: LedgerRepository {
                entries: Collection::new(store, keys::LEDGER_ENTRIES, seed.ledger),
            },
        }
    }

    /// Writes the seed collections under any key that is still absent.
    pub async fn seed_missing(&self) -> AppResult<()> {
        self.users.users.seed_if_missing().await?;
        self.loans.loans.seed_if_missing().await?;
        self.tasks.tasks.seed_if_missing().await?;
        self.ledger.entries.seed_if_missing().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, EngineError};
    use crate::seed::SEED_SEEKER_ID;
    use crate::services::InMemoryStore;

    fn repos_with(store: &InMemoryStore) -> Repositories {
        Repositories::new(Arc::new(store.clone()), SeedData::demo("hash"))
    }

    #[tokio::test]
    async fn test_seed_missing_writes_each_key_once() {
        let store = InMemoryStore::new();
        let repos = repos_with(&store);
        repos.seed_missing().await.unwrap();
        assert!(store.exists(keys::ALL_USERS).await.unwrap());
        assert!(store.exists(keys::USER_TASKS).await.unwrap());

        repos
            .tasks
            .modify(|tasks| {
                tasks.clear();
                Ok(())
            })
            .await
            .unwrap();
        repos.seed_missing().await.unwrap();
        assert!(repos.tasks.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_collection_falls_back_to_seed() {
        let store = InMemoryStore::new();
        store.set(keys::USER_TASKS, "{not json".into()).await.unwrap();
        store.set(&keys::user_loans(SEED_SEEKER_ID), "[oops".into()).await.unwrap();
        let repos = repos_with(&store);

        assert_eq!(repos.tasks.list().await.unwrap().len(), 6);
        assert_eq!(repos.loans.for_user(SEED_SEEKER_ID).await.unwrap().len(), 1);
        assert!(repos.loans.for_user("someone-else").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_directory_reads_as_seed() {
        let store = InMemoryStore::new();
        store.set(keys::ALL_USERS, "[]".into()).await.unwrap();
        let repos = repos_with(&store);
        assert_eq!(repos.users.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_modify_writes_nothing() {
        let store = InMemoryStore::new();
        let repos = repos_with(&store);
        let result = repos
            .tasks
            .modify(|tasks| {
                tasks.clear();
                Err::<(), _>(EngineError::NotFound("Task not found.".into()))
            })
            .await;
        assert!(matches!(result, Err(AppError::Engine(EngineError::NotFound(_)))));
        assert!(!store.exists(keys::USER_TASKS).await.unwrap());
    }

    #[tokio::test]
    async fn test_first_login_flag_is_one_shot() {
        let store = InMemoryStore::new();
        let repos = repos_with(&store);
        assert!(repos.users.mark_first_login("u1").await.unwrap());
        assert!(!repos.users.mark_first_login("u1").await.unwrap());
        assert!(store.exists("firstLoginComplete-u1").await.unwrap());
    }
}
