mod store;
mod redis_service;
pub mod repository;

pub use store::{InMemoryStore, KeyValueStore};
pub use redis_service::RedisService;
pub use repository::{
    LedgerRepository, LoanRepository, Repositories, TaskRepository, UserRepository,
};
