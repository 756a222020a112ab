//! Persistence implementations
//!
//! File-based implementations of the repository traits.

mod file_config_repo;
mod file_task_repo;

pub use file_config_repo::FileConfigTreeRepository;
pub use file_task_repo::{FileTaskRepository, PROJECTS_DIR};
