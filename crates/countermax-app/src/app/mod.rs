//! Use cases over the configuration tree and task files

pub mod catalog_service;
pub mod session;
pub mod survey_service;
pub mod task_service;
pub mod user_service;

pub use session::ConfigSession;
