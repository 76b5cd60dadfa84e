/// Database models for ProjeX
///
/// # Models
///
/// - `user`: accounts with role and hashed credentials
/// - `project`: task containers with a single owner
/// - `task`: work items with an unrestricted three-state status
///
/// Each model owns its CRUD operations; handlers never write SQL directly.
pub mod project;
pub mod task;
pub mod user;
