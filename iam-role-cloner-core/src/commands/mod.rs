//! Commands module - service layer for IAM Role Cloner operations

mod clone;
mod execute;
mod list;
mod selection;
pub(crate) mod service;

pub use clone::CloneOptions;
pub use execute::execute_clone;
pub use list::{filter_roles, ListOptions};
pub use selection::{parse_role_count, parse_role_selection, MAX_MANUAL_ROLES};
pub use service::RoleClonerService;
