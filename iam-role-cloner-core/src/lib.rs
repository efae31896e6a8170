//! This crate provides the core logic for the IAM Role Cloner:
//! - Reading roles (trust policy, managed and inline policies, tags) from a source profile
//! - Literal pattern substitution over names, policy documents and tags
//! - The interactive clone wizard and role listing
//!

mod aws;
mod build_info;
pub mod commands;
mod error;
mod input;
mod pattern;
mod reporter;
pub mod types;

// Re-exports for a small, focused public API
pub use aws::gateway::{AwsConnector, AwsGateway, GatewayConnector, RoleGateway};
pub use aws::{AwsError, AwsResult};
pub use build_info::BuildInfo;
pub use commands::{
    execute_clone, filter_roles, parse_role_count, parse_role_selection, CloneOptions,
    ListOptions, RoleClonerService,
};
pub use error::{RoleClonerError, RoleClonerResult};
pub use input::{InputProvider, ScriptedInput, StdinInput};
pub use pattern::{generate_new_role_name, replace_pattern_in_json, PatternRule, ENVIRONMENT_TAG};
pub use reporter::{Level, Reporter};
pub use types::{
    CallerIdentity, CloneOutcome, CloneRequest, CloneRunOutcome, CloneSummary, RoleSnapshot,
    TrustType,
};
