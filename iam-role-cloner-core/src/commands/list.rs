//! Role listing for the IAM Role Cloner service

use crate::aws::gateway::{GatewayConnector, RoleGateway};
use crate::commands::service::RoleClonerService;
use crate::error::{RoleClonerError, RoleClonerResult};
use crate::reporter::Reporter;
use crate::types::{RoleSnapshot, TrustType};

const DESCRIPTION_MAX_CHARS: usize = 80;
const TAG_VALUE_MAX_CHARS: usize = 30;
const MANAGED_POLICIES_SHOWN_IN_FULL: usize = 5;
const MANAGED_POLICIES_SHOWN_TRUNCATED: usize = 3;

/// Options for listing roles in a single profile.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub profile: String,
    /// Case-insensitive substring filter
    pub pattern: Option<String>,
    /// Fetch and print policies, tags and trust type per role
    pub details: bool,
    pub sort: bool,
}

impl<C: GatewayConnector> RoleClonerService<C> {
    /// List the roles of a profile, returning the names that were displayed.
    pub async fn list_roles(
        &self,
        options: &ListOptions,
        reporter: &mut Reporter,
    ) -> RoleClonerResult<Vec<String>> {
        reporter.header(format!("IAM Roles in Profile: {}", options.profile));

        reporter.info(format!("Connecting to AWS profile: {}", options.profile));
        let gateway = self.connector.connect(&options.profile).await.map_err(|e| {
            RoleClonerError::credentials(format!("failed to create AWS client: {e}"))
        })?;

        reporter.debug("Validating AWS credentials...");
        let identity = gateway.caller_identity().await.map_err(|e| {
            RoleClonerError::credentials(format!("failed to validate credentials: {e}"))
        })?;
        reporter.success(format!("Connected to AWS Account: {}", identity.account));
        reporter.debug(format!("User/Role ARN: {}", identity.arn));

        reporter.info("Discovering IAM roles...");
        let spinner = reporter.spinner("Fetching roles...");
        let listed = gateway.list_roles("").await;
        spinner.finish_and_clear();
        let mut roles = listed?;

        let pattern = options.pattern.as_deref().filter(|p| !p.is_empty());
        match pattern {
            Some(pattern) => {
                reporter.info(format!("Filtering roles by pattern: '{pattern}'"));
                roles = filter_roles(roles, pattern);
                reporter.info(format!("Found {} roles matching pattern", roles.len()));
            }
            None => reporter.info(format!("Found {} total roles", roles.len())),
        }

        if roles.is_empty() {
            reporter.warning("No roles found");
            return Ok(roles);
        }

        if options.sort {
            reporter.debug("Sorting roles alphabetically...");
            roles.sort();
        }

        reporter.separator();
        if options.details {
            display_detailed(&gateway, &roles, reporter).await;
        } else {
            display_simple(&roles, pattern, reporter);
        }

        reporter.separator();
        reporter.success(format!("Listed {} roles successfully", roles.len()));
        Ok(roles)
    }
}

fn display_simple(roles: &[String], pattern: Option<&str>, reporter: &mut Reporter) {
    reporter.line("");
    reporter.line("Role Names:");
    reporter.line("=".repeat(51));
    for (i, role) in roles.iter().enumerate() {
        let name = pattern.map_or_else(|| role.clone(), |p| highlight_pattern(role, p));
        reporter.line(format!("{:>3}. {name}", i + 1));
    }
}

async fn display_detailed<G: RoleGateway>(gateway: &G, roles: &[String], reporter: &mut Reporter) {
    reporter.line("");
    reporter.line("Detailed Role Information:");
    reporter.line("=".repeat(81));

    let total = roles.len();
    for (i, role) in roles.iter().enumerate() {
        reporter.line("");
        reporter.line(format!("[{}/{total}] {role}", i + 1));
        reporter.line("-".repeat(role.chars().count() + 10));

        reporter.debug(format!("Getting details for role: {role}"));
        let spinner = reporter.spinner(format!("Getting details for {role}..."));
        let fetched = gateway.fetch_role(role).await;
        spinner.finish_and_clear();

        match fetched {
            Ok(snapshot) => {
                for line in role_detail_lines(&snapshot) {
                    reporter.line(line);
                }
            }
            Err(e) => reporter.line(format!("Error getting role details: {e}")),
        }
    }
}

/// Lines printed for one role in detailed mode.
fn role_detail_lines(snapshot: &RoleSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Description: {}",
            describe(snapshot.description.as_deref())
        ),
        format!("Managed Policies: {}", snapshot.managed_policies.len()),
    ];

    let managed = &snapshot.managed_policies;
    if managed.len() <= MANAGED_POLICIES_SHOWN_IN_FULL {
        lines.extend(
            managed
                .iter()
                .map(|arn| format!("    • {}", policy_display_name(arn))),
        );
    } else {
        lines.extend(
            managed
                .iter()
                .take(MANAGED_POLICIES_SHOWN_TRUNCATED)
                .map(|arn| format!("    • {}", policy_display_name(arn))),
        );
        lines.push(format!(
            "    • ... and {} more",
            managed.len() - MANAGED_POLICIES_SHOWN_TRUNCATED
        ));
    }

    lines.push(format!("Inline Policies: {}", snapshot.inline_policies.len()));
    lines.extend(snapshot.inline_policies.keys().map(|name| format!("    • {name}")));

    lines.push(format!("Tags: {}", snapshot.tags.len()));
    lines.extend(
        snapshot
            .tags
            .iter()
            .map(|(key, value)| format!("    • {key}: {}", truncate(value, TAG_VALUE_MAX_CHARS))),
    );

    lines.push(format!(
        "Trust: {}",
        TrustType::classify(&snapshot.trust_policy)
    ));
    lines
}

/// Keep roles whose name contains `pattern`, ignoring case.
pub fn filter_roles(roles: Vec<String>, pattern: &str) -> Vec<String> {
    let needle = pattern.to_lowercase();
    roles
        .into_iter()
        .filter(|role| role.to_lowercase().contains(&needle))
        .collect()
}

/// Wrap exact (case-sensitive) occurrences of `pattern` in `**`.
fn highlight_pattern(role: &str, pattern: &str) -> String {
    role.replace(pattern, &format!("**{pattern}**"))
}

fn describe(description: Option<&str>) -> String {
    match description {
        None | Some("") => "(No description)".to_string(),
        Some(text) => truncate(text, DESCRIPTION_MAX_CHARS),
    }
}

/// Last `/`-separated segment of a policy ARN.
fn policy_display_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
