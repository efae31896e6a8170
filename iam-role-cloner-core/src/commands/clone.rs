//! Interactive clone workflow for the IAM Role Cloner service
//!
//! Steps run strictly in order: profile setup, pattern setup, role selection,
//! confirmation, execution. Any failure before execution aborts the run.

use crate::aws::gateway::{GatewayConnector, RoleGateway};
use crate::commands::execute::execute_clone;
use crate::commands::selection::{parse_role_count, parse_role_selection};
use crate::commands::service::RoleClonerService;
use crate::error::{RoleClonerError, RoleClonerResult};
use crate::input::InputProvider;
use crate::pattern::PatternRule;
use crate::reporter::Reporter;
use crate::types::{CloneRequest, CloneRunOutcome};

/// Values supplied up front; anything left `None` (or empty) is prompted for.
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    pub source_profile: Option<String>,
    pub dest_profile: Option<String>,
    pub source_pattern: Option<String>,
    pub dest_pattern: Option<String>,
    pub dry_run: bool,
}

/// Both profiles, opened and validated.
struct Profiles<G> {
    source_name: String,
    dest_name: String,
    source: G,
    destination: G,
}

impl<C: GatewayConnector> RoleClonerService<C> {
    /// Run the clone wizard end to end.
    ///
    /// Returns [`CloneRunOutcome::Cancelled`] when the confirmation is declined.
    /// Per-role failures are reported in the summary, not as an error.
    pub async fn clone_roles(
        &self,
        options: CloneOptions,
        input: &mut dyn InputProvider,
        reporter: &mut Reporter,
    ) -> RoleClonerResult<CloneRunOutcome> {
        reporter.header("IAM Role Cloning Wizard");
        if options.dry_run {
            reporter.warning("Running in DRY-RUN mode - no actual changes will be made");
        }

        let profiles = self
            .setup_profiles(&options, input, reporter)
            .await
            .map_err(|e| {
                reporter.error(format!("Profile validation failed: {e}"));
                e
            })?;

        let rule = setup_pattern(&options, input, reporter).map_err(|e| {
            reporter.error(format!("Pattern configuration failed: {e}"));
            e
        })?;

        let roles = select_roles(&profiles.source, &rule, input, reporter)
            .await
            .map_err(|e| {
                reporter.error(format!("Role selection failed: {e}"));
                e
            })?;

        let request = CloneRequest {
            roles,
            rule,
            dry_run: options.dry_run,
        };

        if !confirm(&profiles, &request, input, reporter)? {
            reporter.info("Operation cancelled by user");
            return Ok(CloneRunOutcome::Cancelled);
        }

        let summary = execute_clone(&profiles.source, &profiles.destination, &request, reporter).await;

        reporter.success("Role cloning completed successfully!");
        if let Some(path) = reporter.log_path().map(|p| p.display().to_string()) {
            reporter.info(format!("Log file saved: {path}"));
        }

        Ok(CloneRunOutcome::Completed(summary))
    }

    async fn setup_profiles(
        &self,
        options: &CloneOptions,
        input: &mut dyn InputProvider,
        reporter: &mut Reporter,
    ) -> RoleClonerResult<Profiles<C::Gateway>> {
        reporter.info("Step 1: Profile Configuration and Validation");
        reporter.separator();

        let source_name = resolve(
            options.source_profile.as_deref(),
            "Enter source AWS profile: ",
            input,
        )?;
        let dest_name = resolve(
            options.dest_profile.as_deref(),
            "Enter destination AWS profile: ",
            input,
        )?;
        if source_name.is_empty() {
            return Err(RoleClonerError::configuration("source profile must not be empty"));
        }
        if dest_name.is_empty() {
            return Err(RoleClonerError::configuration(
                "destination profile must not be empty",
            ));
        }

        reporter.info(format!("Validating source profile: {source_name}"));
        let source = self.connector.connect(&source_name).await.map_err(|e| {
            RoleClonerError::credentials(format!("failed to create source client: {e}"))
        })?;
        let source_identity = source.caller_identity().await.map_err(|e| {
            RoleClonerError::credentials(format!("source profile validation failed: {e}"))
        })?;
        reporter.success(format!(
            "Source profile validated - Account: {}",
            source_identity.account
        ));
        reporter.debug(format!("Source ARN: {}", source_identity.arn));

        reporter.info(format!("Validating destination profile: {dest_name}"));
        let destination = self.connector.connect(&dest_name).await.map_err(|e| {
            RoleClonerError::credentials(format!("failed to create destination client: {e}"))
        })?;
        let dest_identity = destination.caller_identity().await.map_err(|e| {
            RoleClonerError::credentials(format!("destination profile validation failed: {e}"))
        })?;
        reporter.success(format!(
            "Destination profile validated - Account: {}",
            dest_identity.account
        ));
        reporter.debug(format!("Destination ARN: {}", dest_identity.arn));

        if source_identity.account == dest_identity.account {
            reporter.warning("Source and destination are the same AWS account");
            let answer = input.next("Continue anyway? (y/n): ")?;
            if !answer.to_lowercase().starts_with('y') {
                return Err(RoleClonerError::cancelled("same account"));
            }
        }

        Ok(Profiles {
            source_name,
            dest_name,
            source,
            destination,
        })
    }
}

/// Use the supplied value when it is non-empty, otherwise prompt for it.
fn resolve(
    value: Option<&str>,
    prompt: &str,
    input: &mut dyn InputProvider,
) -> RoleClonerResult<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(v.to_string()),
        None => Ok(input.next(prompt)?),
    }
}

fn setup_pattern(
    options: &CloneOptions,
    input: &mut dyn InputProvider,
    reporter: &mut Reporter,
) -> RoleClonerResult<PatternRule> {
    reporter.info("Step 2: Pattern Configuration");
    reporter.separator();

    let source = resolve(
        options.source_pattern.as_deref(),
        "Enter source pattern (e.g., 'dev_', 'staging-'): ",
        input,
    )?;
    let destination = resolve(
        options.dest_pattern.as_deref(),
        "Enter destination pattern (e.g., 'prod_', 'live-'): ",
        input,
    )?;
    if source.is_empty() {
        return Err(RoleClonerError::configuration("source pattern must not be empty"));
    }

    let rule = PatternRule::new(source, destination);
    reporter.success(format!(
        "Pattern replacement: '{}' → '{}'",
        rule.source, rule.destination
    ));

    let example = format!("{}example_role", rule.source);
    reporter.info(format!(
        "Example transformation: {example} → {}",
        rule.rename(&example)
    ));

    Ok(rule)
}

async fn select_roles<G: RoleGateway>(
    source: &G,
    rule: &PatternRule,
    input: &mut dyn InputProvider,
    reporter: &mut Reporter,
) -> RoleClonerResult<Vec<String>> {
    reporter.info("Step 3: Role Discovery and Selection");
    reporter.separator();

    reporter.info("Discovering roles in source account...");
    let spinner = reporter.spinner("Fetching roles...");
    let discovered = source.list_roles(&rule.source).await;
    spinner.finish_and_clear();
    let discovered = discovered?;

    if discovered.is_empty() {
        reporter.warning(format!("No roles found with pattern '{}'", rule.source));
        return enter_roles_manually(input, reporter);
    }

    reporter.success(format!(
        "Found {} roles with pattern '{}'",
        discovered.len(),
        rule.source
    ));

    reporter.line("");
    reporter.line("Discovered roles:");
    for (i, role) in discovered.iter().enumerate() {
        reporter.line(format!("  {}. {} → {}", i + 1, role, rule.rename(role)));
    }

    let answer = input.next("\nEnter role numbers to clone (e.g., 1,3,5 or 'all'): ")?;
    let selected = parse_role_selection(&answer, &discovered)?;

    if selected.len() == discovered.len() && answer.trim().eq_ignore_ascii_case("all") {
        reporter.success(format!("Selected all {} roles", selected.len()));
    } else {
        reporter.success(format!("Selected {} roles", selected.len()));
    }

    Ok(selected)
}

fn enter_roles_manually(
    input: &mut dyn InputProvider,
    reporter: &mut Reporter,
) -> RoleClonerResult<Vec<String>> {
    reporter.info("Manual role entry mode");

    let count = parse_role_count(&input.next("How many roles do you want to clone? (1-20): ")?)?;

    let mut roles = Vec::with_capacity(count);
    while roles.len() < count {
        let role = input.next(&format!("Enter role name #{}: ", roles.len() + 1))?;
        if !role.is_empty() {
            roles.push(role);
        }
    }

    reporter.success(format!("Selected {} roles", roles.len()));
    Ok(roles)
}

fn confirm<G>(
    profiles: &Profiles<G>,
    request: &CloneRequest,
    input: &mut dyn InputProvider,
    reporter: &mut Reporter,
) -> RoleClonerResult<bool> {
    reporter.info("Step 4: Configuration Summary");
    reporter.separator();

    let log_file = reporter
        .log_path()
        .map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
    let verbose = reporter.is_verbose();

    reporter.line(format!("Source Profile:      {}", profiles.source_name));
    reporter.line(format!("Destination Profile: {}", profiles.dest_name));
    reporter.line(format!(
        "Pattern Replacement: '{}' → '{}'",
        request.rule.source, request.rule.destination
    ));
    reporter.line(format!("Dry Run:             {}", request.dry_run));
    reporter.line(format!("Verbose Logging:     {verbose}"));
    reporter.line(format!("Log File:            {log_file}"));
    reporter.line("");
    reporter.line("Roles to clone:");
    for (i, role) in request.roles.iter().enumerate() {
        reporter.line(format!("  {}. {} → {}", i + 1, role, request.rule.rename(role)));
    }

    let answer = input.next("\nProceed with cloning? (y/n): ")?.to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
