//! Role cloning execution
//!
//! Each role is cloned independently. A role that fails is recorded and the
//! loop moves on. Managed policy, inline policy and tag failures only produce
//! warnings. Nothing already created is rolled back, so a failure after
//! CreateRole leaves a partially populated role behind.

use chrono::Local;

use crate::aws::gateway::RoleGateway;
use crate::error::{RoleClonerError, RoleClonerResult};
use crate::pattern::ENVIRONMENT_TAG;
use crate::reporter::Reporter;
use crate::types::{CloneOutcome, CloneRequest, CloneSummary, RoleSnapshot};

const POLICY_PREVIEW_CHARS: usize = 100;

/// Clone every role of the request from `source` into `destination`.
///
/// In dry-run mode `destination` is never called.
pub async fn execute_clone<G: RoleGateway>(
    source: &G,
    destination: &G,
    request: &CloneRequest,
    reporter: &mut Reporter,
) -> CloneSummary {
    reporter.info("Step 5: Role Cloning Process");
    reporter.separator();

    let total = request.roles.len();
    let mut summary = CloneSummary::default();

    for (i, role) in request.roles.iter().enumerate() {
        let new_role = request.rule.rename(role);
        reporter.progress(i + 1, total, format!("Cloning: {role} → {new_role}"));

        let result = clone_single_role(source, destination, role, &new_role, request, reporter).await;
        let error = match result {
            Ok(()) => {
                if request.dry_run {
                    reporter.success(format!("Dry run checked: {role} → {new_role}"));
                } else {
                    reporter.success(format!("Successfully cloned: {role} → {new_role}"));
                }
                None
            }
            Err(e) => {
                reporter.error(format!("Failed to clone {role}: {e}"));
                Some(e.to_string())
            }
        };

        summary.outcomes.push(CloneOutcome {
            source_role: role.clone(),
            destination_role: new_role,
            error,
        });
    }

    reporter.separator();
    reporter.success(format!(
        "Cloning completed: {}/{} roles successful",
        summary.success_count(),
        summary.total()
    ));
    if request.dry_run {
        reporter.info("This was a dry run. Use without --dry-run to perform actual cloning.");
    }

    summary
}

async fn clone_single_role<G: RoleGateway>(
    source: &G,
    destination: &G,
    source_role: &str,
    dest_role: &str,
    request: &CloneRequest,
    reporter: &mut Reporter,
) -> RoleClonerResult<()> {
    reporter.debug(format!("  Getting role information for: {source_role}"));
    let snapshot = source.fetch_role(source_role).await?;
    reporter.debug(format!(
        "  Retrieved role info: {} managed policies, {} inline policies, {} tags",
        snapshot.managed_policies.len(),
        snapshot.inline_policies.len(),
        snapshot.tags.len()
    ));

    let target = request.rule.transform_snapshot(&snapshot);
    warn_on_arn_collisions(&snapshot, request, reporter);

    if request.dry_run {
        report_dry_run(&snapshot, &target, request, reporter);
        return Ok(());
    }

    if destination.role_exists(dest_role).await? {
        return Err(RoleClonerError::RoleAlreadyExists(dest_role.to_string()));
    }

    reporter.debug("  Creating new role...");
    reporter.debug(format!("  Original trust policy: {}", snapshot.trust_policy));
    reporter.debug(format!("  Processed trust policy: {}", target.trust_policy));

    let description = format!(
        "Cloned from {source_role} on {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if let Err(e) = destination
        .create_role(dest_role, &target.trust_policy, &description)
        .await
    {
        if reporter.is_verbose() {
            reporter.error(format!("  Failed trust policy content: {}", target.trust_policy));
        }
        return Err(e.into());
    }
    reporter.debug("  Role created successfully");

    reporter.debug(format!(
        "  Attaching {} managed policies...",
        target.managed_policies.len()
    ));
    for policy_arn in &target.managed_policies {
        match destination.attach_managed_policy(dest_role, policy_arn).await {
            Ok(()) => reporter.debug(format!("    Attached: {policy_arn}")),
            Err(e) => reporter.warning(format!(
                "    Failed to attach managed policy {policy_arn}: {e}"
            )),
        }
    }

    reporter.debug(format!(
        "  Creating {} inline policies...",
        target.inline_policies.len()
    ));
    for (policy_name, document) in &target.inline_policies {
        reporter.debug(format!("    Creating inline policy: {policy_name}"));
        reporter.debug(format!(
            "    Policy document preview: {}...",
            document.chars().take(POLICY_PREVIEW_CHARS).collect::<String>()
        ));
        match destination
            .put_inline_policy(dest_role, policy_name, document)
            .await
        {
            Ok(()) => reporter.debug(format!("    Created inline policy: {policy_name}")),
            Err(e) => reporter.warning(format!(
                "    Failed to create inline policy {policy_name}: {e}"
            )),
        }
    }

    if !target.tags.is_empty() {
        reporter.debug(format!("  Copying {} tags...", target.tags.len()));
        reporter.debug(format!("    Processed tags: {:?}", target.tags));
        match destination.tag_role(dest_role, &target.tags).await {
            Ok(()) => reporter.debug("    Tags copied successfully"),
            Err(e) => reporter.warning(format!("    Failed to copy tags: {e}")),
        }
    }

    Ok(())
}

fn warn_on_arn_collisions(snapshot: &RoleSnapshot, request: &CloneRequest, reporter: &mut Reporter) {
    let documents = std::iter::once(&snapshot.trust_policy).chain(snapshot.inline_policies.values());
    for document in documents {
        for arn in request.rule.arn_collisions(document) {
            reporter.warning(format!(
                "  Pattern '{}' matches outside the resource part of {arn}; it will be rewritten",
                request.rule.source
            ));
        }
    }
}

fn report_dry_run(
    snapshot: &RoleSnapshot,
    target: &RoleSnapshot,
    request: &CloneRequest,
    reporter: &mut Reporter,
) {
    reporter.info("  [DRY RUN] Would create role and copy policies/tags");
    reporter.debug(format!(
        "  [DRY RUN] Original trust policy: {}",
        snapshot.trust_policy
    ));
    reporter.debug(format!(
        "  [DRY RUN] Processed trust policy: {}",
        target.trust_policy
    ));

    if !target.managed_policies.is_empty() {
        reporter.debug(format!(
            "  [DRY RUN] Would attach {} managed policies:",
            target.managed_policies.len()
        ));
        for policy_arn in &target.managed_policies {
            reporter.debug(format!("    - {policy_arn}"));
        }
    }

    if !snapshot.inline_policies.is_empty() {
        reporter.debug(format!(
            "  [DRY RUN] Would create {} inline policies:",
            snapshot.inline_policies.len()
        ));
        for policy_name in snapshot.inline_policies.keys() {
            let new_name = request.rule.rename(policy_name);
            reporter.debug(format!("    - {policy_name} → {new_name}"));
        }
    }

    if !snapshot.tags.is_empty() {
        reporter.debug(format!(
            "  [DRY RUN] Would copy {} tags:",
            snapshot.tags.len()
        ));
        for (key, value) in &snapshot.tags {
            let new_value = target.tags.get(key).map_or("", String::as_str);
            if key == ENVIRONMENT_TAG || new_value != value {
                reporter.debug(format!("    - {key}: {value} → {new_value}"));
            } else {
                reporter.debug(format!("    - {key}: {value}"));
            }
        }
    }
}
