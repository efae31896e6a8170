//! Data model shared by the gateway, the pattern engine and the workflows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::pattern::PatternRule;

/// Everything needed to recreate a role, captured once from the source account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSnapshot {
    pub role_name: String,
    pub description: Option<String>,
    /// Normalized trust policy JSON
    pub trust_policy: String,
    /// Managed policy ARNs in the order IAM returned them
    pub managed_policies: Vec<String>,
    /// Inline policy name to normalized policy JSON
    pub inline_policies: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

/// Account and principal returned by `sts:GetCallerIdentity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

/// Roles to clone with the rule to apply, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRequest {
    pub roles: Vec<String>,
    pub rule: PatternRule,
    pub dry_run: bool,
}

/// Result of cloning one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOutcome {
    pub source_role: String,
    pub destination_role: String,
    pub error: Option<String>,
}

impl CloneOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneSummary {
    pub outcomes: Vec<CloneOutcome>,
}

impl CloneSummary {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// How a `clone` invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneRunOutcome {
    /// The user declined the confirmation prompt
    Cancelled,
    Completed(CloneSummary),
}

/// Heuristic label for a trust policy, based on substring checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustType {
    Ec2Service,
    LambdaService,
    CrossAccount,
    Custom,
}

impl TrustType {
    pub fn classify(trust_policy: &str) -> Self {
        if trust_policy.contains("ec2.amazonaws.com") {
            Self::Ec2Service
        } else if trust_policy.contains("lambda.amazonaws.com") {
            Self::LambdaService
        } else if trust_policy.contains("sts:AssumeRole") {
            Self::CrossAccount
        } else {
            Self::Custom
        }
    }
}

impl fmt::Display for TrustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ec2Service => "EC2 Service Role",
            Self::LambdaService => "Lambda Service Role",
            Self::CrossAccount => "Cross-Account Role",
            Self::Custom => "Custom Trust Policy",
        };
        f.write_str(label)
    }
}
