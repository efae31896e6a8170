//! In-memory accounts standing in for IAM/STS, shared by the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use iam_role_cloner_core::{
    AwsError, AwsResult, CallerIdentity, GatewayConnector, Reporter, RoleGateway, RoleSnapshot,
};

pub const LAMBDA_TRUST: &str = r#"{
  "Statement": [
    {
      "Action": "sts:AssumeRole",
      "Effect": "Allow",
      "Principal": {
        "Service": "lambda.amazonaws.com"
      }
    }
  ],
  "Version": "2012-10-17"
}"#;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CallerIdentity,
    ListRoles(String),
    RoleExists(String),
    FetchRole(String),
    CreateRole {
        role: String,
        trust_policy: String,
        description: String,
    },
    AttachManagedPolicy {
        role: String,
        policy_arn: String,
    },
    PutInlinePolicy {
        role: String,
        policy_name: String,
        document: String,
    },
    TagRole {
        role: String,
        tags: BTreeMap<String, String>,
    },
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreateRole { .. }
                | Self::AttachManagedPolicy { .. }
                | Self::PutInlinePolicy { .. }
                | Self::TagRole { .. }
        )
    }
}

#[derive(Debug, Default)]
pub struct Account {
    pub account_id: String,
    pub roles: BTreeMap<String, RoleSnapshot>,
    pub calls: Vec<Call>,
    pub failing_policy_arns: HashSet<String>,
    pub fail_tagging: bool,
    /// Destination role names whose CreateRole call fails
    pub fail_create: HashSet<String>,
    /// Inline policy names whose PutRolePolicy call fails
    pub fail_put: HashSet<String>,
    /// Role names whose existence check fails with something other than NoSuchEntity
    pub fail_exists: HashSet<String>,
}

/// Gateway over a shared [`Account`]; clones see the same state.
#[derive(Debug, Clone)]
pub struct MockGateway {
    state: Arc<Mutex<Account>>,
}

impl MockGateway {
    pub fn new(account_id: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(Account {
                account_id: account_id.to_string(),
                ..Account::default()
            })),
        }
    }

    pub fn with_role(self, snapshot: RoleSnapshot) -> Self {
        self.account()
            .roles
            .insert(snapshot.role_name.clone(), snapshot);
        self
    }

    pub fn account(&self) -> MutexGuard<'_, Account> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.account().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    pub fn role(&self, name: &str) -> Option<RoleSnapshot> {
        self.account().roles.get(name).cloned()
    }

    fn record(&self, call: Call) {
        self.account().calls.push(call);
    }
}

#[async_trait]
impl RoleGateway for MockGateway {
    async fn caller_identity(&self) -> AwsResult<CallerIdentity> {
        self.record(Call::CallerIdentity);
        let account = self.account().account_id.clone();
        Ok(CallerIdentity {
            arn: format!("arn:aws:iam::{account}:user/tester"),
            account,
        })
    }

    async fn list_roles(&self, prefix: &str) -> AwsResult<Vec<String>> {
        self.record(Call::ListRoles(prefix.to_string()));
        Ok(self
            .account()
            .roles
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn role_exists(&self, role_name: &str) -> AwsResult<bool> {
        self.record(Call::RoleExists(role_name.to_string()));
        let account = self.account();
        if account.fail_exists.contains(role_name) {
            return Err(AwsError::IamError(format!(
                "Failed to check whether role '{role_name}' exists: Throttling: Rate exceeded"
            )));
        }
        Ok(account.roles.contains_key(role_name))
    }

    async fn fetch_role(&self, role_name: &str) -> AwsResult<RoleSnapshot> {
        self.record(Call::FetchRole(role_name.to_string()));
        self.role(role_name).ok_or_else(|| {
            AwsError::IamError(format!(
                "Failed to get role '{role_name}': NoSuchEntity: role not found"
            ))
        })
    }

    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> AwsResult<()> {
        self.record(Call::CreateRole {
            role: role_name.to_string(),
            trust_policy: trust_policy.to_string(),
            description: description.to_string(),
        });
        let mut account = self.account();
        if account.fail_create.contains(role_name) {
            return Err(AwsError::IamError(format!(
                "Failed to create role '{role_name}': LimitExceeded: Cannot exceed quota for RolesPerAccount"
            )));
        }
        account.roles.insert(
            role_name.to_string(),
            RoleSnapshot {
                role_name: role_name.to_string(),
                description: Some(description.to_string()),
                trust_policy: trust_policy.to_string(),
                managed_policies: Vec::new(),
                inline_policies: BTreeMap::new(),
                tags: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn attach_managed_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()> {
        self.record(Call::AttachManagedPolicy {
            role: role_name.to_string(),
            policy_arn: policy_arn.to_string(),
        });
        let mut account = self.account();
        if account.failing_policy_arns.contains(policy_arn) {
            return Err(AwsError::IamError(format!(
                "Failed to attach policy '{policy_arn}' to role '{role_name}': NoSuchEntity"
            )));
        }
        if let Some(role) = account.roles.get_mut(role_name) {
            role.managed_policies.push(policy_arn.to_string());
        }
        Ok(())
    }

    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()> {
        self.record(Call::PutInlinePolicy {
            role: role_name.to_string(),
            policy_name: policy_name.to_string(),
            document: policy_document.to_string(),
        });
        let mut account = self.account();
        if account.fail_put.contains(policy_name) {
            return Err(AwsError::IamError(format!(
                "Failed to put inline policy '{policy_name}' for role '{role_name}': MalformedPolicyDocument"
            )));
        }
        if let Some(role) = account.roles.get_mut(role_name) {
            role.inline_policies
                .insert(policy_name.to_string(), policy_document.to_string());
        }
        Ok(())
    }

    async fn tag_role(&self, role_name: &str, tags: &BTreeMap<String, String>) -> AwsResult<()> {
        self.record(Call::TagRole {
            role: role_name.to_string(),
            tags: tags.clone(),
        });
        let mut account = self.account();
        if account.fail_tagging {
            return Err(AwsError::IamError(format!(
                "Failed to tag role '{role_name}': AccessDenied"
            )));
        }
        if let Some(role) = account.roles.get_mut(role_name) {
            role.tags.extend(tags.clone());
        }
        Ok(())
    }
}

/// Maps profile names to accounts.
#[derive(Debug, Default)]
pub struct MockConnector {
    profiles: HashMap<String, MockGateway>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, profile: &str, gateway: &MockGateway) -> Self {
        self.profiles.insert(profile.to_string(), gateway.clone());
        self
    }
}

#[async_trait]
impl GatewayConnector for MockConnector {
    type Gateway = MockGateway;

    async fn connect(&self, profile: &str) -> AwsResult<MockGateway> {
        self.profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| AwsError::ConfigError(format!("profile '{profile}' not found")))
    }
}

pub fn role(name: &str) -> RoleSnapshot {
    RoleSnapshot {
        role_name: name.to_string(),
        description: Some(format!("{name} description")),
        trust_policy: LAMBDA_TRUST.to_string(),
        managed_policies: Vec::new(),
        inline_policies: BTreeMap::new(),
        tags: BTreeMap::new(),
    }
}

/// Console sink whose contents can be read back.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn reporter(verbose: bool, log_path: Option<&Path>) -> (Reporter, Capture) {
    let capture = Capture::default();
    let reporter = Reporter::with_console(verbose, log_path, Box::new(capture.clone())).unwrap();
    (reporter, capture)
}
