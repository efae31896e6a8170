//! Gateway traits the workflows depend on, and their AWS-backed implementation.
//!
//! The clone and list workflows only talk to [`RoleGateway`]. Tests substitute
//! an in-memory gateway; the binary uses [`AwsConnector`] which loads a named
//! shared-config profile.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sts::Client as StsClient;
use log::debug;

use crate::aws::iam_client::AwsIamClient;
use crate::aws::sts::caller_identity;
use crate::aws::AwsResult;
use crate::types::{CallerIdentity, RoleSnapshot};

/// IAM and STS operations needed to discover, read and recreate roles.
#[async_trait]
pub trait RoleGateway: Send + Sync {
    async fn caller_identity(&self) -> AwsResult<CallerIdentity>;

    /// All role names starting with `prefix` (every role when empty)
    async fn list_roles(&self, prefix: &str) -> AwsResult<Vec<String>>;

    async fn role_exists(&self, role_name: &str) -> AwsResult<bool>;

    async fn fetch_role(&self, role_name: &str) -> AwsResult<RoleSnapshot>;

    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> AwsResult<()>;

    async fn attach_managed_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()>;

    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()>;

    async fn tag_role(&self, role_name: &str, tags: &BTreeMap<String, String>) -> AwsResult<()>;
}

/// Opens a [`RoleGateway`] for a named credential profile.
#[async_trait]
pub trait GatewayConnector: Send + Sync {
    type Gateway: RoleGateway;

    async fn connect(&self, profile: &str) -> AwsResult<Self::Gateway>;
}

/// Gateway backed by the AWS SDK clients of one profile.
pub struct AwsGateway {
    profile: String,
    iam: AwsIamClient,
    sts: StsClient,
}

impl AwsGateway {
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

#[async_trait]
impl RoleGateway for AwsGateway {
    async fn caller_identity(&self) -> AwsResult<CallerIdentity> {
        debug!("Validating credentials for profile '{}'", self.profile);
        caller_identity(&self.sts).await
    }

    async fn list_roles(&self, prefix: &str) -> AwsResult<Vec<String>> {
        self.iam.list_roles(prefix).await
    }

    async fn role_exists(&self, role_name: &str) -> AwsResult<bool> {
        self.iam.role_exists(role_name).await
    }

    async fn fetch_role(&self, role_name: &str) -> AwsResult<RoleSnapshot> {
        debug!("Fetching role '{}' from profile '{}'", role_name, self.profile);
        self.iam.get_role_snapshot(role_name).await
    }

    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> AwsResult<()> {
        self.iam
            .create_role(role_name, trust_policy, description)
            .await
    }

    async fn attach_managed_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()> {
        self.iam.attach_managed_policy(role_name, policy_arn).await
    }

    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()> {
        self.iam
            .put_role_policy(role_name, policy_name, policy_document)
            .await
    }

    async fn tag_role(&self, role_name: &str, tags: &BTreeMap<String, String>) -> AwsResult<()> {
        self.iam.tag_role(role_name, tags).await
    }
}

/// Loads AWS configuration from the shared config/credentials files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsConnector;

#[async_trait]
impl GatewayConnector for AwsConnector {
    type Gateway = AwsGateway;

    async fn connect(&self, profile: &str) -> AwsResult<AwsGateway> {
        // Credential resolution is lazy; a bad profile surfaces on the first call.
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .profile_name(profile)
            .load()
            .await;

        Ok(AwsGateway {
            profile: profile.to_string(),
            iam: AwsIamClient::new(IamClient::new(&config)),
            sts: StsClient::new(&config),
        })
    }
}
