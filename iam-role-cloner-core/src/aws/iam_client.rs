//! AWS IAM client wrapper for role discovery, snapshotting and recreation
//!
//! Each method maps to one IAM API (plus its paginator where the API pages)
//! and wraps failures with the operation and the role or policy involved.
//! Nothing here retries.

use std::collections::BTreeMap;

use crate::aws::policy_document::normalize_policy_document;
use crate::aws::{AwsError, AwsResult};
use crate::types::RoleSnapshot;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::types::Tag;
use aws_sdk_iam::Client as IamClient;
use log::debug;

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }

    /// List every role name in the account, keeping those starting with `prefix`.
    pub async fn list_roles(&self, prefix: &str) -> AwsResult<Vec<String>> {
        let mut roles = Vec::new();
        let mut pages = self.client.list_roles().into_paginator().send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                AwsError::IamError(format!("Failed to list roles: {}", DisplayErrorContext(&e)))
            })?;
            debug!("ListRoles page returned {} roles", page.roles().len());

            roles.extend(
                page.roles()
                    .iter()
                    .map(|role| role.role_name())
                    .filter(|name| prefix.is_empty() || name.starts_with(prefix))
                    .map(str::to_string),
            );
        }

        Ok(roles)
    }

    /// Whether a role with this name exists. Only `NoSuchEntity` counts as absent.
    pub async fn role_exists(&self, role_name: &str) -> AwsResult<bool> {
        match self.client.get_role().role_name(role_name).send().await {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_no_such_entity_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(AwsError::IamError(format!(
                "Failed to check whether role '{role_name}' exists: {}",
                DisplayErrorContext(&e)
            ))),
        }
    }

    /// Capture trust policy, managed policies, inline policies and tags of a role.
    pub async fn get_role_snapshot(&self, role_name: &str) -> AwsResult<RoleSnapshot> {
        let response = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to get role '{role_name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let role = response
            .role()
            .ok_or_else(|| AwsError::IamError(format!("GetRole returned no role for '{role_name}'")))?;

        let raw_trust = role.assume_role_policy_document().ok_or_else(|| {
            AwsError::PolicyError(format!("Role '{role_name}' has no trust policy"))
        })?;
        let trust_policy = normalize_policy_document(raw_trust).map_err(|e| {
            AwsError::PolicyError(format!(
                "Failed to process trust policy of role '{role_name}': {e}"
            ))
        })?;

        let managed_policies = self.list_managed_policies(role_name).await?;
        let inline_policies = self.get_inline_policies(role_name).await?;
        let tags = self.list_role_tags(role_name).await?;

        Ok(RoleSnapshot {
            role_name: role.role_name().to_string(),
            description: role
                .description()
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            trust_policy,
            managed_policies,
            inline_policies,
            tags,
        })
    }

    async fn list_managed_policies(&self, role_name: &str) -> AwsResult<Vec<String>> {
        let mut arns = Vec::new();
        let mut pages = self
            .client
            .list_attached_role_policies()
            .role_name(role_name)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to list managed policies of role '{role_name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;
            arns.extend(
                page.attached_policies()
                    .iter()
                    .filter_map(|p| p.policy_arn())
                    .map(str::to_string),
            );
        }

        Ok(arns)
    }

    async fn get_inline_policies(&self, role_name: &str) -> AwsResult<BTreeMap<String, String>> {
        let mut names = Vec::new();
        let mut pages = self
            .client
            .list_role_policies()
            .role_name(role_name)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to list inline policies of role '{role_name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;
            names.extend(page.policy_names().iter().cloned());
        }

        let mut policies = BTreeMap::new();
        for policy_name in names {
            let response = self
                .client
                .get_role_policy()
                .role_name(role_name)
                .policy_name(&policy_name)
                .send()
                .await
                .map_err(|e| {
                    AwsError::IamError(format!(
                        "Failed to get inline policy '{policy_name}' of role '{role_name}': {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            let document = normalize_policy_document(response.policy_document()).map_err(|e| {
                AwsError::PolicyError(format!(
                    "Failed to process inline policy '{policy_name}' of role '{role_name}': {e}"
                ))
            })?;
            policies.insert(policy_name, document);
        }

        Ok(policies)
    }

    async fn list_role_tags(&self, role_name: &str) -> AwsResult<BTreeMap<String, String>> {
        let response = self
            .client
            .list_role_tags()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to list tags of role '{role_name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(response
            .tags()
            .iter()
            .map(|tag| (tag.key().to_string(), tag.value().to_string()))
            .collect())
    }

    pub async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> AwsResult<()> {
        let mut request = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(trust_policy);
        if !description.is_empty() {
            request = request.description(description);
        }

        request.send().await.map_err(|e| {
            AwsError::IamError(format!(
                "Failed to create role '{role_name}': {}",
                DisplayErrorContext(&e)
            ))
        })?;
        Ok(())
    }

    pub async fn attach_managed_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to attach policy '{policy_arn}' to role '{role_name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    pub async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()> {
        self.client
            .put_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .policy_document(policy_document)
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to put role policy '{policy_name}' on role '{role_name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    pub async fn tag_role(&self, role_name: &str, tags: &BTreeMap<String, String>) -> AwsResult<()> {
        if tags.is_empty() {
            return Ok(());
        }

        let iam_tags = tags
            .iter()
            .map(|(key, value)| {
                Tag::builder()
                    .key(key)
                    .value(value)
                    .build()
                    .map_err(|e| AwsError::IamError(format!("Failed to build IAM tag '{key}': {e}")))
            })
            .collect::<AwsResult<Vec<_>>>()?;

        self.client
            .tag_role()
            .role_name(role_name)
            .set_tags(Some(iam_tags))
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to tag role '{role_name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}
