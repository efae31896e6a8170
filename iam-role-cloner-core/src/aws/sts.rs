//! STS helpers: credential validation through GetCallerIdentity.

use crate::aws::{AwsError, AwsResult};
use crate::types::CallerIdentity;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;

/// Resolve the account and principal behind the loaded credentials.
pub(crate) async fn caller_identity(client: &StsClient) -> AwsResult<CallerIdentity> {
    let response = client.get_caller_identity().send().await.map_err(|e| {
        AwsError::StsError(format!(
            "Failed to get caller identity: {}",
            DisplayErrorContext(&e)
        ))
    })?;

    let account = response
        .account()
        .ok_or_else(|| AwsError::StsError("Caller identity has no account id".to_string()))?;
    let arn = response.arn().unwrap_or_default();

    Ok(CallerIdentity {
        account: account.to_string(),
        arn: arn.to_string(),
    })
}
