//! AWS SDK integration: IAM/STS client wrappers, policy document normalization,
//! and the gateway traits the workflows are written against.

pub(crate) mod gateway;
pub(crate) mod iam_client;
pub(crate) mod policy_document;
pub(crate) mod sts;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    ConfigError(String),
    #[error("IAM client error: {0}")]
    IamError(String),
    #[error("STS client error: {0}")]
    StsError(String),
    #[error("Policy document error: {0}")]
    PolicyError(String),
}

pub type AwsResult<T> = Result<T, AwsError>;
