//! Normalization of IAM policy documents returned by the service.

use crate::aws::{AwsError, AwsResult};
use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Normalize a policy document as returned by IAM.
///
/// IAM returns trust and inline policy documents URL-encoded. The text is
/// percent-decoded (the raw string is used when decoding does not produce
/// UTF-8), parsed to validate it is JSON, then re-serialized with two-space
/// indentation and sorted keys so pattern substitution sees one stable form.
pub(crate) fn normalize_policy_document(raw: &str) -> AwsResult<String> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    let value: Value = serde_json::from_str(&decoded).map_err(|e| {
        AwsError::PolicyError(format!(
            "invalid JSON after decoding: {e} (original: {raw})"
        ))
    })?;

    serde_json::to_string_pretty(&value)
        .map_err(|e| AwsError::PolicyError(format!("Failed to re-serialize policy: {e}")))
}
