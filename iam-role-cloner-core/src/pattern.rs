//! Literal pattern substitution over role names, policy documents and tags.
//!
//! Every rewrite goes through [`PatternRule::apply`], a whole-string literal
//! replacement. There is no regex, word-boundary or policy-grammar awareness:
//! a pattern that happens to occur inside an ARN, an account id or a region is
//! rewritten too. [`PatternRule::arn_collisions`] finds the ARNs where that
//! happens outside the resource part so callers can warn about them.
//!
//! Replacement is not invertible in general. Rewriting `src -> dst` and then
//! `dst -> src` only restores the input when `dst` does not contain `src` and
//! the input did not already contain `dst`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::RoleSnapshot;

/// Tag key whose value is replaced wholesale instead of substituted.
pub const ENVIRONMENT_TAG: &str = "Environment";

const SEPARATORS: &[char] = &['_', '-', '.'];

/// A source/destination substring pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub source: String,
    pub destination: String,
}

impl PatternRule {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Replace every occurrence of the source pattern.
    ///
    /// An empty source pattern leaves the text untouched.
    pub fn apply(&self, text: &str) -> String {
        if self.source.is_empty() {
            return text.to_string();
        }
        text.replace(&self.source, &self.destination)
    }

    pub fn rename(&self, name: &str) -> String {
        self.apply(name)
    }

    pub fn replace_in_json(&self, document: &str) -> String {
        self.apply(document)
    }

    /// Value written to the `Environment` tag: the destination pattern
    /// without trailing separators (`prod_` becomes `prod`).
    pub fn environment_value(&self) -> String {
        self.destination.trim_end_matches(SEPARATORS).to_string()
    }

    pub fn transform_tag(&self, key: &str, value: &str) -> String {
        if key == ENVIRONMENT_TAG {
            self.environment_value()
        } else {
            self.apply(value)
        }
    }

    pub fn transform_tags(&self, tags: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        tags.iter()
            .map(|(key, value)| (key.clone(), self.transform_tag(key, value)))
            .collect()
    }

    /// Build the destination view of a snapshot.
    ///
    /// Managed policy ARNs are kept as-is. The description is dropped since the
    /// clone gets a generated one.
    pub fn transform_snapshot(&self, snapshot: &RoleSnapshot) -> RoleSnapshot {
        RoleSnapshot {
            role_name: self.rename(&snapshot.role_name),
            description: None,
            trust_policy: self.replace_in_json(&snapshot.trust_policy),
            managed_policies: snapshot.managed_policies.clone(),
            inline_policies: snapshot
                .inline_policies
                .iter()
                .map(|(name, document)| (self.rename(name), self.replace_in_json(document)))
                .collect(),
            tags: self.transform_tags(&snapshot.tags),
        }
    }

    /// ARNs in `text` whose partition, service, region or account segment
    /// contains the source pattern. Rewriting those segments changes which
    /// account or region the ARN points at, which is rarely intended.
    pub fn arn_collisions(&self, text: &str) -> Vec<String> {
        if self.source.is_empty() {
            return Vec::new();
        }
        let mut found = Vec::new();
        for (start, _) in text.match_indices("arn:") {
            let arn: String = text[start..]
                .chars()
                .take_while(|c| !matches!(c, '"' | ',' | ']' | '}') && !c.is_whitespace())
                .collect();
            let header_len = arn
                .match_indices(':')
                .nth(4)
                .map_or(arn.len(), |(idx, _)| idx + 1);
            if arn[..header_len].contains(&self.source) && !found.contains(&arn) {
                found.push(arn);
            }
        }
        found
    }
}

/// Rewrite a role or policy name with the pattern.
pub fn generate_new_role_name(original_name: &str, source: &str, destination: &str) -> String {
    PatternRule::new(source, destination).rename(original_name)
}

/// Rewrite a JSON policy document with the pattern.
pub fn replace_pattern_in_json(document: &str, source: &str, destination: &str) -> String {
    PatternRule::new(source, destination).replace_in_json(document)
}
