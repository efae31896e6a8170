//! Version and build metadata shown by the `version` command.

use serde::Serialize;

const FEATURES: &[&str] = &[
    "Clone IAM roles between AWS accounts",
    "Pattern replacement in names and policies",
    "Dry-run mode for safe testing",
    "Timestamped log file of every run",
    "Interactive and command-line modes",
    "Role discovery and listing",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub git_commit: String,
    pub build_date: String,
    pub rustc_version: String,
    /// `<os>/<arch>` of the running binary
    pub platform: String,
}

impl BuildInfo {
    pub fn new(
        version: impl Into<String>,
        git_commit: impl Into<String>,
        build_date: impl Into<String>,
        rustc_version: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            git_commit: git_commit.into(),
            build_date: build_date.into(),
            rustc_version: rustc_version.into(),
            platform: format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }

    pub fn summary(&self) -> String {
        format!("IAM Role Cloner v{}", self.version)
    }

    pub fn detailed_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "IAM Role Cloner".to_string(),
            "==================".to_string(),
            format!("Version:      {}", self.version),
            format!("Git Commit:   {}", self.git_commit),
            format!("Build Date:   {}", self.build_date),
            format!("Rust Version: {}", self.rustc_version),
            format!("Platform:     {}", self.platform),
            String::new(),
            "Features:".to_string(),
        ];
        lines.extend(FEATURES.iter().map(|feature| format!("  - {feature}")));
        lines
    }
}
