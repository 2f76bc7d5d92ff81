/// Build details embedded by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub timestamp: &'static str,
    pub profile: &'static str,
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("MONTHLY_BUDGET_BUILD_HASH").unwrap_or("unknown"),
        timestamp: option_env!("MONTHLY_BUDGET_BUILD_TIMESTAMP").unwrap_or("unknown"),
        profile: option_env!("MONTHLY_BUDGET_BUILD_PROFILE").unwrap_or("unknown"),
    }
}

impl std::fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "monthly_budget {} ({} {}, built {})",
            self.version, self.git_hash, self.profile, self.timestamp
        )
    }
}
