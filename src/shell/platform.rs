//! Platform detection.

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    is_ci_with_env(|key: &str| std::env::var(key).is_ok())
}

/// CI detection with a custom variable lookup.
pub fn is_ci_with_env<F>(has_var: F) -> bool
where
    F: Fn(&str) -> bool,
{
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|key| has_var(key))
}
