use crate::config::InspectionConfig;
use crate::ports::outbound::RepositoryStore;
use crate::shared::error::InspectionError;
use crate::shared::Result;
use tracing::error;

/// Package type and configured file patterns of a repository.
///
/// # Errors
/// `InspectionError::Configuration` when the repository has no package type or
/// no patterns are configured for it; an empty pattern set would match every
/// file in the repository.
pub fn configured_patterns<S: RepositoryStore>(
    store: &S,
    config: &InspectionConfig,
    repo_key: &str,
) -> Result<(String, Vec<String>)> {
    let Some(package_type) = store.package_type(repo_key)? else {
        error!(repo_key, "Repository has no package type");
        return Err(InspectionError::configuration(
            repo_key,
            "The repository has no package type. Inspection cannot be performed.",
        )
        .into());
    };

    let patterns = config.patterns_for(&package_type);
    if patterns.is_empty() {
        error!(repo_key, package_type = %package_type, "No patterns configured for package type");
        return Err(InspectionError::configuration(
            repo_key,
            format!(
                "Package type '{}' is unsupported or has no patterns configured",
                package_type
            ),
        )
        .into());
    }

    Ok((package_type, patterns))
}
