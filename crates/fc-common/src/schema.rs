//! Store schema versioning and compatibility.

/// Current schema version written into every store file.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (column removals, type changes)
/// - MINOR: Additive changes (new nullable columns)
/// - PATCH: Bug fixes, documentation
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Metadata key under which the schema version is recorded.
pub const SCHEMA_VERSION_KEY: &str = "fedicensus.schema_version";

/// Check if a schema version is compatible with current.
///
/// Files without a recorded version predate versioning and are accepted.
pub fn is_compatible(version: Option<&str>) -> bool {
    let Some(version) = version else {
        return true;
    };

    let major = |v: &str| v.split('.').next().and_then(|s| s.parse::<u32>().ok());

    match (major(SCHEMA_VERSION), major(version)) {
        (Some(current), Some(other)) => current == other,
        _ => false,
    }
}
