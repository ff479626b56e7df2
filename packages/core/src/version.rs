//! Version information for wsctl

/// Get the current version string
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the long version string with build information
///
/// Build metadata is injected by CI through `WSCTL_GIT_HASH` and
/// `WSCTL_BUILD_DATE`; local builds report "unknown".
pub fn get_version_long() -> String {
    let git_hash = option_env!("WSCTL_GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("WSCTL_BUILD_DATE").unwrap_or("unknown");

    format!("{} (git: {git_hash}, built: {build_date})", get_version())
}
