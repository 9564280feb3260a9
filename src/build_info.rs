//! Version, commit and build date, generated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string, e.g. `trex-runner 0.1.0 (2026-10-19, a1b2c3d)`.
pub fn version_line() -> String {
    format!(
        "trex-runner {} ({}, {})",
        BUILD_VERSION, BUILD_DATE, BUILD_COMMIT
    )
}
