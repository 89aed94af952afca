//! `build-meta.json`: when the leaderboard data was last regenerated, and by whom.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::json::{self, ExportError, Layout};

pub const DEFAULT_OUTPUT: &str = "public/build-meta.json";
pub const UNKNOWN_USER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMeta {
    pub build_date: String,
    pub build_time: String,
    pub build_timestamp: String,
    pub last_updated_by: String,
}

impl BuildMeta {
    pub fn new(now: DateTime<Utc>, user: impl Into<String>) -> Self {
        let build_date = now.format("%Y-%m-%d").to_string();
        let build_time = now.format("%H:%M:%S").to_string();
        Self {
            build_timestamp: format!("{build_date} {build_time}"),
            build_date,
            build_time,
            last_updated_by: user.into(),
        }
    }
}

/// `git config user.name`, if git is available and the name is set.
pub fn git_user_name() -> Option<String> {
    let output = Command::new("git")
        .args(["config", "user.name"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!name.is_empty()).then_some(name)
}

pub fn write_build_meta(path: &Path, meta: &BuildMeta) -> Result<(), ExportError> {
    json::write_file(path, meta, Layout::Pretty)
}
