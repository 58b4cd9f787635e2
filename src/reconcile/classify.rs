//! Home-pass / termination classification of placemarks.
//!
//! Two policies are available and exactly one is active per run:
//!
//! - [`ClassifierPolicy::Folder`] looks at the folder path a placemark sits
//!   in, plus a `FAT` substring in its name for termination points.
//! - [`ClassifierPolicy::NameBlacklist`] looks at the placemark name only and
//!   rejects anything that names a piece of infrastructure.
//!
//! Both are pure functions of `(name, group_label)`; geometry is never read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Verdict for a single placemark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Home-pass
    Hp,
    /// Termination point
    Fat,
    Neither,
}

/// Which rule set decides what counts as a home-pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierPolicy {
    /// Classify by folder path (HP / HOME / HOME-BIZ, FAT)
    #[default]
    Folder,
    /// Classify by placemark name against an infrastructure blacklist
    NameBlacklist,
}

impl ClassifierPolicy {
    pub fn classify(&self, name: &str, group_label: &str) -> Classification {
        match self {
            ClassifierPolicy::Folder => classify_by_folder(name, group_label),
            ClassifierPolicy::NameBlacklist => classify_by_name(name),
        }
    }
}

impl fmt::Display for ClassifierPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierPolicy::Folder => write!(f, "folder"),
            ClassifierPolicy::NameBlacklist => write!(f, "name-blacklist"),
        }
    }
}

impl FromStr for ClassifierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "folder" => Ok(ClassifierPolicy::Folder),
            "name-blacklist" | "name_blacklist" | "name" => Ok(ClassifierPolicy::NameBlacklist),
            other => Err(format!(
                "unknown classifier policy '{}' (expected 'folder' or 'name-blacklist')",
                other
            )),
        }
    }
}

/// Classify a placemark under the given policy.
pub fn classify(name: &str, group_label: &str, policy: ClassifierPolicy) -> Classification {
    policy.classify(name, group_label)
}

/// Name fragments that mark a placemark as infrastructure, never a home-pass.
const INFRASTRUCTURE_TOKENS: &[&str] = &[
    "FAT", "FDT", "POLE", "TIANG", "CLOSURE", "NODE", "SPLITTER", "ODP", "ODC", "OLT", "CABINET",
    "BOX", "JOINT", "HANDHOLE",
];

/// Name fragments that mark a placemark as a home-pass.
const HOME_TOKENS: &[&str] = &["HOME", "HOMEPASS", "HOME-BIZ"];

fn folder_has(label: &str, token: &str) -> bool {
    label.split('/').any(|segment| segment.trim().starts_with(token)) || label.ends_with(token)
}

fn classify_by_folder(name: &str, group_label: &str) -> Classification {
    let label = group_label.to_uppercase();
    let name = name.to_uppercase();

    // Checked first: a FAT under an HP folder must not become a takeout candidate
    if folder_has(&label, "FAT") || name.contains("FAT") {
        return Classification::Fat;
    }

    if folder_has(&label, "HP") || label.contains("HOME") {
        return Classification::Hp;
    }

    Classification::Neither
}

fn classify_by_name(name: &str) -> Classification {
    let name = name.trim().to_uppercase();

    if name.contains("FAT") {
        return Classification::Fat;
    }

    if INFRASTRUCTURE_TOKENS.iter().any(|t| name.contains(t)) {
        return Classification::Neither;
    }

    let looks_like_home = HOME_TOKENS.iter().any(|t| name.contains(t))
        || name.chars().next().is_some_and(|c| c.is_ascii_digit());

    if looks_like_home {
        Classification::Hp
    } else {
        Classification::Neither
    }
}
