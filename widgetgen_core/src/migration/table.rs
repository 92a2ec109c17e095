//! Fixed upgrade tables and version comparison.

use tracing::trace;

/// Which version components decide whether an installed version is outdated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    Major,
    Minor,
    MajorMinor,
}

/// A parsed version: `None` marks a component that is not a number.
pub type VersionParts = Vec<Option<u64>>;

impl VersionCheck {
    /// Strict less-than on the relevant component(s). Any comparison
    /// involving a missing or non-numeric component is false.
    pub fn is_outdated(self, old: &[Option<u64>], new: &[Option<u64>]) -> bool {
        let part = |v: &[Option<u64>], i: usize| v.get(i).copied().flatten();
        let lt = |a: Option<u64>, b: Option<u64>| matches!((a, b), (Some(a), Some(b)) if a < b);
        let eq = |a: Option<u64>, b: Option<u64>| matches!((a, b), (Some(a), Some(b)) if a == b);

        match self {
            VersionCheck::Major => lt(part(old, 0), part(new, 0)),
            VersionCheck::Minor => lt(part(old, 1), part(new, 1)),
            VersionCheck::MajorMinor => {
                lt(part(old, 0), part(new, 0))
                    || (eq(part(old, 0), part(new, 0)) && lt(part(old, 1), part(new, 1)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetVersion {
    /// The dependency must be dropped from the manifest.
    Remove,
    Version(&'static str),
}

impl std::fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetVersion::Remove => write!(f, "remove"),
            TargetVersion::Version(version) => write!(f, "{version}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeEntry {
    pub name: &'static str,
    pub target: TargetVersion,
    pub check: VersionCheck,
    /// Patch file shipped with the toolchain that must be applied after install.
    pub patch: Option<&'static str>,
}

impl UpgradeEntry {
    const fn new(name: &'static str, target: TargetVersion, check: VersionCheck) -> Self {
        Self {
            name,
            target,
            check,
            patch: None,
        }
    }

    const fn with_patch(mut self, patch: &'static str) -> Self {
        self.patch = Some(patch);
        self
    }

    /// Whether `installed` must be migrated. Entries marked for removal are
    /// always outdated.
    pub fn is_outdated(&self, installed: &str) -> bool {
        let outdated = match self.target {
            TargetVersion::Remove => true,
            TargetVersion::Version(target) => self
                .check
                .is_outdated(&extract_versions(installed), &extract_versions(target)),
        };
        trace!(name = %self.name, installed = %installed, target = %self.target, outdated, "Compared dependency version");
        outdated
    }
}

use TargetVersion::{Remove, Version};
use VersionCheck::{Major, MajorMinor, Minor};

/// Upgrade table for `dependencies` and `devDependencies`.
pub const DEPENDENCY_UPGRADES: &[UpgradeEntry] = &[
    UpgradeEntry::new("react", Remove, MajorMinor),
    UpgradeEntry::new("react-dom", Remove, MajorMinor),
    UpgradeEntry::new("react-native", Remove, Minor),
    UpgradeEntry::new("@types/jest", Version("^29.0.0"), Major),
    UpgradeEntry::new("@types/react", Remove, Major),
    UpgradeEntry::new("@types/react-native", Remove, Minor),
    UpgradeEntry::new("@types/react-native-push-notification", Version("8.1.1"), MajorMinor),
    UpgradeEntry::new("@types/react-dom", Remove, Major),
    UpgradeEntry::new("@types/react-test-renderer", Version("18.0.0"), Major),
    UpgradeEntry::new("@types/enzyme-adapter-react-16", Remove, Major),
    UpgradeEntry::new("@react-native-firebase/app", Version("17.3.0"), MajorMinor),
    UpgradeEntry::new("@react-native-firebase/messaging", Version("17.3.0"), MajorMinor),
    UpgradeEntry::new("react-native-camera", Version("3.40.0"), MajorMinor)
        .with_patch("react-native-camera+3.40.0.patch"),
    UpgradeEntry::new("react-native-gesture-handler", Version("1.10.3"), MajorMinor)
        .with_patch("react-native-gesture-handler+1.10.3.patch"),
    UpgradeEntry::new("react-native-image-picker", Version("5.0.1"), Major),
    UpgradeEntry::new("react-native-maps", Version("0.31.1"), MajorMinor),
    UpgradeEntry::new("react-native-progress", Version("^5.0.0"), Major),
    UpgradeEntry::new("react-native-push-notification", Version("8.1.1"), MajorMinor),
    UpgradeEntry::new("react-native-webview", Version("11.26.1"), MajorMinor),
];

/// Pins for the `overrides` and `resolutions` groups.
pub const RESOLUTION_PINS: &[UpgradeEntry] = &[
    UpgradeEntry::new("react", Version("18.2.0"), MajorMinor),
    UpgradeEntry::new("react-dom", Version("18.2.0"), MajorMinor),
    UpgradeEntry::new("react-native", Version("0.70.7"), Minor),
    UpgradeEntry::new("@types/react", Version("18.0.0"), Major),
    UpgradeEntry::new("@types/react-dom", Version("18.0.0"), Major),
    UpgradeEntry::new("@types/react-native", Version("0.70.0"), Minor),
];

/// Splits a version range like `^0.70.7` into numeric components after
/// dropping any leading non-digit characters. Empty components count as 0.
pub fn extract_versions(version: &str) -> VersionParts {
    version
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .split('.')
        .map(|part| {
            if part.is_empty() {
                Some(0)
            } else {
                part.parse().ok()
            }
        })
        .collect()
}
