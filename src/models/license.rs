//! License model consumed by the reporting license check.

use serde::{Deserialize, Serialize};

/// License tiers understood by reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Basic,
    Standard,
    Gold,
    Platinum,
    Enterprise,
    Trial,
}

impl LicenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
            Self::Enterprise => "enterprise",
            Self::Trial => "trial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "standard" => Some(Self::Standard),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            "enterprise" => Some(Self::Enterprise),
            "trial" => Some(Self::Trial),
            _ => None,
        }
    }
}

impl std::fmt::Display for LicenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the license is currently usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Expired,
}

impl LicenseStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Current license of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct License {
    pub license_type: LicenseType,
    pub status: LicenseStatus,
}

impl License {
    pub fn active(license_type: LicenseType) -> Self {
        Self {
            license_type,
            status: LicenseStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LicenseStatus::Active
    }
}

/// Outcome of checking a license against one export type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseCheck {
    pub enable_links: bool,
    pub message: Option<String>,
}
