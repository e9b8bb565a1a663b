//! License check for export types.

use crate::export_types::ExportType;
use crate::models::{License, LicenseCheck};

/// Decide whether `license` allows generating reports of `export_type`.
///
/// `None` means license information is currently unavailable.
pub fn check_license(license: Option<&License>, export_type: &dyn ExportType) -> LicenseCheck {
    let Some(license) = license else {
        return LicenseCheck {
            enable_links: false,
            message: Some(
                "You cannot use Reporting because license information is not available at this time."
                    .to_string(),
            ),
        };
    };

    if !license.is_active() {
        return LicenseCheck {
            enable_links: false,
            message: Some(format!(
                "You cannot use Reporting because your {} license has expired.",
                license.license_type
            )),
        };
    }

    if !export_type
        .valid_license_types()
        .contains(&license.license_type)
    {
        return LicenseCheck {
            enable_links: false,
            message: Some(format!(
                "Your {} license does not support {} Reporting. Please upgrade your license.",
                license.license_type,
                export_type.name()
            )),
        };
    }

    LicenseCheck {
        enable_links: true,
        message: None,
    }
}
