//! Single PNG screenshot of one app URL.

use serde_json::{Map, Value as JsonValue, json};

use super::{
    ExportType, ExportTypeError, JobContext, SCREENSHOT_LICENSES, base_payload, validate_urls,
};
use crate::models::{JobParams, LicenseType};

pub struct Png;

impl ExportType for Png {
    fn id(&self) -> &'static str {
        "PNG"
    }

    fn name(&self) -> &'static str {
        "PNG"
    }

    fn job_type(&self) -> &'static str {
        "PNG"
    }

    fn job_content_extension(&self) -> &'static str {
        "png"
    }

    fn valid_license_types(&self) -> &'static [LicenseType] {
        SCREENSHOT_LICENSES
    }

    fn create_job(
        &self,
        params: &JobParams,
        ctx: &JobContext,
    ) -> Result<Map<String, JsonValue>, ExportTypeError> {
        let url = params
            .relative_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ExportTypeError::MissingParam("relativeUrl"))?;
        validate_urls([url])?;

        let layout = params
            .layout
            .as_ref()
            .map(|l| json!(l))
            .unwrap_or_else(|| json!({ "id": "png" }));

        let mut payload = base_payload(params, ctx);
        payload.insert("layout".into(), layout);
        payload.insert("relativeUrl".into(), json!(url));
        Ok(payload)
    }
}
