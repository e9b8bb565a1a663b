//! Multi-page PDF built from screenshots of one or more app URLs.

use serde_json::{Map, Value as JsonValue, json};

use super::{
    ExportType, ExportTypeError, JobContext, SCREENSHOT_LICENSES, base_payload, validate_urls,
};
use crate::models::{JobParams, LicenseType};

pub struct PrintablePdf;

impl ExportType for PrintablePdf {
    fn id(&self) -> &'static str {
        "printablePdf"
    }

    fn name(&self) -> &'static str {
        "PDF"
    }

    fn job_type(&self) -> &'static str {
        "printable_pdf"
    }

    fn job_content_extension(&self) -> &'static str {
        "pdf"
    }

    fn valid_license_types(&self) -> &'static [LicenseType] {
        SCREENSHOT_LICENSES
    }

    fn create_job(
        &self,
        params: &JobParams,
        ctx: &JobContext,
    ) -> Result<Map<String, JsonValue>, ExportTypeError> {
        let urls = params
            .relative_urls
            .as_ref()
            .filter(|urls| !urls.is_empty())
            .ok_or(ExportTypeError::MissingParam("relativeUrls"))?;
        validate_urls(urls.iter().map(String::as_str))?;

        let layout = params
            .layout
            .as_ref()
            .map(|l| json!(l))
            .unwrap_or_else(|| json!({ "id": "preserve_layout" }));

        let mut payload = base_payload(params, ctx);
        payload.insert("layout".into(), layout);
        payload.insert(
            "objects".into(),
            JsonValue::Array(urls.iter().map(|u| json!({ "relativeUrl": u })).collect()),
        );
        Ok(payload)
    }
}
