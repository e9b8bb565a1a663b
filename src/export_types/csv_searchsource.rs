//! CSV export of the documents matched by a saved search source.

use serde_json::{Map, Value as JsonValue, json};

use super::{ExportType, ExportTypeError, JobContext, base_payload};
use crate::models::{JobParams, LicenseType};

pub struct CsvSearchSource;

impl ExportType for CsvSearchSource {
    fn id(&self) -> &'static str {
        "csv_searchsource"
    }

    fn name(&self) -> &'static str {
        "CSV"
    }

    fn job_type(&self) -> &'static str {
        "csv_searchsource"
    }

    fn job_content_extension(&self) -> &'static str {
        "csv"
    }

    fn valid_license_types(&self) -> &'static [LicenseType] {
        &[
            LicenseType::Trial,
            LicenseType::Basic,
            LicenseType::Standard,
            LicenseType::Gold,
            LicenseType::Platinum,
            LicenseType::Enterprise,
        ]
    }

    fn create_job(
        &self,
        params: &JobParams,
        ctx: &JobContext,
    ) -> Result<Map<String, JsonValue>, ExportTypeError> {
        let search_source = match &params.search_source {
            Some(JsonValue::Object(source)) => source,
            Some(_) => {
                return Err(ExportTypeError::InvalidParam(
                    "searchSource",
                    "expected an object".to_string(),
                ));
            }
            None => return Err(ExportTypeError::MissingParam("searchSource")),
        };

        let mut payload = base_payload(params, ctx);
        payload.insert("searchSource".into(), JsonValue::Object(search_source.clone()));
        payload.insert(
            "columns".into(),
            json!(params.columns.clone().unwrap_or_default()),
        );
        Ok(payload)
    }
}
