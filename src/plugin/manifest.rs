use crate::error::SdPackError;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Fields of `manifest.json` the toolchain cares about. Everything else the
/// host runtime reads is ignored here. Required fields are optional at parse
/// time so a partial manifest still reports what it does carry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestRecord {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,
    pub code_path: Option<String>,
    #[serde(default)]
    pub actions: Vec<Value>,
}

impl ManifestRecord {
    /// Required string fields in manifest order, paired with their JSON names.
    pub fn required_fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("Name", self.name.as_deref()),
            ("Version", self.version.as_deref()),
            ("UUID", self.uuid.as_deref()),
            ("CodePath", self.code_path.as_deref()),
        ]
    }
}

#[derive(Debug, Default)]
pub struct ManifestCheck {
    pub record: Option<ManifestRecord>,
    pub code_path: Option<PathBuf>,
    pub failures: Vec<SdPackError>,
}

impl ManifestCheck {
    pub fn ok(&self) -> bool {
        self.failures.is_empty()
    }
}

fn parse_manifest(manifest_path: &Path) -> Result<ManifestRecord, SdPackError> {
    let raw = fs::read_to_string(manifest_path).map_err(|err| {
        SdPackError::ManifestInvalid(format!("failed reading {}: {err}", manifest_path.display()))
    })?;
    serde_json::from_str::<ManifestRecord>(&raw).map_err(|err| {
        SdPackError::ManifestInvalid(format!("failed parsing {}: {err}", manifest_path.display()))
    })
}

pub fn validate_manifest(plugin_dir: &Path, manifest_path: &Path) -> ManifestCheck {
    let mut check = ManifestCheck::default();

    let record = match parse_manifest(manifest_path) {
        Ok(record) => record,
        Err(err) => {
            check.failures.push(err);
            return check;
        }
    };

    for (field, value) in record.required_fields() {
        match value {
            None => check.failures.push(SdPackError::ManifestInvalid(format!(
                "required field `{field}` is missing"
            ))),
            Some(v) if v.trim().is_empty() => check.failures.push(
                SdPackError::ManifestInvalid(format!("required field `{field}` is empty")),
            ),
            Some(_) => {}
        }
    }

    if let Some(code_path) = record.code_path.as_deref().map(str::trim)
        && !code_path.is_empty()
    {
        let resolved = plugin_dir.join(code_path);
        if !resolved.is_file() {
            check.failures.push(SdPackError::MissingAsset(format!(
                "CodePath file not found: {code_path}"
            )));
        }
        check.code_path = Some(resolved);
    }

    check.record = Some(record);
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    const COMPLETE: &str = r#"{
        "Name": "Absence.io",
        "Version": "1.0.0.0",
        "UUID": "com.cajigas.absence",
        "CodePath": "index.html",
        "Actions": [{"UUID": "com.cajigas.absence.clockin"}, {"UUID": "com.cajigas.absence.pause"}]
    }"#;

    #[test]
    fn complete_manifest_with_code_path_passes() {
        let tmp = tempdir().expect("tempdir");
        let manifest = tmp.path().join("manifest.json");
        fs::write(&manifest, COMPLETE).expect("write manifest");
        fs::write(tmp.path().join("index.html"), "<html></html>").expect("write code");

        let check = validate_manifest(tmp.path(), &manifest);
        assert!(check.ok(), "failures: {:?}", check.failures);
        let record = check.record.expect("record");
        assert_eq!(record.name.as_deref(), Some("Absence.io"));
        assert_eq!(record.version.as_deref(), Some("1.0.0.0"));
        assert_eq!(record.uuid.as_deref(), Some("com.cajigas.absence"));
        assert_eq!(record.code_path.as_deref(), Some("index.html"));
        assert_eq!(record.actions.len(), 2);
    }

    #[test]
    fn missing_uuid_is_manifest_invalid() {
        let tmp = tempdir().expect("tempdir");
        let manifest = tmp.path().join("manifest.json");
        fs::write(
            &manifest,
            r#"{"Name": "x", "Version": "1", "CodePath": "index.html", "Actions": []}"#,
        )
        .expect("write manifest");
        fs::write(tmp.path().join("index.html"), "").expect("write code");

        let check = validate_manifest(tmp.path(), &manifest);
        assert!(!check.ok());
        assert_eq!(check.failures.len(), 1);
        assert_eq!(check.failures[0].code(), ErrorCode::E002ManifestInvalid);
        assert!(check.failures[0].to_string().contains("`UUID` is missing"));

        let record = check.record.expect("partial record");
        assert_eq!(record.name.as_deref(), Some("x"));
        assert_eq!(record.code_path.as_deref(), Some("index.html"));
        assert!(record.uuid.is_none());
    }

    #[test]
    fn missing_code_path_target_is_missing_asset() {
        let tmp = tempdir().expect("tempdir");
        let manifest = tmp.path().join("manifest.json");
        fs::write(&manifest, COMPLETE).expect("write manifest");

        let check = validate_manifest(tmp.path(), &manifest);
        assert_eq!(check.failures.len(), 1);
        assert_eq!(check.failures[0].code(), ErrorCode::E001MissingAsset);
        assert!(check.record.is_some());
    }

    #[test]
    fn unreadable_manifest_is_recorded_not_raised() {
        let tmp = tempdir().expect("tempdir");
        let check = validate_manifest(tmp.path(), &tmp.path().join("manifest.json"));
        assert_eq!(check.failures.len(), 1);
        assert_eq!(check.failures[0].code(), ErrorCode::E002ManifestInvalid);
    }

    #[test]
    fn blank_required_field_is_reported() {
        let tmp = tempdir().expect("tempdir");
        let manifest = tmp.path().join("manifest.json");
        fs::write(
            &manifest,
            r#"{"Name": " ", "Version": "1", "UUID": "u", "CodePath": "index.html", "Actions": []}"#,
        )
        .expect("write manifest");
        fs::write(tmp.path().join("index.html"), "").expect("write code");

        let check = validate_manifest(tmp.path(), &manifest);
        assert_eq!(check.failures.len(), 1);
        assert!(check.failures[0].to_string().contains("`Name` is empty"));
    }

    #[test]
    fn wrongly_typed_field_rejects_the_document() {
        let tmp = tempdir().expect("tempdir");
        let manifest = tmp.path().join("manifest.json");
        fs::write(&manifest, r#"{"Name": 7, "UUID": "u"}"#).expect("write manifest");

        let check = validate_manifest(tmp.path(), &manifest);
        assert!(check.record.is_none());
        assert_eq!(check.failures[0].code(), ErrorCode::E002ManifestInvalid);
    }
}
