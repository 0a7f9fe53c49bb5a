use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::Path;

use emod_core::canon::to_canonical_json_bytes;
use emod_core::errors::{EmodError, ErrorInfo};
use csv::WriterBuilder;
use serde::Serialize;

use crate::runbook::RunBook;

/// Appends one row per job to the append-only CSV run registry. The header
/// is written when the file is first created.
pub fn registry_append(path: impl AsRef<Path>, runbook: &RunBook) -> Result<(), EmodError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                EmodError::Io(
                    ErrorInfo::new("registry-create", "failed to create registry directory")
                        .with_context("path", parent.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        }
    }
    let file_exists = path.exists();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| {
            EmodError::Io(
                ErrorInfo::new("registry-open", "failed to open CSV registry")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    if !file_exists {
        writer
            .write_record(["date", "plan_hash", "job_id", "params", "tags"])
            .map_err(|err| wrap_csv("registry-write-header", err))?;
    }
    for job in &runbook.jobs {
        let record = vec![
            runbook.created_at.clone(),
            runbook.plan_hash.clone(),
            job.job_id.to_string(),
            canonical_string(&job.params)?,
            canonical_string(&job.tags)?,
        ];
        writer
            .write_record(&record)
            .map_err(|err| wrap_csv("registry-write-row", err))?;
    }
    writer
        .flush()
        .map_err(|err| wrap_csv("registry-flush", err.into()))?;
    Ok(())
}

fn canonical_string<T: Serialize>(value: &T) -> Result<String, EmodError> {
    let bytes = to_canonical_json_bytes(value)?;
    String::from_utf8(bytes).map_err(|err| {
        EmodError::Io(
            ErrorInfo::new("registry-canonical", "failed to encode canonical json")
                .with_hint(err.to_string()),
        )
    })
}

fn wrap_csv(code: &str, err: csv::Error) -> EmodError {
    EmodError::Io(ErrorInfo::new(code, "CSV registry failure").with_hint(err.to_string()))
}
