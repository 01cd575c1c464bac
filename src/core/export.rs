use crate::utils::error::{DashError, Result};
use serde::Serialize;

/// Serializes rows to CSV with a header taken from the field names.
pub fn rows_to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| DashError::IoError(e.into_error()))
}
