use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Float64Builder, LargeListArray, ListArray,
    ListBuilder,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use super::model::ArrayValue;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// ArrayArchive – named arrays in a single-row Parquet file
// ---------------------------------------------------------------------------

/// A set of named arrays, persisted as one Parquet row with one column per key.
///
/// Column layout:
/// * 1-D array → `List<Float64>`
/// * 2-D array → `List<List<Float64>>`, outer list = rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayArchive {
    arrays: BTreeMap<String, ArrayValue>,
}

impl ArrayArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ArrayValue) {
        self.arrays.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ArrayValue> {
        self.arrays.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `archive` to `path`, creating or truncating the file.
pub fn write_archive(path: &Path, archive: &ArrayArchive) -> Result<()> {
    if archive.is_empty() {
        return Err(Error::format(path, "refusing to write an archive with no arrays"));
    }

    let columns: Vec<(&str, ArrayRef)> = archive
        .arrays
        .iter()
        .map(|(key, value)| (key.as_str(), build_column(value)))
        .collect();
    let batch = RecordBatch::try_from_iter(columns)
        .map_err(|e| Error::format(path, format!("building record batch: {e}")))?;

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(|e| Error::format(path, format!("creating parquet writer: {e}")))?;
    writer
        .write(&batch)
        .map_err(|e| Error::format(path, format!("writing parquet batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::format(path, format!("closing parquet writer: {e}")))?;

    log::debug!(
        "Wrote archive {} with keys {:?}",
        path.display(),
        archive.keys().collect::<Vec<_>>()
    );
    Ok(())
}

fn build_column(value: &ArrayValue) -> ArrayRef {
    match value {
        ArrayValue::Vector(values) => {
            let mut builder = ListBuilder::new(Float64Builder::new());
            builder.values().append_slice(values);
            builder.append(true);
            Arc::new(builder.finish())
        }
        ArrayValue::Matrix(rows) => {
            let mut builder = ListBuilder::new(ListBuilder::new(Float64Builder::new()));
            for row in rows {
                let inner = builder.values();
                inner.values().append_slice(row);
                inner.append(true);
            }
            builder.append(true);
            Arc::new(builder.finish())
        }
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read every array stored in the archive at `path`.
pub fn read_archive(path: &Path) -> Result<ArrayArchive> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound {
            path: PathBuf::from(path),
        },
        _ => Error::io(path, e),
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::format(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| Error::format(path, format!("building parquet reader: {e}")))?;

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| Error::format(path, format!("reading parquet record batch: {e}")))?;
        if batch.num_rows() == 0 {
            continue;
        }

        let schema = batch.schema();
        let mut archive = ArrayArchive::new();
        for (idx, field) in schema.fields().iter().enumerate() {
            let value = extract_array(batch.column(idx), 0)
                .map_err(|msg| Error::format(path, format!("key '{}': {msg}", field.name())))?;
            archive.insert(field.name().clone(), value);
        }
        return Ok(archive);
    }

    Err(Error::format(path, "archive contains no rows"))
}

// -- Arrow helpers --

/// Decode the list cell at `row` as a 1-D or 2-D array.
fn extract_array(col: &ArrayRef, row: usize) -> std::result::Result<ArrayValue, String> {
    let values = list_value(col, row)?;
    match values.data_type() {
        DataType::List(_) | DataType::LargeList(_) => {
            let rows = (0..values.len())
                .map(|i| list_value(&values, i).and_then(|r| extract_f64(&r)))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ArrayValue::Matrix(rows))
        }
        _ => extract_f64(&values).map(ArrayValue::Vector),
    }
}

/// The child array of a List or LargeList column at `row`.
fn list_value(col: &ArrayRef, row: usize) -> std::result::Result<ArrayRef, String> {
    if col.is_null(row) {
        return Err("null value in list column".to_string());
    }
    match col.data_type() {
        DataType::List(_) => col
            .as_any()
            .downcast_ref::<ListArray>()
            .map(|arr| arr.value(row))
            .ok_or_else(|| "expected ListArray".to_string()),
        DataType::LargeList(_) => col
            .as_any()
            .downcast_ref::<LargeListArray>()
            .map(|arr| arr.value(row))
            .ok_or_else(|| "expected LargeListArray".to_string()),
        other => Err(format!("expected List or LargeList column, got {other:?}")),
    }
}

fn extract_f64(values: &ArrayRef) -> std::result::Result<Vec<f64>, String> {
    if values.null_count() > 0 {
        return Err("array contains null values".to_string());
    }
    if let Some(f64_arr) = values.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.values().to_vec())
    } else if let Some(f32_arr) = values.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.values().iter().map(|&v| v as f64).collect())
    } else {
        Err(format!(
            "list inner type is {:?}, expected Float64 or Float32",
            values.data_type()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "linear_gaussian_archive_{}_{}.parquet",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        path
    }

    #[test]
    fn mixed_arrays_survive_a_round_trip() {
        let path = unique_path("mixed");
        let mut archive = ArrayArchive::new();
        archive.insert("mean", ArrayValue::Vector(vec![0.1, -2.5]));
        archive.insert(
            "samples",
            ArrayValue::Matrix(vec![vec![1.0, 2.0], vec![f64::MIN_POSITIVE, 1e300]]),
        );
        archive.insert("empty", ArrayValue::Matrix(Vec::new()));

        write_archive(&path, &archive).unwrap();
        let loaded = read_archive(&path).unwrap();
        assert_eq!(loaded, archive);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = unique_path("missing");
        assert!(matches!(read_archive(&path), Err(Error::NotFound { .. })));
    }

    #[test]
    fn garbage_file_is_format_error() {
        let path = unique_path("garbage");
        std::fs::write(&path, b"definitely not parquet").unwrap();
        assert!(matches!(read_archive(&path), Err(Error::Format { .. })));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_parent_directory_is_io_error() {
        let mut path = unique_path("no_parent");
        path.push("nested.parquet");
        let mut archive = ArrayArchive::new();
        archive.insert("x", ArrayValue::Vector(vec![1.0]));
        assert!(matches!(write_archive(&path, &archive), Err(Error::Io { .. })));
    }
}
