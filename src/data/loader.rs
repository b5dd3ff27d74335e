use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, Int32Array, Int64Array, LargeListArray, ListArray, ListBuilder,
    StringArray, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Int32Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{DatasetError, ImageDataset, ImageRecord};

const COLUMNS: [&str; 5] = ["id", "name", "category", "tags", "year"];
const TAG_SEPARATOR: &str = ";";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Load an image catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columns `id`, `name`, `category`, `tags` (list), `year`
/// * `.json`    – `[{ "id": 1, "name": "...", "category": "...", "tags": [...], "year": 2023 }, ...]`
/// * `.csv`     – same columns, `tags` holding semicolon-separated values
pub fn load_file(path: &Path) -> Result<ImageDataset> {
    match extension(path).as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Write a catalog in the format implied by the extension.
pub fn write_file(path: &Path, dataset: &ImageDataset) -> Result<()> {
    match extension(path).as_str() {
        "parquet" | "pq" => write_parquet(path, dataset),
        "json" => write_json(path, dataset),
        "csv" => write_csv(path, dataset),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<ImageDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<ImageRecord> =
        serde_json::from_str(&text).context("parsing JSON image records")?;
    Ok(ImageDataset::from_records(records)?)
}

fn write_json(path: &Path, dataset: &ImageDataset) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, dataset.records()).context("writing JSON")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV layout: header row `id,name,category,tags,year` in any order.
/// `tags` holds semicolon-separated values: `"ocean;sunset"`.
fn load_csv(path: &Path) -> Result<ImageDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    };
    let id_idx = position("id")?;
    let name_idx = position("name")?;
    let category_idx = position("category")?;
    let tags_idx = position("tags")?;
    let year_idx = position("year")?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        // Header is line 1.
        let fallback_line = row_no as u64 + 2;
        let row = result.with_context(|| format!("CSV line {fallback_line}"))?;
        let line = row.position().map_or(fallback_line, |p| p.line());
        let raw = |idx: usize| row.get(idx).unwrap_or("");
        let number = |idx: usize| raw(idx).trim();

        let id = number(id_idx)
            .parse::<i64>()
            .with_context(|| format!("CSV line {line}: '{}' is not a valid id", number(id_idx)))?;
        let year = number(year_idx).parse::<i32>().with_context(|| {
            format!("CSV line {line}: '{}' is not a valid year", number(year_idx))
        })?;

        records.push(ImageRecord {
            id,
            name: raw(name_idx).to_string(),
            category: raw(category_idx).to_string(),
            tags: split_tags(raw(tags_idx)),
            year,
        });
    }

    Ok(ImageDataset::from_records(records)?)
}

fn split_tags(s: &str) -> Vec<String> {
    s.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags must survive the `;` join and the per-tag trim on read.
fn check_csv_tags(rec: &ImageRecord) -> Result<(), DatasetError> {
    for tag in &rec.tags {
        if tag.is_empty() || tag.contains(TAG_SEPARATOR) || tag.trim() != tag {
            return Err(DatasetError::UnencodableTag {
                id: rec.id,
                tag: tag.clone(),
            });
        }
    }
    Ok(())
}

fn write_csv(path: &Path, dataset: &ImageDataset) -> Result<()> {
    for rec in dataset.records() {
        check_csv_tags(rec)?;
    }
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(COLUMNS).context("writing CSV header")?;
    for rec in dataset.records() {
        writer
            .write_record([
                rec.id.to_string(),
                rec.name.clone(),
                rec.category.clone(),
                rec.tags.join(TAG_SEPARATOR),
                rec.year.to_string(),
            ])
            .with_context(|| format!("writing CSV row for image {}", rec.id))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet / Arrow
// ---------------------------------------------------------------------------

/// Load a Parquet file holding an image catalog.
///
/// Expected schema:
/// - `id`: Int64 or Int32
/// - `name`, `category`: Utf8 or LargeUtf8
/// - `tags`: List<Utf8> or LargeList<Utf8>
/// - `year`: Int32 or Int64
///
/// Extra columns are ignored.
fn load_parquet(path: &Path) -> Result<ImageDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(records_from_batch(&batch)?);
    }

    Ok(ImageDataset::from_records(records)?)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DatasetError::MissingColumn(name.to_string()))?;
    Ok(batch.column(idx))
}

fn type_error(column: &str, col: &ArrayRef) -> DatasetError {
    DatasetError::ColumnType {
        column: column.to_string(),
        found: format!("{:?}", col.data_type()),
    }
}

/// Convert one record batch into image records.
pub fn records_from_batch(batch: &RecordBatch) -> Result<Vec<ImageRecord>> {
    let ids = column(batch, "id")?;
    let names = column(batch, "name")?;
    let categories = column(batch, "category")?;
    let tags = column(batch, "tags")?;
    let years = column(batch, "year")?;

    (0..batch.num_rows())
        .map(|row| {
            Ok(ImageRecord {
                id: extract_int(ids, "id", row)?,
                name: extract_string(names, "name", row)?,
                category: extract_string(categories, "category", row)?,
                tags: extract_string_list(tags, row)?,
                year: i32::try_from(extract_int(years, "year", row)?)
                    .with_context(|| format!("Row {row}: year out of range"))?,
            })
        })
        .collect()
}

fn extract_int(col: &ArrayRef, name: &str, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("Row {row}: null value in '{name}'");
    }
    if let Some(arr) = col.as_primitive_opt::<Int64Type>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_primitive_opt::<Int32Type>() {
        Ok(arr.value(row) as i64)
    } else {
        Err(type_error(name, col).into())
    }
}

fn extract_string(col: &ArrayRef, name: &str, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    if let Some(arr) = col.as_string_opt::<i32>() {
        Ok(arr.value(row).to_string())
    } else if let Some(arr) = col.as_string_opt::<i64>() {
        Ok(arr.value(row).to_string())
    } else {
        Err(type_error(name, col).into())
    }
}

/// Extract the tag strings from a List or LargeList column at the given row.
fn extract_string_list(col: &ArrayRef, row: usize) -> Result<Vec<String>> {
    if col.is_null(row) {
        return Ok(Vec::new());
    }

    let values = match col.data_type() {
        DataType::List(_) => col
            .as_any()
            .downcast_ref::<ListArray>()
            .context("expected ListArray")?
            .value(row),
        DataType::LargeList(_) => col
            .as_any()
            .downcast_ref::<LargeListArray>()
            .context("expected LargeListArray")?
            .value(row),
        _ => return Err(type_error("tags", col).into()),
    };

    let strings: Vec<Option<&str>> = if let Some(arr) = values.as_string_opt::<i32>() {
        arr.iter().collect()
    } else if let Some(arr) = values.as_string_opt::<i64>() {
        arr.iter().collect()
    } else {
        bail!(
            "List inner type is {:?}, expected Utf8",
            values.data_type()
        );
    };
    Ok(strings.into_iter().flatten().map(str::to_string).collect())
}

/// Arrow schema used when writing catalogs.
pub fn catalog_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new(
            "tags",
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            false,
        ),
        Field::new("year", DataType::Int32, false),
    ]))
}

/// Build a record batch with [`catalog_schema`] from the given records.
pub fn to_record_batch<'a>(
    records: impl IntoIterator<Item = &'a ImageRecord>,
) -> Result<RecordBatch> {
    let mut ids = Vec::new();
    let mut names = Vec::new();
    let mut categories = Vec::new();
    let mut years = Vec::new();
    let mut tags_builder = ListBuilder::new(StringBuilder::new());

    for rec in records {
        ids.push(rec.id);
        names.push(rec.name.as_str());
        categories.push(rec.category.as_str());
        years.push(rec.year);
        for tag in &rec.tags {
            tags_builder.values().append_value(tag);
        }
        tags_builder.append(true);
    }

    let batch = RecordBatch::try_new(
        catalog_schema(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(names)),
            Arc::new(StringArray::from(categories)),
            Arc::new(tags_builder.finish()),
            Arc::new(Int32Array::from(years)),
        ],
    )
    .context("building catalog record batch")?;
    Ok(batch)
}

fn write_parquet(path: &Path, dataset: &ImageDataset) -> Result<()> {
    let batch = to_record_batch(dataset.records())?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_dataset;

    fn round_trip(ext: &str) -> ImageDataset {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("catalog.{ext}"));
        write_file(&path, &sample_dataset()).unwrap();
        load_file(&path).unwrap()
    }

    #[test]
    fn sample_survives_every_format() {
        for ext in ["json", "csv", "parquet"] {
            assert_eq!(round_trip(ext), sample_dataset(), "format {ext}");
        }
    }

    #[test]
    fn csv_columns_may_be_reordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(
            &path,
            "year,name,id,tags,category\n2021,Forest Path,10, trees ; path ,nature\n2020,Alley,11,,urban\n",
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(
            ds.records(),
            [
                ImageRecord::new(10, "Forest Path", "nature", &["trees", "path"], 2021),
                ImageRecord::new(11, "Alley", "urban", &[], 2020),
            ]
        );
    }

    #[test]
    fn csv_keeps_padding_in_names_and_categories() {
        let padded = ImageDataset::from_records(vec![
            ImageRecord::new(1, " Padded ", " nature", &["mountains", "high altitude"], 2023),
            ImageRecord::new(2, "Crème brûlée", "food", &["dessert"], 2022),
        ])
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        write_file(&path, &padded).unwrap();
        assert_eq!(load_file(&path).unwrap(), padded);
    }

    #[test]
    fn csv_refuses_tags_it_cannot_encode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        for tag in ["rock;roll", " spaced ", ""] {
            let ds = ImageDataset::from_records(vec![ImageRecord::new(
                3,
                "Concert",
                "music",
                &[tag],
                2020,
            )])
            .unwrap();
            let err = write_file(&path, &ds).unwrap_err();
            assert_eq!(
                err.downcast_ref::<DatasetError>(),
                Some(&DatasetError::UnencodableTag {
                    id: 3,
                    tag: tag.to_string()
                })
            );
        }
    }

    #[test]
    fn csv_errors_name_the_file_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(
            &path,
            "id,name,category,tags,year\n1,A,x,,2020\n2,B,x,,soon\n",
        )
        .unwrap();

        let err = format!("{:#}", load_file(&path).unwrap_err());
        assert!(err.contains("CSV line 3"), "{err}");
        assert!(err.contains("'soon' is not a valid year"), "{err}");
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, "id,name,category,year\n1,A,b,2020\n").unwrap();

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DatasetError>(),
            Some(&DatasetError::MissingColumn("tags".into()))
        );
    }

    #[test]
    fn json_duplicate_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"name":"A","category":"x","tags":[],"year":2020},
                {"id":1,"name":"B","category":"x","year":2021}]"#,
        )
        .unwrap();

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DatasetError>(),
            Some(&DatasetError::DuplicateId(1))
        );
    }

    #[test]
    fn json_tags_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id":4,"name":"Bare","category":"misc","year":1999}]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert!(ds.records()[0].tags.is_empty());
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(load_file(Path::new("catalog.xlsx")).is_err());
    }

    #[test]
    fn batch_conversion_preserves_tags() {
        let ds = sample_dataset();
        let batch = to_record_batch(ds.records()).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(records_from_batch(&batch).unwrap(), ds.records());
    }
}
