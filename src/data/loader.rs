use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CustomerRecord, DataError, RecordStore, REQUIRED_COLUMNS};

type Result<T> = std::result::Result<T, DataError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load customer records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat Parquet file with the twelve required columns
/// * `.json`    – `[{ "Gender": "...", "City": "...", ... }, ...]`
/// * `.csv`     – header row with the twelve required column names
pub fn load_file(path: &Path) -> Result<RecordStore> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RecordStore> {
    read_csv(open(path)?)
}

/// Parse CSV from any reader (exposed separately so tests can feed strings).
pub fn read_csv<R: Read>(reader: R) -> Result<RecordStore> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| DataError::Format(format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // Map each required column to its position in the header row.
    let mut col_idx = [0usize; 12];
    for (slot, name) in col_idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
    }

    let mut records = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let row = result.map_err(|e| DataError::Format(format!("CSV row {row_no}: {e}")))?;
        let cell = |i: usize| row.get(col_idx[i]).unwrap_or("").trim();

        records.push(CustomerRecord {
            gender: cell(0).to_string(),
            city: cell(1).to_string(),
            age: parse_int(cell(2), row_no, REQUIRED_COLUMNS[2])?,
            net_sales: parse_float(cell(3), row_no, REQUIRED_COLUMNS[3])?,
            items_purchased: parse_int(cell(4), row_no, REQUIRED_COLUMNS[4])?,
            discount_amount: parse_float(cell(5), row_no, REQUIRED_COLUMNS[5])?,
            satisfaction_level: cell(6).to_string(),
            engagement_score: parse_float(cell(7), row_no, REQUIRED_COLUMNS[7])?,
            average_rating: parse_float(cell(8), row_no, REQUIRED_COLUMNS[8])?,
            repeat_purchase_intent: cell(9).to_string(),
            acquisition_channel: cell(10).to_string(),
            lead_source: cell(11).to_string(),
        });
    }

    Ok(RecordStore::from_records(records))
}

fn parse_int(s: &str, row: usize, column: &str) -> Result<i64> {
    // Accept "30" and "30.0" (spreadsheet exports often float-ify integers).
    s.parse::<i64>()
        .or_else(|_| s.parse::<f64>().map(|f| f as i64))
        .map_err(|_| DataError::BadCell {
            row,
            column: column.to_string(),
            value: s.to_string(),
        })
}

fn parse_float(s: &str, row: usize, column: &str) -> Result<f64> {
    s.parse::<f64>().map_err(|_| DataError::BadCell {
        row,
        column: column.to_string(),
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Gender": "Female", "City": "NYC", "Age": 34, "Net Sales": 220.5, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RecordStore> {
    let mut text = String::new();
    open(path)?
        .read_to_string(&mut text)
        .map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
    read_json(&text)
}

pub fn read_json(text: &str) -> Result<RecordStore> {
    let root: JsonValue =
        serde_json::from_str(text).map_err(|e| DataError::Format(format!("parsing JSON: {e}")))?;
    let rows = root
        .as_array()
        .ok_or_else(|| DataError::Format("expected top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataError::Format(format!("row {row_no} is not a JSON object")))?;

        let field = |name: &str| -> Result<&JsonValue> {
            obj.get(name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        let string = |name: &str| -> Result<String> {
            let v = field(name)?;
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| bad_cell(row_no, name, v))
        };
        let int = |name: &str| -> Result<i64> {
            let v = field(name)?;
            v.as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .ok_or_else(|| bad_cell(row_no, name, v))
        };
        let float = |name: &str| -> Result<f64> {
            let v = field(name)?;
            v.as_f64().ok_or_else(|| bad_cell(row_no, name, v))
        };

        records.push(CustomerRecord {
            gender: string("Gender")?,
            city: string("City")?,
            age: int("Age")?,
            net_sales: float("Net Sales")?,
            items_purchased: int("Items Purchased")?,
            discount_amount: float("Discount Amount")?,
            satisfaction_level: string("Satisfaction Level")?,
            engagement_score: float("Engagement Score")?,
            average_rating: float("Average Rating")?,
            repeat_purchase_intent: string("Repeat Purchase Intent")?,
            acquisition_channel: string("Customer Acquisition Channel")?,
            lead_source: string("Lead Source")?,
        });
    }

    Ok(RecordStore::from_records(records))
}

fn bad_cell(row: usize, column: &str, value: &JsonValue) -> DataError {
    DataError::BadCell {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file with the twelve required columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): strings may arrive as Utf8 or
/// LargeUtf8, integers as Int32 or Int64, floats as Float32 or Float64.
fn load_parquet(path: &Path) -> Result<RecordStore> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::Format(format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| DataError::Format(format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| DataError::Format(format!("reading record batch: {e}")))?;
        let schema = batch.schema();

        let mut cols: Vec<&Arc<dyn Array>> = Vec::with_capacity(12);
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| DataError::MissingColumn(name.to_string()))?;
            cols.push(batch.column(idx));
        }

        for row in 0..batch.num_rows() {
            records.push(CustomerRecord {
                gender: string_at(cols[0], row, REQUIRED_COLUMNS[0])?,
                city: string_at(cols[1], row, REQUIRED_COLUMNS[1])?,
                age: int_at(cols[2], row, REQUIRED_COLUMNS[2])?,
                net_sales: float_at(cols[3], row, REQUIRED_COLUMNS[3])?,
                items_purchased: int_at(cols[4], row, REQUIRED_COLUMNS[4])?,
                discount_amount: float_at(cols[5], row, REQUIRED_COLUMNS[5])?,
                satisfaction_level: string_at(cols[6], row, REQUIRED_COLUMNS[6])?,
                engagement_score: float_at(cols[7], row, REQUIRED_COLUMNS[7])?,
                average_rating: float_at(cols[8], row, REQUIRED_COLUMNS[8])?,
                repeat_purchase_intent: string_at(cols[9], row, REQUIRED_COLUMNS[9])?,
                acquisition_channel: string_at(cols[10], row, REQUIRED_COLUMNS[10])?,
                lead_source: string_at(cols[11], row, REQUIRED_COLUMNS[11])?,
            });
        }
    }

    Ok(RecordStore::from_records(records))
}

// -- Arrow cell helpers --

fn type_mismatch(row: usize, column: &str, col: &Arc<dyn Array>) -> DataError {
    DataError::BadCell {
        row,
        column: column.to_string(),
        value: format!("{:?}", col.data_type()),
    }
}

fn string_at(col: &Arc<dyn Array>, row: usize, column: &str) -> Result<String> {
    if col.is_null(row) {
        return Err(type_mismatch(row, column, col));
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| type_mismatch(row, column, col))?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Ok(arr.value(row).to_string())
        }
        _ => Err(type_mismatch(row, column, col)),
    }
}

fn int_at(col: &Arc<dyn Array>, row: usize, column: &str) -> Result<i64> {
    if col.is_null(row) {
        return Err(type_mismatch(row, column, col));
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>();
            arr.map(|a| a.value(row) as i64)
                .ok_or_else(|| type_mismatch(row, column, col))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>();
            arr.map(|a| a.value(row))
                .ok_or_else(|| type_mismatch(row, column, col))
        }
        DataType::Float64 => float_at(col, row, column).map(|f| f as i64),
        _ => Err(type_mismatch(row, column, col)),
    }
}

fn float_at(col: &Arc<dyn Array>, row: usize, column: &str) -> Result<f64> {
    if col.is_null(row) {
        return Err(type_mismatch(row, column, col));
    }
    match col.data_type() {
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>();
            arr.map(|a| a.value(row) as f64)
                .ok_or_else(|| type_mismatch(row, column, col))
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>();
            arr.map(|a| a.value(row))
                .ok_or_else(|| type_mismatch(row, column, col))
        }
        DataType::Int32 | DataType::Int64 => int_at(col, row, column).map(|i| i as f64),
        _ => Err(type_mismatch(row, column, col)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Gender,City,Age,Net Sales,Items Purchased,Discount Amount,\
Satisfaction Level,Engagement Score,Average Rating,Repeat Purchase Intent,\
Customer Acquisition Channel,Lead Source";

    #[test]
    fn csv_roundtrip_of_two_rows() {
        let csv = format!(
            "{HEADER}\n\
             Male,NYC,30,100.5,5,10.0,Satisfied,7.2,4.1,Yes,Social Media,Referral\n\
             Female,LA,42,250.0,8,25.5,Neutral,5.0,3.5,No,Email,Web"
        );
        let store = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records[0].gender, "Male");
        assert_eq!(store.records[1].net_sales, 250.0);
        assert_eq!(store.records[1].age, 42);
        assert_eq!(store.age_span, Some((30, 42)));
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let csv = "Gender,City,Age\nMale,NYC,30";
        match read_csv(csv.as_bytes()) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, "Net Sales"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_bad_numeric_cell_is_reported() {
        let csv = format!(
            "{HEADER}\n\
             Male,NYC,thirty,100.5,5,10.0,Satisfied,7.2,4.1,Yes,Social Media,Referral"
        );
        match read_csv(csv.as_bytes()) {
            Err(DataError::BadCell { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "Age");
                assert_eq!(value, "thirty");
            }
            other => panic!("expected BadCell, got {other:?}"),
        }
    }

    #[test]
    fn json_records_parse() {
        let json = r#"[{
            "Gender": "Female", "City": "NYC", "Age": 34,
            "Net Sales": 220.5, "Items Purchased": 6, "Discount Amount": 12.0,
            "Satisfaction Level": "Satisfied", "Engagement Score": 8.1,
            "Average Rating": 4.6, "Repeat Purchase Intent": "Yes",
            "Customer Acquisition Channel": "Organic", "Lead Source": "Web"
        }]"#;
        let store = read_json(json).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records[0].city, "NYC");
        assert_eq!(store.records[0].items_purchased, 6);
    }

    #[test]
    fn json_missing_field_is_reported() {
        let json = r#"[{"Gender": "Female"}]"#;
        assert!(matches!(
            read_json(json),
            Err(DataError::MissingColumn(c)) if c == "City"
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(e) if e == "xlsx"));
    }
}
