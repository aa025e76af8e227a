use std::path::Path;

use serde_json::Value;

use crate::error::{Result, TallyError};
use crate::normalize::normalize;
use crate::records::{NormalizedRecord, RawRecord};
use crate::settings::SourcePaths;

// ---------------------------------------------------------------------------
// Single table
// ---------------------------------------------------------------------------

/// Read one source table and normalize every row. The format is picked by
/// file extension.
pub fn load_table(path: &Path) -> Result<Vec<NormalizedRecord>> {
    let raw = read_raw(path)?;
    Ok(raw.iter().map(normalize).collect())
}

fn read_raw(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(TallyError::MissingSource(path.display().to_string()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => read_csv(path),
        Some("json") => read_json(path),
        #[cfg(feature = "xlsx")]
        Some("xlsx") | Some("xls") => read_xlsx(path),
        _ => Err(TallyError::UnknownFormat(path.display().to_string())),
    }
}

fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for result in rdr.records() {
        // sheet exports are ragged; skip rows the reader chokes on
        let Ok(record) = result else { continue };
        let mut row = RawRecord::new();
        for (i, field) in record.iter().enumerate() {
            let Some(header) = headers.get(i) else { continue };
            if header.trim().is_empty() {
                continue;
            }
            row.insert(header.to_string(), Value::String(field.to_string()));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn read_json(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let Value::Array(items) = value else {
        return Err(TallyError::MalformedSource(path.display().to_string()));
    };
    let mut rows = Vec::new();
    for item in items {
        let Value::Object(map) = item else {
            return Err(TallyError::MalformedSource(path.display().to_string()));
        };
        rows.push(map.into_iter().collect());
    }
    Ok(rows)
}

#[cfg(feature = "xlsx")]
fn read_xlsx(path: &Path) -> Result<Vec<RawRecord>> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| TallyError::Workbook(format!("{}: {e}", path.display())))?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(TallyError::MalformedSource(path.display().to_string()));
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| TallyError::Workbook(format!("{}: {e}", path.display())))?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    for row in sheet_rows {
        let mut rec = RawRecord::new();
        for (i, cell) in row.iter().enumerate() {
            let Some(header) = headers.get(i) else { continue };
            if header.trim().is_empty() {
                continue;
            }
            rec.insert(header.clone(), cell_to_value(cell));
        }
        rows.push(rec);
    }
    Ok(rows)
}

#[cfg(feature = "xlsx")]
fn cell_to_value(cell: &calamine::Data) -> Value {
    use calamine::Data;
    match cell {
        Data::String(s) => Value::String(s.clone()),
        // floats keep their numeric text so date serials survive
        Data::Float(f) => serde_json::json!(f),
        Data::Int(i) => serde_json::json!(i),
        Data::Bool(b) => Value::Bool(*b),
        Data::Empty => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Full source set
// ---------------------------------------------------------------------------

/// Every table the ledger view reads.
#[derive(Debug)]
pub struct SourceSet {
    pub deposits: Vec<NormalizedRecord>,
    pub withdrawals: Vec<NormalizedRecord>,
    pub settlements: Vec<NormalizedRecord>,
    pub commissions: Vec<NormalizedRecord>,
    pub shop_balance: Vec<NormalizedRecord>,
}

/// Load all required sources. Any missing or unreadable table fails the
/// whole refresh before aggregation starts.
pub fn load_sources(paths: &SourcePaths) -> Result<SourceSet> {
    Ok(SourceSet {
        deposits: load_table(&paths.deposits)?,
        withdrawals: load_table(&paths.withdrawals)?,
        settlements: load_table(&paths.settlements)?,
        commissions: load_table(&paths.commissions)?,
        shop_balance: load_table(&paths.shop_balance)?,
    })
}
