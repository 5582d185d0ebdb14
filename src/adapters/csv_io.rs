use crate::domain::model::Record;
use crate::utils::error::{GeocodeError, Result};
use serde::Serialize;

/// Column labels of the exported file.
pub const EXPORT_HEADERS: [&str; 6] = ["ID", "Nome", "CEP", "Latitude", "Longitude", "Status"];

#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    postal_code: &'a str,
    latitude: &'a str,
    longitude: &'a str,
    status: &'a str,
}

impl<'a> From<&'a Record> for ExportRow<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            id: &record.id,
            name: record.name.as_deref().unwrap_or(""),
            postal_code: &record.postal_code,
            latitude: &record.latitude,
            longitude: &record.longitude,
            status: record.status.as_str(),
        }
    }
}

/// Column positions of the input fields, taken from the header row.
#[derive(Debug)]
struct InputColumns {
    id: Option<usize>,
    name: Option<usize>,
    postal_code: usize,
}

impl InputColumns {
    /// The first header matching one of the names wins; later duplicates are ignored.
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();
        let position = |candidates: &[&str]| {
            names
                .iter()
                .position(|h| candidates.contains(&h.as_str()))
        };

        let postal_code =
            position(&["cep", "postal_code"]).ok_or_else(|| GeocodeError::InputError {
                message: format!(
                    "no postal code column (expected 'cep'), found: {}",
                    names.join(", ")
                ),
            })?;

        Ok(Self {
            id: position(&["id"]),
            name: position(&["nome", "name"]),
            postal_code,
        })
    }

    fn record(&self, row: &csv::StringRecord) -> Record {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };
        let name = field(self.name);

        Record::new(
            field(self.id),
            (!name.is_empty()).then_some(name),
            field(Some(self.postal_code)),
        )
    }
}

/// Parses a CSV with a header row naming `id`, `nome`/`name` and `cep`/`postal_code`.
///
/// Header matching ignores case and a leading byte-order mark; other columns are ignored.
/// Rows shorter than the header get empty values.
pub fn read_records(data: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let columns = InputColumns::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(columns.record(&row?));
    }

    tracing::debug!("Parsed {} records from CSV", records.len());
    Ok(records)
}

/// Writes records in order under [`EXPORT_HEADERS`]. The header is written even for no records.
pub fn write_records(records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }

    writer
        .into_inner()
        .map_err(|e| GeocodeError::IoError(e.into_error()))
}
