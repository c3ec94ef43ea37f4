//! Export pipeline: row mapping and workbook writing.
//!
//! The writer produces a single worksheet with one fixed heading row
//! followed by one row per exported document. Rows are appended one at a
//! time so the caller can stream from a database cursor without
//! materializing the result set; the workbook bytes only exist once
//! [`ReportWriter::finish`] completes, so a failed stream can never yield a
//! truncated file.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};

use crate::codes::document_type_label;
use crate::document::DteDocument;

/// Fixed heading row, in export column order.
pub const HEADINGS: [&str; 14] = [
    "Fecha",
    "Tienda",
    "Transacción",
    "Documento Receptor",
    "Nombre Receptor",
    "Neto",
    "IVA",
    "Total",
    "Tipo DTE",
    "Estado",
    "Observación",
    "Código Generación",
    "Número de Control",
    "Sello de Recepción",
];

/// MIME type of the produced spreadsheet.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Heading fill color (light blue).
const HEADER_FILL: Color = Color::RGB(0x00E3_F2FD);

/// Error types for export operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Spreadsheet serialization failed.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] XlsxError),
}

/// Streaming spreadsheet writer for the filtered export.
pub struct ReportWriter {
    worksheet: Worksheet,
    timezone: Tz,
    rows: u32,
}

impl ReportWriter {
    /// Creates a writer with the heading row already in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the worksheet rejects the heading cells.
    pub fn new(timezone: Tz) -> Result<Self, ExportError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name("DTEs")?;

        let header = Format::new().set_bold().set_background_color(HEADER_FILL);
        for (col, heading) in (0u16..).zip(HEADINGS) {
            worksheet.write_string_with_format(0, col, heading, &header)?;
        }

        Ok(Self {
            worksheet,
            timezone,
            rows: 0,
        })
    }

    /// Appends one document as a mapped row.
    ///
    /// # Errors
    ///
    /// Returns an error if the worksheet rejects a cell.
    pub fn append(&mut self, document: &DteDocument) -> Result<(), ExportError> {
        self.rows += 1;
        let row = self.rows;
        for (col, cell) in (0u16..).zip(map_row(document, self.timezone)) {
            self.worksheet.write_string(row, col, cell)?;
        }
        Ok(())
    }

    /// Number of document rows appended so far (heading excluded).
    #[must_use]
    pub const fn rows_written(&self) -> u32 {
        self.rows
    }

    /// Serializes the workbook to bytes. A writer with zero appended rows
    /// yields a valid header-only file.
    ///
    /// # Errors
    ///
    /// Returns an error if workbook serialization fails.
    pub fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        self.worksheet.autofit();
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);
        Ok(workbook.save_to_buffer()?)
    }
}

/// Maps one document to its export row.
///
/// The processing timestamp is rendered in the store time zone, the
/// document-type code is resolved through the shared code table, and every
/// other column passes through unchanged.
#[must_use]
pub fn map_row(document: &DteDocument, tz: Tz) -> [String; 14] {
    [
        format_timestamp(document.processed_at, tz),
        text(&document.store),
        text(&document.transaction_ref),
        text(&document.receptor_document),
        text(&document.receptor_name),
        text(&document.net),
        text(&document.tax),
        text(&document.total),
        document
            .document_type
            .as_deref()
            .map(|code| document_type_label(code).to_string())
            .unwrap_or_default(),
        text(&document.status),
        text(&document.observations),
        text(&document.generation_code),
        text(&document.control_number),
        text(&document.receipt_seal),
    ]
}

/// Renders a timestamp as `DD/MM/YYYY HH:MM:SS` in the store time zone;
/// empty string when absent.
#[must_use]
pub fn format_timestamp(instant: Option<DateTime<Utc>>, tz: Tz) -> String {
    instant.map_or_else(String::new, |dt| {
        dt.with_timezone(&tz).format("%d/%m/%Y %H:%M:%S").to_string()
    })
}

/// Builds the download filename, stamped with the generation time.
#[must_use]
pub fn export_filename<Z>(now: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: std::fmt::Display,
{
    format!("Reporte_DTEs_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
