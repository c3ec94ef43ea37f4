//! DTE report repository: the query engine behind counting, paging, and
//! export.
//!
//! All three read paths are built by the same predicate constructor
//! ([`apply_filter`]) so the filtered count, the visible page, and the
//! export stream can never disagree about which records match. Filter values
//! are always bound, never interpolated, and substring terms are escaped
//! before being wrapped into `ILIKE` patterns.

use std::sync::Arc;

use futures::TryStreamExt;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, extension::postgres::PgExpr},
};

use dte_reports_core::{
    DteDocument, DteFilter,
    export::{ExportError, ReportWriter},
};

use crate::entities::dtes;

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum DteReportError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Spreadsheet writing failed mid-export.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Export column projection of the view, in export order. `total_numeric`
/// is deliberately absent: it is a filter-only column on both read paths.
const EXPORT_COLUMNS: [dtes::Column; 14] = [
    dtes::Column::FhProcesamiento,
    dtes::Column::Tienda,
    dtes::Column::Transaccion,
    dtes::Column::DocumentoReceptor,
    dtes::Column::NombreReceptor,
    dtes::Column::Neto,
    dtes::Column::Iva,
    dtes::Column::Total,
    dtes::Column::TipoDte,
    dtes::Column::Estado,
    dtes::Column::Observaciones,
    dtes::Column::CodGeneracion,
    dtes::Column::NumeroControl,
    dtes::Column::SelloRecibido,
];

/// Row shape fetched for the export stream.
#[derive(Debug, FromQueryResult)]
struct ExportRow {
    fh_procesamiento: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    tienda: Option<String>,
    transaccion: Option<String>,
    documento_receptor: Option<String>,
    nombre_receptor: Option<String>,
    neto: Option<String>,
    iva: Option<String>,
    total: Option<String>,
    tipo_dte: Option<String>,
    estado: Option<String>,
    observaciones: Option<String>,
    cod_generacion: Option<String>,
    numero_control: Option<String>,
    sello_recibido: Option<String>,
}

impl From<ExportRow> for DteDocument {
    fn from(row: ExportRow) -> Self {
        Self {
            processed_at: row
                .fh_procesamiento
                .map(|dt| dt.with_timezone(&chrono::Utc)),
            store: row.tienda,
            transaction_ref: row.transaccion,
            receptor_document: row.documento_receptor,
            receptor_name: row.nombre_receptor,
            net: row.neto,
            tax: row.iva,
            total: row.total,
            document_type: row.tipo_dte,
            status: row.estado,
            observations: row.observaciones,
            generation_code: row.cod_generacion,
            control_number: row.numero_control,
            receipt_seal: row.sello_recibido,
        }
    }
}

/// Appends exactly one predicate per present filter field, AND-combined.
///
/// Range bounds for dates and amounts, exact equality for the status,
/// case-insensitive substring match for the text identifiers. Absent fields
/// contribute nothing. Pure; applying the same filter twice yields identical
/// predicates.
fn apply_filter(mut select: Select<dtes::Entity>, filter: &DteFilter) -> Select<dtes::Entity> {
    if let Some(from) = filter.date_from {
        select = select.filter(dtes::Column::FhProcesamiento.gte(from));
    }
    if let Some(to) = filter.date_to {
        select = select.filter(dtes::Column::FhProcesamiento.lte(to));
    }
    if let Some(status) = &filter.status {
        select = select.filter(dtes::Column::Estado.eq(status));
    }

    let substring_fields = [
        (dtes::Column::Tienda, &filter.store),
        (dtes::Column::Transaccion, &filter.transaction_ref),
        (dtes::Column::DocumentoReceptor, &filter.receptor_document),
        (dtes::Column::NombreReceptor, &filter.receptor_name),
        (dtes::Column::CodGeneracion, &filter.generation_code),
        (dtes::Column::SelloRecibido, &filter.receipt_seal),
        (dtes::Column::NumeroControl, &filter.control_number),
    ];
    for (column, term) in substring_fields {
        if let Some(term) = term {
            select = select.filter(Expr::col(column).ilike(like_pattern(term)));
        }
    }

    if let Some(min) = filter.total_min {
        select = select.filter(dtes::Column::TotalNumeric.gte(min));
    }
    if let Some(max) = filter.total_max {
        select = select.filter(dtes::Column::TotalNumeric.lte(max));
    }

    select
}

/// Wraps a user-supplied term into an `ILIKE` substring pattern, escaping
/// the pattern metacharacters so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Filtered, unordered view query.
fn filtered_query(filter: &DteFilter) -> Select<dtes::Entity> {
    apply_filter(dtes::Entity::find(), filter)
}

/// Interactive page query, newest first.
fn page_query(filter: &DteFilter) -> Select<dtes::Entity> {
    filtered_query(filter).order_by_desc(dtes::Column::FhProcesamiento)
}

/// Export query: projected columns only, oldest first. The ordering
/// asymmetry with the interactive page is intentional.
fn export_query(filter: &DteFilter) -> Select<dtes::Entity> {
    apply_filter(
        dtes::Entity::find().select_only().columns(EXPORT_COLUMNS),
        filter,
    )
    .order_by_asc(dtes::Column::FhProcesamiento)
}

/// Repository for document view queries. Holds a shared handle to the
/// connection pool.
#[derive(Debug, Clone)]
pub struct DteReportRepository {
    db: Arc<DatabaseConnection>,
}

impl DteReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Counts all records in the view, ignoring filters. Informational;
    /// staleness is acceptable.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_all(&self) -> Result<u64, DteReportError> {
        Ok(dtes::Entity::find().count(self.db.as_ref()).await?)
    }

    /// Counts records matching the filter, with no page limit applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_filtered(&self, filter: &DteFilter) -> Result<u64, DteReportError> {
        Ok(filtered_query(filter).count(self.db.as_ref()).await?)
    }

    /// Fetches one page of matching records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_page(
        &self,
        filter: &DteFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<DteDocument>, DteReportError> {
        let models = page_query(filter)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Streams every matching record, oldest first, through the writer.
    /// Returns the number of rows written.
    ///
    /// The database cursor is dropped on every exit path; a mid-stream
    /// failure fails the whole export before any bytes are produced.
    ///
    /// # Errors
    ///
    /// Returns an error if the database stream or the writer fails.
    pub async fn export_filtered(
        &self,
        filter: &DteFilter,
        writer: &mut ReportWriter,
    ) -> Result<u64, DteReportError> {
        let mut rows = export_query(filter)
            .into_model::<ExportRow>()
            .stream(self.db.as_ref())
            .await?;

        let mut written = 0u64;
        while let Some(row) = rows.try_next().await? {
            writer.append(&DteDocument::from(row))?;
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::America::El_Salvador;
    use rust_decimal_macros::dec;
    use sea_orm::prelude::Decimal;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryTrait, Value};
    use std::collections::BTreeMap;

    use super::*;

    fn sql(select: Select<dtes::Entity>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    /// The WHERE clause of a built statement, without projection or
    /// ordering.
    fn where_clause(statement: &str) -> &str {
        let start = statement.find(" WHERE ").unwrap_or(statement.len());
        let end = statement.find(" ORDER BY ").unwrap_or(statement.len());
        &statement[start..end]
    }

    fn full_filter() -> DteFilter {
        DteFilter {
            date_from: Some(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap()),
            date_to: Some(chrono::Utc.with_ymd_and_hms(2024, 3, 2, 5, 59, 59).unwrap()),
            status: Some("ENVIADO".to_string()),
            store: Some("Centro".to_string()),
            transaction_ref: Some("TX-1".to_string()),
            receptor_document: Some("0614".to_string()),
            receptor_name: Some("Pérez".to_string()),
            generation_code: Some("A1B2".to_string()),
            receipt_seal: Some("SELLO".to_string()),
            control_number: Some("DTE-01".to_string()),
            total_min: Some(dec!(100)),
            total_max: Some(dec!(500)),
        }
    }

    fn model(generation_code: &str, total: Decimal, hour: u32) -> dtes::Model {
        dtes::Model {
            cod_generacion: generation_code.to_string(),
            fh_procesamiento: Some(
                chrono::Utc
                    .with_ymd_and_hms(2024, 3, 1, hour, 0, 0)
                    .unwrap()
                    .fixed_offset(),
            ),
            tienda: Some("Tienda Centro".to_string()),
            transaccion: Some("TX-1001".to_string()),
            documento_receptor: Some("0614".to_string()),
            nombre_receptor: Some("Comercial Pérez".to_string()),
            neto: Some("100.00".to_string()),
            iva: Some("13.00".to_string()),
            total: Some(total.to_string()),
            total_numeric: Some(total),
            tipo_dte: Some("01".to_string()),
            estado: Some("ENVIADO".to_string()),
            observaciones: None,
            numero_control: Some("DTE-01-0001".to_string()),
            sello_recibido: Some("SELLO123".to_string()),
        }
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
    }

    #[test]
    fn test_empty_filter_adds_no_predicates() {
        let statement = sql(filtered_query(&DteFilter::default()));
        assert!(!statement.contains("WHERE"));
    }

    #[test]
    fn test_each_field_contributes_one_predicate() {
        let statement = sql(filtered_query(&full_filter()));
        let clause = where_clause(&statement);

        assert!(clause.contains(r#""fh_procesamiento" >="#));
        assert!(clause.contains(r#""fh_procesamiento" <="#));
        assert!(clause.contains(r#""estado" = 'ENVIADO'"#));
        assert!(clause.contains(r#""total_numeric" >="#));
        assert!(clause.contains(r#""total_numeric" <="#));
        // One ILIKE per substring field.
        assert_eq!(clause.matches("ILIKE").count(), 7);
    }

    #[test]
    fn test_predicate_construction_is_deterministic() {
        let filter = full_filter();
        assert_eq!(sql(filtered_query(&filter)), sql(filtered_query(&filter)));
    }

    #[test]
    fn test_count_page_and_export_share_the_predicate_set() {
        let filter = full_filter();
        let count = sql(filtered_query(&filter));
        let page = sql(page_query(&filter));
        let export = sql(export_query(&filter));

        assert_eq!(where_clause(&count), where_clause(&page));
        assert_eq!(where_clause(&count), where_clause(&export));
    }

    #[test]
    fn test_interactive_and_export_ordering_asymmetry() {
        let filter = DteFilter::default();
        assert!(sql(page_query(&filter)).ends_with(r#"ORDER BY "v_dtes"."fh_procesamiento" DESC"#));
        assert!(sql(export_query(&filter)).ends_with(r#"ORDER BY "v_dtes"."fh_procesamiento" ASC"#));
    }

    #[test]
    fn test_export_projection_omits_the_numeric_total() {
        let statement = sql(export_query(&DteFilter::default()));
        let projection = &statement[..statement.find(" FROM ").unwrap_or(statement.len())];
        assert!(!projection.contains("total_numeric"));
        assert!(projection.contains("cod_generacion"));
        assert!(projection.contains("sello_recibido"));
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn test_substring_terms_are_quoted_not_spliced() {
        let filter = DteFilter {
            store: Some("x' OR '1'='1".to_string()),
            ..DteFilter::default()
        };
        let statement = sql(filtered_query(&filter));
        // The whole term stays inside one bound pattern literal; the quotes
        // are escaped, never spliced into the surrounding SQL.
        assert_eq!(statement.matches("ILIKE").count(), 1);
        assert!(statement.contains(r"E'%x\' OR \'1\'=\'1%'"));
        assert!(!statement.contains("'1'='1'"));
    }

    #[tokio::test]
    async fn test_scenario_status_and_minimum_total() {
        // Fixture intent: 5 records, 3 with estado ENVIADO, 2 of those with
        // total >= 100. The filtered count and the export must both see
        // exactly those 2, ascending by processing timestamp.
        let matching = vec![model("G-2", dec!(250), 8), model("G-4", dec!(100), 15)];
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row(2)]])
                .append_query_results([matching])
                .into_connection(),
        );
        let repo = DteReportRepository::new(Arc::clone(&db));

        let filter = DteFilter {
            status: Some("ENVIADO".to_string()),
            total_min: Some(dec!(100)),
            ..DteFilter::default()
        };

        let total_filtered = repo.count_filtered(&filter).await.unwrap();
        assert_eq!(total_filtered, 2);

        let mut writer = ReportWriter::new(El_Salvador).unwrap();
        let written = repo.export_filtered(&filter, &mut writer).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(writer.rows_written(), 2);
        assert!(!writer.finish().unwrap().is_empty());

        drop(repo);
        let db = Arc::try_unwrap(db).unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("estado"));
        assert!(log.contains("total_numeric"));
        assert!(log.contains("ASC"));
    }

    #[tokio::test]
    async fn test_export_with_zero_matches_yields_header_only_file() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<dtes::Model>::new()])
            .into_connection();
        let repo = DteReportRepository::new(Arc::new(db));

        let mut writer = ReportWriter::new(El_Salvador).unwrap();
        let written = repo
            .export_filtered(&DteFilter::default(), &mut writer)
            .await
            .unwrap();

        assert_eq!(written, 0);
        let bytes = writer.finish().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_fetch_page_maps_models_to_documents() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![model("G-1", dec!(113), 12)]])
                .into_connection(),
        );
        let repo = DteReportRepository::new(Arc::clone(&db));

        let page = repo
            .fetch_page(&DteFilter::default(), 0, 10)
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].generation_code.as_deref(), Some("G-1"));
        assert_eq!(page[0].document_type.as_deref(), Some("01"));
        assert_eq!(
            page[0].processed_at,
            Some(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );

        drop(repo);
        let db = Arc::try_unwrap(db).unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("LIMIT"));
        assert!(log.contains("OFFSET"));
    }
}
