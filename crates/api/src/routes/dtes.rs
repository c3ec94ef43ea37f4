//! DTE report routes: filtered list and spreadsheet export.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::AppState;
use crate::error::error_response;
use dte_reports_core::{
    DteDocument, DteFilterParams,
    codes::document_type_label,
    export::{ReportWriter, XLSX_CONTENT_TYPE, export_filename, format_timestamp},
};
use dte_reports_db::DteReportRepository;
use dte_reports_shared::AppError;
use dte_reports_shared::types::{PageRequest, PageResponse, PageWindow};

/// Creates the DTE report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dtes", get(list_dtes))
        .route("/dtes/export", get(export_dtes))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the DTE list and export endpoints. All filter
/// fields are optional strings; the export ignores the paging fields.
#[derive(Debug, Default, Deserialize)]
pub struct DteQuery {
    /// Start date, `YYYY-MM-DD`, store-local.
    pub fecha_inicio: Option<String>,
    /// End date, `YYYY-MM-DD`, store-local.
    pub fecha_fin: Option<String>,
    /// Document status; `TODOS` means all.
    pub estado: Option<String>,
    /// Store substring.
    pub tienda: Option<String>,
    /// Transaction identifier substring.
    pub transaccion: Option<String>,
    /// Receptor document substring.
    pub documento_receptor: Option<String>,
    /// Receptor name substring.
    pub nombre_receptor: Option<String>,
    /// Generation code substring.
    pub cod_generacion: Option<String>,
    /// Receipt seal substring.
    pub sello_recibido: Option<String>,
    /// Control number substring.
    pub numero_control: Option<String>,
    /// Minimum numeric total.
    pub total_min: Option<String>,
    /// Maximum numeric total.
    pub total_max: Option<String>,
    /// Items per page.
    #[serde(rename = "perPage")]
    pub per_page: Option<u64>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
}

impl DteQuery {
    /// Extracts the filter parameters, leaving the paging fields behind.
    /// The export path receives its own copy, decoupled from the window.
    fn filter_params(&self) -> DteFilterParams {
        DteFilterParams {
            fecha_inicio: self.fecha_inicio.clone(),
            fecha_fin: self.fecha_fin.clone(),
            estado: self.estado.clone(),
            tienda: self.tienda.clone(),
            transaccion: self.transaccion.clone(),
            documento_receptor: self.documento_receptor.clone(),
            nombre_receptor: self.nombre_receptor.clone(),
            cod_generacion: self.cod_generacion.clone(),
            sello_recibido: self.sello_recibido.clone(),
            numero_control: self.numero_control.clone(),
            total_min: self.total_min.clone(),
            total_max: self.total_max.clone(),
        }
    }

    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// One DTE record in the list response.
#[derive(Debug, Serialize)]
pub struct DteRecordResponse {
    /// Processing timestamp, store-local, `DD/MM/YYYY HH:MM:SS`.
    pub fecha_procesamiento: String,
    /// Store identifier.
    pub tienda: Option<String>,
    /// Transaction identifier.
    pub transaccion: Option<String>,
    /// Receptor document number.
    pub documento_receptor: Option<String>,
    /// Receptor name.
    pub nombre_receptor: Option<String>,
    /// Net amount.
    pub neto: Option<String>,
    /// Tax amount.
    pub iva: Option<String>,
    /// Total amount.
    pub total: Option<String>,
    /// Document-type code.
    pub tipo_dte: Option<String>,
    /// Document-type display label.
    pub tipo_dte_label: Option<String>,
    /// Document status.
    pub estado: Option<String>,
    /// Observations.
    pub observaciones: Option<String>,
    /// Generation code.
    pub cod_generacion: Option<String>,
    /// Control number.
    pub numero_control: Option<String>,
    /// Receipt seal.
    pub sello_recibido: Option<String>,
}

impl DteRecordResponse {
    /// Maps a document for interactive display. Timestamp formatting and
    /// label lookup go through the same functions as the export row mapper.
    fn from_document(document: DteDocument, tz: Tz) -> Self {
        let tipo_dte_label = document
            .document_type
            .as_deref()
            .map(|code| document_type_label(code).to_string());
        Self {
            fecha_procesamiento: format_timestamp(document.processed_at, tz),
            tienda: document.store,
            transaccion: document.transaction_ref,
            documento_receptor: document.receptor_document,
            nombre_receptor: document.receptor_name,
            neto: document.net,
            iva: document.tax,
            total: document.total,
            tipo_dte: document.document_type,
            tipo_dte_label,
            estado: document.status,
            observaciones: document.observations,
            cod_generacion: document.generation_code,
            numero_control: document.control_number,
            sello_recibido: document.receipt_seal,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /dtes
///
/// Filtered, paginated document list with live counts.
#[axum::debug_handler]
async fn list_dtes(
    State(state): State<AppState>,
    Query(query): Query<DteQuery>,
) -> impl IntoResponse {
    let repo = DteReportRepository::new(state.db.clone());
    let filter = query.filter_params().into_filter(state.timezone);
    let mut window = PageWindow::new(&query.page_request());

    // Counts and the page fetch run back-to-back against the same
    // predicate set.
    let total_filtered = match repo.count_filtered(&filter).await {
        Ok(count) => count,
        Err(e) => {
            error!(error = %e, "Failed to count filtered documents");
            return error_response(&AppError::Database("Failed to count documents".into()));
        }
    };
    let total_records = match repo.count_all().await {
        Ok(count) => count,
        Err(e) => {
            error!(error = %e, "Failed to count documents");
            return error_response(&AppError::Database("Failed to count documents".into()));
        }
    };
    window.set_counts(total_records, total_filtered);

    let documents = match repo
        .fetch_page(&filter, window.offset(), window.limit())
        .await
    {
        Ok(documents) => documents,
        Err(e) => {
            error!(error = %e, "Failed to fetch document page");
            return error_response(&AppError::Database("Failed to fetch documents".into()));
        }
    };

    let data: Vec<DteRecordResponse> = documents
        .into_iter()
        .map(|d| DteRecordResponse::from_document(d, state.timezone))
        .collect();

    (StatusCode::OK, Json(PageResponse::new(data, &window))).into_response()
}

/// GET /dtes/export
///
/// Exports every matching record to a spreadsheet, ignoring pagination.
/// Zero matches still yield a valid header-only file.
#[axum::debug_handler]
async fn export_dtes(
    State(state): State<AppState>,
    Query(query): Query<DteQuery>,
) -> impl IntoResponse {
    let repo = DteReportRepository::new(state.db.clone());
    let filter = query.filter_params().into_filter(state.timezone);

    let generated_at = Utc::now().with_timezone(&state.timezone);

    let mut writer = match ReportWriter::new(state.timezone) {
        Ok(writer) => writer,
        Err(e) => {
            error!(error = %e, "Failed to create export writer");
            return error_response(&AppError::Export("Failed to generate export".into()));
        }
    };

    let written = match repo.export_filtered(&filter, &mut writer).await {
        Ok(written) => written,
        Err(e) => {
            // The workbook is never serialized on this path; a mid-stream
            // failure can not produce a truncated download.
            error!(error = %e, "Export stream failed");
            return error_response(&AppError::Export("Failed to generate export".into()));
        }
    };

    let bytes = match writer.finish() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Failed to serialize export workbook");
            return error_response(&AppError::Export("Failed to generate export".into()));
        }
    };

    let filename = export_filename(&generated_at);
    info!(rows = written, %filename, "Generated DTE export");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
