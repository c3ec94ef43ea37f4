//! `SeaORM` Entity for the `v_dtes` document view.
//!
//! Column names mirror the view; the rest of the system works with the
//! [`DteDocument`] domain snapshot. The view is read-only and has no
//! declared key, so the generation code (unique per DTE upstream) stands in
//! as the entity primary key. Monetary columns are pre-rendered display
//! strings; `total_numeric` exists only for range filtering and is not part
//! of the export projection.

use chrono::Utc;
use dte_reports_core::DteDocument;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "v_dtes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cod_generacion: String,
    pub fh_procesamiento: Option<DateTimeWithTimeZone>,
    pub tienda: Option<String>,
    pub transaccion: Option<String>,
    pub documento_receptor: Option<String>,
    pub nombre_receptor: Option<String>,
    pub neto: Option<String>,
    pub iva: Option<String>,
    pub total: Option<String>,
    pub total_numeric: Option<Decimal>,
    pub tipo_dte: Option<String>,
    pub estado: Option<String>,
    pub observaciones: Option<String>,
    pub numero_control: Option<String>,
    pub sello_recibido: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DteDocument {
    fn from(model: Model) -> Self {
        Self {
            processed_at: model.fh_procesamiento.map(|dt| dt.with_timezone(&Utc)),
            store: model.tienda,
            transaction_ref: model.transaccion,
            receptor_document: model.documento_receptor,
            receptor_name: model.nombre_receptor,
            net: model.neto,
            tax: model.iva,
            total: model.total,
            document_type: model.tipo_dte,
            status: model.estado,
            observations: model.observaciones,
            generation_code: Some(model.cod_generacion),
            control_number: model.numero_control,
            receipt_seal: model.sello_recibido,
        }
    }
}
