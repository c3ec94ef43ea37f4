//! Filter criteria for the DTE document view.
//!
//! Two layers: [`DteFilterParams`] is the string-typed boundary object with
//! the external parameter names, and [`DteFilter`] is the normalized
//! criteria value object the query engine consumes. Date filters are
//! normalized to absolute instants here, against the store-local time zone;
//! the query engine never applies timezone logic itself.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, offset::LocalResult};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Status sentinel meaning "no status predicate".
pub const STATUS_ALL: &str = "TODOS";

/// Normalized filter criteria.
///
/// Absence of a field means "no constraint". The engine does not reorder a
/// start/end pair; supplying `date_from > date_to` is the caller's mistake
/// and simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DteFilter {
    /// Inclusive lower bound on the processing timestamp.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the processing timestamp.
    pub date_to: Option<DateTime<Utc>>,
    /// Exact status match; `None` when absent or when every status is meant.
    pub status: Option<String>,
    /// Case-insensitive substring match on the store.
    pub store: Option<String>,
    /// Case-insensitive substring match on the transaction identifier.
    pub transaction_ref: Option<String>,
    /// Case-insensitive substring match on the receptor document number.
    pub receptor_document: Option<String>,
    /// Case-insensitive substring match on the receptor name.
    pub receptor_name: Option<String>,
    /// Case-insensitive substring match on the generation code.
    pub generation_code: Option<String>,
    /// Case-insensitive substring match on the receipt seal.
    pub receipt_seal: Option<String>,
    /// Case-insensitive substring match on the control number.
    pub control_number: Option<String>,
    /// Inclusive lower bound on the numeric total.
    pub total_min: Option<Decimal>,
    /// Inclusive upper bound on the numeric total.
    pub total_max: Option<Decimal>,
}

impl DteFilter {
    /// Returns true when no field contributes a predicate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// String-typed filter parameters as they arrive at the boundary.
///
/// All fields are optional; an empty or whitespace-only string is treated as
/// absent. Field names are the external parameter names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DteFilterParams {
    /// Start date, `YYYY-MM-DD`, interpreted in the store time zone.
    pub fecha_inicio: Option<String>,
    /// End date, `YYYY-MM-DD`, interpreted in the store time zone.
    pub fecha_fin: Option<String>,
    /// Document status; `TODOS` means all statuses.
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
}

impl DteFilterParams {
    /// Normalizes the raw parameters into filter criteria.
    ///
    /// `fecha_inicio` becomes local midnight of that date in `tz`,
    /// `fecha_fin` local `23:59:59`, both converted to UTC. Malformed dates
    /// and amounts degrade to "no constraint", logged so the drop is visible
    /// to operators.
    #[must_use]
    pub fn into_filter(self, tz: Tz) -> DteFilter {
        let status = normalize(self.estado).filter(|s| s != STATUS_ALL);

        DteFilter {
            date_from: normalize(self.fecha_inicio)
                .and_then(|s| parse_date("fecha_inicio", &s))
                .map(|d| day_start_utc(d, tz)),
            date_to: normalize(self.fecha_fin)
                .and_then(|s| parse_date("fecha_fin", &s))
                .map(|d| day_end_utc(d, tz)),
            status,
            store: normalize(self.tienda),
            transaction_ref: normalize(self.transaccion),
            receptor_document: normalize(self.documento_receptor),
            receptor_name: normalize(self.nombre_receptor),
            generation_code: normalize(self.cod_generacion),
            receipt_seal: normalize(self.sello_recibido),
            control_number: normalize(self.numero_control),
            total_min: normalize(self.total_min).and_then(|s| parse_amount("total_min", &s)),
            total_max: normalize(self.total_max).and_then(|s| parse_amount("total_max", &s)),
        }
    }
}

/// Trims a raw parameter; empty means absent.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_date(field: &str, value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(field, value, "ignoring malformed date filter");
            None
        }
    }
}

fn parse_amount(field: &str, value: &str) -> Option<Decimal> {
    match value.parse::<Decimal>() {
        Ok(amount) => Some(amount),
        Err(_) => {
            warn!(field, value, "ignoring malformed amount filter");
            None
        }
    }
}

/// Local midnight of `date` in `tz`, as an absolute instant.
#[must_use]
pub fn day_start_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN), tz)
}

/// Local `23:59:59` of `date` in `tz`, as an absolute instant.
#[must_use]
pub fn day_end_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let end = NaiveTime::from_hms_opt(23, 59, 59)
        .map_or_else(|| date.and_time(NaiveTime::MIN), |t| date.and_time(t));
    local_to_utc(end, tz)
}

/// Resolves a local wall-clock time in `tz` to UTC. Ambiguous times take the
/// earlier instant; times skipped by a DST gap fall back to the naive value
/// read as UTC.
fn local_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&local),
    }
}
