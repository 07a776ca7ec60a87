use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::receivables::ReceivableEntity,
    value_objects::enums::{payment_methods::PaymentMethod, receivable_statuses::ReceivableStatus},
};

/// Staff-side filter over the receivables ledger. `delinquent_only` wins over
/// `status` when both are set, mirroring the quick-filter on the summary view.
#[derive(Debug, Clone, Default)]
pub struct ReceivableQuery {
    pub athlete_name: Option<String>,
    pub status: Option<ReceivableStatus>,
    pub delinquent_only: bool,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceivableDto {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub athlete_name: String,
    pub description: String,
    pub competency: NaiveDate,
    pub due_date: NaiveDate,
    pub amount_minor: i64,
    pub status: ReceivableStatus,
    pub payment_method: PaymentMethod,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ReceivableWithAthlete {
    pub receivable: ReceivableEntity,
    pub athlete_name: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReceivableTotals {
    pub outstanding_minor: i64,
    pub collected_minor: i64,
    pub delinquent_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceivableSummary {
    pub items: Vec<ReceivableDto>,
    pub totals: ReceivableTotals,
}

/// Manual charge entry, optionally split into monthly installments.
#[derive(Debug, Clone, Deserialize)]
pub struct NewManualReceivable {
    pub athlete_id: Uuid,
    pub description: String,
    pub amount_minor: i64,
    pub first_due_date: NaiveDate,
    pub installments: u32,
    pub payment_method: PaymentMethod,
}
