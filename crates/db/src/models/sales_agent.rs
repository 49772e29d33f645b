//! Sales agent models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::money::{percent_of, round_cents, to_decimal, to_f64};
use gestora_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;

/// A live row from `sales_agents`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SalesAgent {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub commission_percent: f64,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a sales agent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSalesAgent {
    pub code: String,
    pub name: String,
    #[validate(length(max = 32))]
    pub tax_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub commission_percent: Option<f64>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a sales agent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSalesAgent {
    pub code: Option<String>,
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub tax_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub commission_percent: Option<f64>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// A billed invoice counted towards an agent's commission.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommissionInvoice {
    pub invoice_id: DbId,
    pub code: Option<String>,
    pub issue_date: Date,
    pub customer_name: String,
    pub status: String,
    pub subtotal: f64,
}

/// One invoice line of the commission report.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionEntry {
    #[serde(flatten)]
    pub invoice: CommissionInvoice,
    pub commission: f64,
}

/// Commission earned by one agent over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionReport {
    pub sales_agent_id: DbId,
    pub code: String,
    pub name: String,
    pub commission_percent: f64,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub invoices: Vec<CommissionEntry>,
    pub billed_subtotal: f64,
    pub commission_total: f64,
}

impl CommissionReport {
    /// Apply the agent's percentage to each invoice subtotal.
    pub fn build(
        agent: &SalesAgent,
        invoices: Vec<CommissionInvoice>,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Self {
        let percent = to_decimal(agent.commission_percent);
        let mut billed = Decimal::ZERO;
        let mut commission_total = Decimal::ZERO;

        let invoices = invoices
            .into_iter()
            .map(|invoice| {
                let subtotal = to_decimal(invoice.subtotal);
                let commission = round_cents(percent_of(subtotal, percent));
                billed += subtotal;
                commission_total += commission;
                CommissionEntry {
                    invoice,
                    commission: to_f64(commission),
                }
            })
            .collect();

        Self {
            sales_agent_id: agent.id,
            code: agent.code.clone(),
            name: agent.name.clone(),
            commission_percent: agent.commission_percent,
            from,
            to,
            invoices,
            billed_subtotal: to_f64(round_cents(billed)),
            commission_total: to_f64(commission_total),
        }
    }
}
