use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::database::entities::{
    currencies, invoices, invoices::Entity as Invoices, payments, payments::Entity as Payments,
    procurement_options, procurement_options::Entity as ProcurementOptions,
    projects::Entity as Projects,
};
use crate::export::{to_csv_plan, to_summary};
use crate::reconcile::runs_by_recency;
use crate::services::{PlanService, ResultsService};

#[derive(Serialize, Debug, Clone)]
pub struct RunTotal {
    pub run_id: String,
    pub run_timestamp: chrono::DateTime<chrono::Utc>,
    pub records: usize,
    pub total_cost: f64,
}

#[derive(Serialize, Debug, Clone)]
pub struct SupplierSpend {
    pub supplier_name: String,
    pub total_base: f64,
}

#[derive(Serialize, Debug, Clone)]
pub struct CurrencySpend {
    pub currency_code: String,
    pub total: f64,
    pub total_base: f64,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct DeliveryBreakdown {
    pub pending: usize,
    pub ordered: usize,
    pub delivered: usize,
}

/// Aggregates behind the analytics and reports pages. Money figures marked
/// `_base` are converted into the base currency via the currency catalog.
#[derive(Serialize, Debug, Clone)]
pub struct ProjectSummary {
    pub project_id: i32,
    pub project_name: String,
    pub run_totals: Vec<RunTotal>,
    pub planned_total_base: f64,
    pub supplier_spend: Vec<SupplierSpend>,
    pub currency_spend: Vec<CurrencySpend>,
    pub invoiced_total_base: f64,
    pub paid_total_base: f64,
    pub delivery: DeliveryBreakdown,
}

pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn project_summary(&self, project_id: i32) -> Result<ProjectSummary> {
        let project = Projects::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("project {} not found", project_id))?;

        let rates = self.currency_rates().await?;
        let options = self.option_catalog(project_id).await?;

        let results_service = ResultsService::new(self.db.clone());
        let groups = results_service.grouped(project_id).await?;
        let run_totals: Vec<RunTotal> = runs_by_recency(&groups)
            .into_iter()
            .filter_map(|run_id| {
                groups.get(&run_id).map(|group| RunTotal {
                    run_id,
                    run_timestamp: group.run_timestamp,
                    records: group.records.len(),
                    total_cost: group.total_cost,
                })
            })
            .collect();

        let plan_service = PlanService::new(self.db.clone());
        let entries = plan_service.entries(project_id).await?;

        let mut planned_total_base = 0.0;
        let mut supplier_totals: HashMap<String, f64> = HashMap::new();
        let mut currency_totals: HashMap<String, (f64, f64)> = HashMap::new();
        let mut delivery = DeliveryBreakdown::default();

        for entry in &entries {
            let (supplier, currency) = options
                .get(&entry.procurement_option_id)
                .cloned()
                .unwrap_or_else(|| ("unknown supplier".to_string(), "USD".to_string()));
            let rate = rate_for(&rates, &currency);
            let base_amount = entry.final_cost * rate;

            planned_total_base += base_amount;
            *supplier_totals.entry(supplier).or_insert(0.0) += base_amount;
            let slot = currency_totals.entry(currency).or_insert((0.0, 0.0));
            slot.0 += entry.final_cost;
            slot.1 += base_amount;

            match entry.delivery_status.as_str() {
                "delivered" => delivery.delivered += 1,
                "ordered" => delivery.ordered += 1,
                _ => delivery.pending += 1,
            }
        }

        let mut supplier_spend: Vec<SupplierSpend> = supplier_totals
            .into_iter()
            .map(|(supplier_name, total_base)| SupplierSpend {
                supplier_name,
                total_base,
            })
            .collect();
        supplier_spend.sort_by(|a, b| {
            b.total_base
                .partial_cmp(&a.total_base)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut currency_spend: Vec<CurrencySpend> = currency_totals
            .into_iter()
            .map(|(currency_code, (total, total_base))| CurrencySpend {
                currency_code,
                total,
                total_base,
            })
            .collect();
        currency_spend.sort_by(|a, b| a.currency_code.cmp(&b.currency_code));

        let (invoiced_total_base, paid_total_base) =
            self.invoice_totals(project_id, &rates).await?;

        Ok(ProjectSummary {
            project_id,
            project_name: project.name,
            run_totals,
            planned_total_base,
            supplier_spend,
            currency_spend,
            invoiced_total_base,
            paid_total_base,
            delivery,
        })
    }

    /// Render a project artifact for download.
    pub async fn export(&self, project_id: i32, format: &str) -> Result<String> {
        match format.to_lowercase().as_str() {
            "plan-csv" => {
                let plan_service = PlanService::new(self.db.clone());
                let entries = plan_service.entries(project_id).await?;
                to_csv_plan::render(&entries).map_err(|e| anyhow::anyhow!("{}", e))
            }
            "summary" => {
                let summary = self.project_summary(project_id).await?;
                to_summary::render(&summary).map_err(|e| anyhow::anyhow!("{}", e))
            }
            _ => Err(anyhow::anyhow!("Unsupported export format: {}", format)),
        }
    }

    async fn currency_rates(&self) -> Result<HashMap<String, f64>> {
        let rows = currencies::Entity::find().all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.code, row.rate_to_base))
            .collect())
    }

    async fn option_catalog(&self, project_id: i32) -> Result<HashMap<i32, (String, String)>> {
        let rows = ProcurementOptions::find()
            .filter(procurement_options::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.id, (row.supplier_name, row.currency_code)))
            .collect())
    }

    async fn invoice_totals(
        &self,
        project_id: i32,
        rates: &HashMap<String, f64>,
    ) -> Result<(f64, f64)> {
        let invoice_rows = Invoices::find()
            .filter(invoices::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await?;

        let mut invoiced_total_base = 0.0;
        let mut rate_by_invoice: HashMap<i32, f64> = HashMap::new();
        for invoice in &invoice_rows {
            let rate = rate_for(rates, &invoice.currency_code);
            rate_by_invoice.insert(invoice.id, rate);
            if invoice.status != "draft" {
                invoiced_total_base += invoice.amount * rate;
            }
        }

        let invoice_ids: Vec<i32> = invoice_rows.iter().map(|invoice| invoice.id).collect();
        let mut paid_total_base = 0.0;
        if !invoice_ids.is_empty() {
            let payment_rows = Payments::find()
                .filter(payments::Column::InvoiceId.is_in(invoice_ids))
                .all(&self.db)
                .await?;
            for payment in payment_rows {
                let rate = rate_by_invoice.get(&payment.invoice_id).copied().unwrap_or(1.0);
                paid_total_base += payment.amount * rate;
            }
        }

        Ok((invoiced_total_base, paid_total_base))
    }
}

fn rate_for(rates: &HashMap<String, f64>, currency_code: &str) -> f64 {
    match rates.get(currency_code) {
        Some(rate) => *rate,
        None => {
            warn!("No rate for currency {}, assuming base", currency_code);
            1.0
        }
    }
}
