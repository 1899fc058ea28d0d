use chrono::Utc;
use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::database::entities::{items, procurement_options, project_items};

const ITEM_CODE_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.-]*$";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("unknown import kind '{0}'")]
    UnknownKind(String),
    #[error("import kind '{0}' requires a project")]
    MissingProject(String),
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Outcome of one CSV import. Row-level problems are collected here rather
/// than aborting the whole file.
#[derive(Serialize, Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<String>,
}

struct Columns {
    header: StringRecord,
}

impl Columns {
    fn new(header: StringRecord) -> Self {
        Self { header }
    }

    fn required(&self, name: &'static str) -> Result<usize, ImportError> {
        self.header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(ImportError::MissingColumn(name))
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

pub struct ImportService {
    db: DatabaseConnection,
}

impl ImportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Dispatch on the import kind used in the API path and the CLI.
    pub async fn import(
        &self,
        project_id: Option<i32>,
        kind: &str,
        csv_text: &str,
    ) -> Result<ImportReport, ImportError> {
        match (kind, project_id) {
            ("items", _) => self.import_items(csv_text).await,
            ("project-items", Some(project)) => self.import_project_items(project, csv_text).await,
            ("options", Some(project)) => self.import_options(project, csv_text).await,
            ("project-items" | "options", None) => {
                Err(ImportError::MissingProject(kind.to_string()))
            }
            _ => Err(ImportError::UnknownKind(kind.to_string())),
        }
    }

    /// Items master rows: `item_code,name,unit[,category]`. Codes already in
    /// the master are left alone and reported as skipped.
    pub async fn import_items(&self, csv_text: &str) -> Result<ImportReport, ImportError> {
        let code_pattern = Regex::new(ITEM_CODE_PATTERN)?;
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());
        let columns = Columns::new(reader.headers()?.clone());

        let code_col = columns.required("item_code")?;
        let name_col = columns.required("name")?;
        let unit_col = columns.required("unit")?;
        let category_col = columns.optional("category");

        let mut report = ImportReport::default();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = index + 2; // header is row 1

            let code = record.get(code_col).unwrap_or("").to_string();
            if !code_pattern.is_match(&code) {
                warn!("Skipping item with invalid code: {:?}", code);
                report.skipped.push(format!("row {}: invalid item code {:?}", row, code));
                continue;
            }

            let existing = items::Entity::find()
                .filter(items::Column::ItemCode.eq(code.clone()))
                .one(&self.db)
                .await?;
            if existing.is_some() {
                report.skipped.push(format!("row {}: item {} already exists", row, code));
                continue;
            }

            let now = Utc::now();
            items::ActiveModel {
                item_code: Set(code.clone()),
                name: Set(record.get(name_col).unwrap_or(&code).to_string()),
                unit: Set(record.get(unit_col).unwrap_or("unit").to_string()),
                category: Set(category_col
                    .and_then(|col| record.get(col))
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
            report.imported += 1;
        }

        Ok(report)
    }

    /// Project demand rows: `item_code,quantity[,need_time]`.
    pub async fn import_project_items(
        &self,
        project_id: i32,
        csv_text: &str,
    ) -> Result<ImportReport, ImportError> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());
        let columns = Columns::new(reader.headers()?.clone());

        let code_col = columns.required("item_code")?;
        let quantity_col = columns.required("quantity")?;
        let need_time_col = columns.optional("need_time");

        let mut report = ImportReport::default();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = index + 2;

            let code = record.get(code_col).unwrap_or("").to_string();
            if code.is_empty() {
                report.skipped.push(format!("row {}: empty item code", row));
                continue;
            }

            let Ok(quantity) = record.get(quantity_col).unwrap_or("").parse::<f64>() else {
                report.skipped.push(format!("row {}: unparsable quantity", row));
                continue;
            };

            let need_time = need_time_col
                .and_then(|col| record.get(col))
                .and_then(|value| value.parse::<i32>().ok())
                .unwrap_or(1);

            let now = Utc::now();
            project_items::ActiveModel {
                project_id: Set(project_id),
                item_code: Set(code),
                quantity: Set(quantity),
                need_time: Set(need_time),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
            report.imported += 1;
        }

        Ok(report)
    }

    /// Supplier quotes: `item_code,supplier_name,base_cost[,currency_code,lomc_lead_time]`.
    pub async fn import_options(
        &self,
        project_id: i32,
        csv_text: &str,
    ) -> Result<ImportReport, ImportError> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());
        let columns = Columns::new(reader.headers()?.clone());

        let code_col = columns.required("item_code")?;
        let supplier_col = columns.required("supplier_name")?;
        let cost_col = columns.required("base_cost")?;
        let currency_col = columns.optional("currency_code");
        let lead_time_col = columns.optional("lomc_lead_time");

        let mut report = ImportReport::default();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = index + 2;

            let code = record.get(code_col).unwrap_or("").to_string();
            let supplier = record.get(supplier_col).unwrap_or("").to_string();
            if code.is_empty() || supplier.is_empty() {
                report.skipped.push(format!("row {}: missing item code or supplier", row));
                continue;
            }

            let Ok(base_cost) = record.get(cost_col).unwrap_or("").parse::<f64>() else {
                report.skipped.push(format!("row {}: unparsable base cost", row));
                continue;
            };

            let currency = currency_col
                .and_then(|col| record.get(col))
                .filter(|value| !value.is_empty())
                .unwrap_or("USD")
                .to_string();
            let lead_time = lead_time_col
                .and_then(|col| record.get(col))
                .and_then(|value| value.parse::<i32>().ok())
                .unwrap_or(0);

            let now = Utc::now();
            procurement_options::ActiveModel {
                project_id: Set(project_id),
                item_code: Set(code),
                supplier_name: Set(supplier),
                base_cost: Set(base_cost),
                currency_code: Set(currency),
                lomc_lead_time: Set(lead_time),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
            report.imported += 1;
        }

        Ok(report)
    }
}
