use serde_json::json;
use std::error::Error;

use crate::services::ProjectSummary;

const TEMPLATE: &str = r#"Procurement summary: {{summary.project_name}}

Optimization runs ({{run_count}}):
{{#each summary.run_totals as |run|}}
  {{run.run_id}}  {{run.records}} decisions, total {{money run.total_cost}}
{{/each}}

Planned spend (base currency): {{money summary.planned_total_base}}
Invoiced: {{money summary.invoiced_total_base}}  Paid: {{money summary.paid_total_base}}

By supplier:
{{#each summary.supplier_spend as |row|}}
  {{row.supplier_name}}: {{money row.total_base}}
{{/each}}

By currency:
{{#each summary.currency_spend as |row|}}
  {{row.currency_code}}: {{money row.total}} ({{money row.total_base}} base)
{{/each}}

Deliveries: {{summary.delivery.pending}} pending, {{summary.delivery.ordered}} ordered, {{summary.delivery.delivered}} delivered
"#;

pub fn render(summary: &ProjectSummary) -> Result<String, Box<dyn Error>> {
    let handlebars = crate::common::get_handlebars();

    let context = json!({
        "summary": summary,
        "run_count": summary.run_totals.len(),
    });

    let res = handlebars.render_template(TEMPLATE, &context)?;
    Ok(res)
}
