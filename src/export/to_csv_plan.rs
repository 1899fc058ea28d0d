use csv::Writer;
use std::error::Error;

use crate::database::entities::plan_entries;

pub fn render(entries: &[plan_entries::Model]) -> Result<String, Box<dyn Error>> {
    let mut wtr = Writer::from_writer(vec![]);

    // Write the header
    wtr.write_record([
        "run_id",
        "item_code",
        "procurement_option_id",
        "quantity",
        "purchase_time",
        "delivery_time",
        "final_cost",
        "delivery_status",
        "invoiced",
    ])?;

    for entry in entries {
        wtr.write_record([
            entry.run_id.clone(),
            entry.item_code.clone(),
            entry.procurement_option_id.to_string(),
            entry.quantity.to_string(),
            entry.purchase_time.to_string(),
            entry.delivery_time.to_string(),
            format!("{:.2}", entry.final_cost),
            entry.delivery_status.clone(),
            entry.invoiced.to_string(),
        ])?;
    }

    let data = wtr.into_inner()?;
    let csv_string = String::from_utf8(data)?;

    Ok(csv_string)
}
