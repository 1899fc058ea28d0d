pub mod to_csv_plan;
pub mod to_summary;
