pub mod import_service;
pub mod plan_service;
pub mod report_service;
pub mod results_service;

pub use import_service::*;
pub use plan_service::*;
pub use report_service::*;
pub use results_service::*;
