pub mod user;
pub mod inventory;
pub mod rbac;
pub mod report;

// Re-export only the types we actually use
pub use user::User;
pub use inventory::{
    capacity_alert, AlertDisplay, Condition, Location, LocationSummary, MaterialDisplay,
};
pub use rbac::resolve_role_view;
pub use report::{group_by_name, write_csv, Report, ReportShape, ReportType};
