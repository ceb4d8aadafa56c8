use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub max_capacity: i32,
}

/// A location row with the summed quantity of its materials attached,
/// as shown on the manager-class pages.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct LocationSummary {
    pub id: Uuid,
    pub name: String,
    pub max_capacity: i32,
    pub total_quantity: i64,
}

/// Read model for a material joined with its location and recorder.
/// Used both for page rendering and for CSV rows.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MaterialDisplay {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub condition: String,
    pub location_id: Uuid,
    pub location_name: String,
    pub added_by_username: String,
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct AlertDisplay {
    pub id: Uuid,
    pub location_name: String,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    #[default]
    New,
    Used,
    Repaired,
}

impl Condition {
    /// Parses a submitted condition value. Empty input falls back to the
    /// default; anything else unknown is a validation error.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(Condition::default()),
            "New" => Some(Condition::New),
            "Used" => Some(Condition::Used),
            "Repaired" => Some(Condition::Repaired),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::Used => "Used",
            Condition::Repaired => "Repaired",
        }
    }
}

/// The global capacity flag: non-strict, so hitting the limit exactly
/// already raises it.
pub fn capacity_alert(total_quantity: i64, capacity_limit: i64) -> bool {
    total_quantity >= capacity_limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_alert_triggers_at_and_above_limit() {
        assert!(!capacity_alert(999, 1000));
        assert!(capacity_alert(1000, 1000));
        assert!(capacity_alert(1001, 1000));
    }

    #[test]
    fn capacity_alert_is_global_not_per_location() {
        // Location totals may sit below their own max_capacity while the
        // global sum still crosses the global limit.
        let location_total = 60 + 40;
        assert_eq!(location_total, 100);
        assert!(capacity_alert(location_total, 90));
    }

    #[test]
    fn empty_store_never_alerts_with_default_limit() {
        assert!(!capacity_alert(0, 1000));
    }

    #[test]
    fn condition_parse_defaults_and_rejects() {
        assert_eq!(Condition::parse(""), Some(Condition::New));
        assert_eq!(Condition::parse("Used"), Some(Condition::Used));
        assert_eq!(Condition::parse("Repaired"), Some(Condition::Repaired));
        assert_eq!(Condition::parse("Broken"), None);
        assert_eq!(Condition::parse("used"), None);
    }
}
