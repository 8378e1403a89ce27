//! Audit entry data structures

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::diff::generate_diff;

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// Kinds of records that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[value(name = "catalog")]
    CatalogItem,
    Client,
    Project,
    Analysis,
    Budget,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CatalogItem => "CatalogItem",
            Self::Client => "Client",
            Self::Project => "Project",
            Self::Analysis => "Analysis",
            Self::Budget => "Budget",
        };
        f.write_str(name)
    }
}

/// A record that can be written to the audit log
pub trait Audited: Serialize {
    const ENTITY_TYPE: EntityType;

    /// Display form of the record's ID
    fn audit_id(&self) -> String;

    /// Name shown next to the ID
    fn audit_label(&self) -> &str;

    /// Grand total of the record's worksheet, for priced records
    fn grand_total(&self) -> Option<Decimal> {
        None
    }
}

/// Worksheet grand total on either side of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Decimal>,
}

impl TotalChange {
    fn between(before: Option<Decimal>, after: Option<Decimal>) -> Option<Self> {
        if before.is_none() && after.is_none() {
            None
        } else {
            Some(Self { before, after })
        }
    }

    /// `after - before`, counting a missing side as zero
    pub fn delta(&self) -> Decimal {
        self.after.unwrap_or(Decimal::ZERO) - self.before.unwrap_or(Decimal::ZERO)
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub entity_name: String,

    /// Grand total movement (analyses and budgets only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<TotalChange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Dotted-path summary of the fields an update touched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<String>,
}

impl AuditEntry {
    pub fn created<T: Audited>(record: &T) -> Self {
        Self::build(Operation::Create, record, None, Some(record))
    }

    /// Update entry; the change summary is computed from both snapshots
    pub fn updated<T: Audited>(before: &T, after: &T) -> Self {
        Self::build(Operation::Update, after, Some(before), Some(after))
    }

    pub fn deleted<T: Audited>(record: &T) -> Self {
        Self::build(Operation::Delete, record, Some(record), None)
    }

    fn build<T: Audited>(
        operation: Operation,
        subject: &T,
        before: Option<&T>,
        after: Option<&T>,
    ) -> Self {
        let before_value = before.and_then(|r| serde_json::to_value(r).ok());
        let after_value = after.and_then(|r| serde_json::to_value(r).ok());
        let changes = match (&before_value, &after_value) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            operation,
            entity_type: T::ENTITY_TYPE,
            entity_id: subject.audit_id(),
            entity_name: subject.audit_label().to_string(),
            grand_total: TotalChange::between(
                before.and_then(Audited::grand_total),
                after.and_then(Audited::grand_total),
            ),
            before: before_value,
            after: after_value,
            changes,
        }
    }

    /// Whether an update left every field as it was
    pub fn is_noop(&self) -> bool {
        self.operation == Operation::Update && self.changes.is_none()
    }

    /// Format the entry for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            self.entity_name
        );

        if let Some(total) = &self.grand_total {
            let side = |v: Option<Decimal>| {
                v.map(|d| d.normalize().to_string()).unwrap_or_else(|| "-".into())
            };
            output.push_str(&format!(
                "\n  Grand total: {} -> {}",
                side(total.before),
                side(total.after)
            ));
        }

        if let Some(changes) = &self.changes {
            output.push_str(&format!("\n  Changes: {}", changes));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Estimate {
        id: u32,
        name: String,
        total: Option<Decimal>,
    }

    impl Audited for Estimate {
        const ENTITY_TYPE: EntityType = EntityType::Budget;

        fn audit_id(&self) -> String {
            format!("bud-{}", self.id)
        }

        fn audit_label(&self) -> &str {
            &self.name
        }

        fn grand_total(&self) -> Option<Decimal> {
            self.total
        }
    }

    fn estimate(total: i64) -> Estimate {
        Estimate {
            id: 7,
            name: "Warehouse".into(),
            total: Some(Decimal::from(total)),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(EntityType::CatalogItem.to_string(), "CatalogItem");
        assert_eq!(
            serde_json::to_string(&EntityType::CatalogItem).unwrap(),
            "\"catalog_item\""
        );
    }

    #[test]
    fn test_created_entry_records_total() {
        let entry = AuditEntry::created(&estimate(100));

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_id, "bud-7");
        assert!(entry.before.is_none());
        assert_eq!(entry.after.as_ref().unwrap()["name"], json!("Warehouse"));
        let total = entry.grand_total.unwrap();
        assert_eq!(total.before, None);
        assert_eq!(total.delta(), Decimal::from(100));
    }

    #[test]
    fn test_updated_entry_summarizes_changes() {
        let entry = AuditEntry::updated(&estimate(100), &estimate(130));

        assert_eq!(entry.changes.as_deref(), Some("total: \"100\" -> \"130\""));
        assert_eq!(entry.grand_total.unwrap().delta(), Decimal::from(30));
        assert!(!entry.is_noop());
        assert!(AuditEntry::updated(&estimate(5), &estimate(5)).is_noop());
    }

    #[test]
    fn test_deleted_entry_drops_after() {
        let entry = AuditEntry::deleted(&estimate(40));
        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.after.is_none());
        assert_eq!(entry.grand_total.unwrap().delta(), Decimal::from(-40));
    }

    #[test]
    fn test_unpriced_records_have_no_total() {
        let mut plain = estimate(0);
        plain.total = None;
        assert!(AuditEntry::created(&plain).grand_total.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let formatted = AuditEntry::updated(&estimate(100), &estimate(130)).format_human_readable();
        assert!(formatted.contains("UPDATE Budget bud-7 (Warehouse)"));
        assert!(formatted.contains("Grand total: 100 -> 130"));
        assert!(formatted.contains("Changes: total"));
    }
}
