//! How each persisted record identifies itself in the audit log

use rust_decimal::Decimal;

use crate::models::{Analysis, Budget, CatalogItem, Client, Project};

use super::entry::{Audited, EntityType};

impl Audited for CatalogItem {
    const ENTITY_TYPE: EntityType = EntityType::CatalogItem;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> &str {
        &self.name
    }
}

impl Audited for Client {
    const ENTITY_TYPE: EntityType = EntityType::Client;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> &str {
        &self.name
    }
}

impl Audited for Project {
    const ENTITY_TYPE: EntityType = EntityType::Project;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> &str {
        &self.name
    }
}

impl Audited for Analysis {
    const ENTITY_TYPE: EntityType = EntityType::Analysis;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> &str {
        &self.description
    }

    fn grand_total(&self) -> Option<Decimal> {
        Some(self.worksheet.grand_total())
    }
}

impl Audited for Budget {
    const ENTITY_TYPE: EntityType = EntityType::Budget;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> &str {
        &self.name
    }

    fn grand_total(&self) -> Option<Decimal> {
        Some(self.worksheet.grand_total())
    }
}
