//! Status catalog service.
//!
//! The seeded status_codes rows are loaded once at startup and resolved
//! in-memory afterwards; nothing mutates the table at runtime. A miss on a
//! workflow-critical name is an operational misconfiguration, not user error.

use std::collections::HashMap;

use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::status_code;
use crate::error::{AppError, AppResult};
use crate::models::StatusCategory;

/// Seeded names the workflow depends on.
pub mod names {
    pub const DRAFT: &str = "Draft";
    pub const FAILED: &str = "Failed";
    pub const RETEST: &str = "Retest";
    pub const PLANNED: &str = "Planned";
    pub const MEDIUM: &str = "Medium";
}

/// In-memory view of the status_codes table.
#[derive(Debug, Clone)]
pub struct StatusCatalog {
    by_name: HashMap<(StatusCategory, String), Uuid>,
    by_id: HashMap<Uuid, (StatusCategory, String)>,
}

impl StatusCatalog {
    /// Load the catalog from the database.
    pub async fn load(pool: &DbPool) -> AppResult<Self> {
        let rows = db::status_codes::list_all(pool.connection()).await?;

        if rows.is_empty() {
            return Err(AppError::MissingSeedData(
                "The status catalog is empty; run migrations to seed it".to_string(),
            ));
        }

        Ok(Self::from_models(rows))
    }

    /// Build a catalog from entity rows.
    pub fn from_models(rows: Vec<status_code::Model>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();

        for row in rows {
            let Some(category) = StatusCategory::parse(&row.category) else {
                tracing::warn!(
                    "Ignoring status code '{}' with unknown category '{}'",
                    row.name,
                    row.category
                );
                continue;
            };

            by_name.insert((category, row.name.clone()), row.id);
            by_id.insert(row.id, (category, row.name));
        }

        Self { by_name, by_id }
    }

    /// Exact-match lookup of a status id by category and name.
    pub fn resolve(&self, category: StatusCategory, name: &str) -> Option<Uuid> {
        self.by_name.get(&(category, name.to_string())).copied()
    }

    /// Lookup that treats absence as a hard precondition failure.
    ///
    /// Used for the workflow's seed dependencies (Failed, Retest, Medium);
    /// callers abort the enclosing operation on error, no default is
    /// substituted.
    pub fn require(&self, category: StatusCategory, name: &str) -> AppResult<Uuid> {
        self.resolve(category, name).ok_or_else(|| {
            AppError::MissingSeedData(format!("{} '{}' is not seeded", category, name))
        })
    }

    /// Check that an id belongs to a specific category.
    pub fn contains(&self, category: StatusCategory, id: Uuid) -> bool {
        self.by_id
            .get(&id)
            .is_some_and(|(cat, _)| *cat == category)
    }

    /// Check that an id belongs to the catalog at all.
    pub fn contains_id(&self, id: Uuid) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Get the name a catalog id resolves to.
    pub fn name_of(&self, id: Uuid) -> Option<&str> {
        self.by_id.get(&id).map(|(_, name)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(category: &str, name: &str) -> status_code::Model {
        status_code::Model {
            id: Uuid::new_v4(),
            category: category.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_catalog() -> StatusCatalog {
        StatusCatalog::from_models(vec![
            row("TestCaseStatus", "Draft"),
            row("TestCaseStatus", "Passed"),
            row("TestCaseStatus", "Failed"),
            row("TestCaseStatus", "Retest"),
            row("Priority", "Medium"),
        ])
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let catalog = sample_catalog();

        assert!(catalog
            .resolve(StatusCategory::TestCaseStatus, "Failed")
            .is_some());
        assert!(catalog
            .resolve(StatusCategory::TestCaseStatus, "failed")
            .is_none());
        assert!(catalog
            .resolve(StatusCategory::Priority, "Failed")
            .is_none());
    }

    #[test]
    fn test_require_reports_missing_seed() {
        let catalog = sample_catalog();

        let err = catalog
            .require(StatusCategory::Priority, "High")
            .unwrap_err();
        assert!(matches!(err, AppError::MissingSeedData(_)));
        assert_eq!(
            err.to_string(),
            "Missing reference data: Priority 'High' is not seeded"
        );
    }

    #[test]
    fn test_contains_checks_category() {
        let catalog = sample_catalog();
        let failed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Failed")
            .unwrap();

        assert!(catalog.contains(StatusCategory::TestCaseStatus, failed));
        assert!(!catalog.contains(StatusCategory::Priority, failed));
        assert!(catalog.contains_id(failed));
        assert!(!catalog.contains_id(Uuid::new_v4()));
    }

    #[test]
    fn test_name_of() {
        let catalog = sample_catalog();
        let medium = catalog.resolve(StatusCategory::Priority, "Medium").unwrap();

        assert_eq!(catalog.name_of(medium), Some("Medium"));
        assert_eq!(catalog.name_of(Uuid::new_v4()), None);
    }

    #[test]
    fn test_unknown_category_rows_are_ignored() {
        let catalog = StatusCatalog::from_models(vec![
            row("TestCaseStatus", "Draft"),
            row("Severity", "Critical"),
        ]);

        assert!(catalog
            .resolve(StatusCategory::TestCaseStatus, "Draft")
            .is_some());
        assert_eq!(catalog.by_id.len(), 1);
    }
}
