//! Status catalog models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::status_code;

/// Categories of seeded status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StatusCategory {
    TestCaseStatus,
    TestRunStatus,
    Priority,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestCaseStatus => "TestCaseStatus",
            Self::TestRunStatus => "TestRunStatus",
            Self::Priority => "Priority",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TestCaseStatus" => Some(Self::TestCaseStatus),
            "TestRunStatus" => Some(Self::TestRunStatus),
            "Priority" => Some(Self::Priority),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response for a status code.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCodeResponse {
    pub id: Uuid,
    pub category: String,
    pub name: String,
}

impl From<status_code::Model> for StatusCodeResponse {
    fn from(model: status_code::Model) -> Self {
        Self {
            id: model.id,
            category: model.category,
            name: model.name,
        }
    }
}

/// Status catalog listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCodeListResponse {
    pub status_codes: Vec<StatusCodeResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in [
            StatusCategory::TestCaseStatus,
            StatusCategory::TestRunStatus,
            StatusCategory::Priority,
        ] {
            assert_eq!(StatusCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(StatusCategory::parse("Severity"), None);
    }
}
