use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Sports a field can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Soccer,
    Futsal,
    #[serde(rename = "mini soccer")]
    MiniSoccer,
    Basketball,
    Volleyball,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::Soccer,
        FieldType::Futsal,
        FieldType::MiniSoccer,
        FieldType::Basketball,
        FieldType::Volleyball,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Soccer => "soccer",
            FieldType::Futsal => "futsal",
            FieldType::MiniSoccer => "mini soccer",
            FieldType::Basketball => "basketball",
            FieldType::Volleyball => "volleyball",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == code)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Field {
    pub field_id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub field_type: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Field {
    pub fn parsed_type(&self) -> Option<FieldType> {
        FieldType::parse(&self.field_type)
    }
}

/// Field row joined with the owning venue's name.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct FieldWithVenue {
    pub field_id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub field_type: String,
    pub venue_name: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}
