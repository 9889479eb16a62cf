//! Record types for buildings, companies and their rubric associations.

use serde::{Deserialize, Serialize};

/// One (company, rubric) association as returned by a storage query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct FlatCompanyRow {
    pub name: String,
    pub phones: String,
    pub address: String,
    #[serde(rename = "rubric")]
    #[cfg_attr(feature = "database", sqlx(rename = "rubric"))]
    pub rubric_id: i64,
}

impl FlatCompanyRow {
    pub fn new(
        name: impl Into<String>,
        phones: impl Into<String>,
        address: impl Into<String>,
        rubric_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            phones: phones.into(),
            address: address.into(),
            rubric_id,
        }
    }

    /// Group identity used by sort and aggregation.
    pub fn company_key(&self) -> (&str, &str) {
        (&self.name, &self.address)
    }
}

/// A company with every matching rubric id collected into one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedCompany {
    pub name: String,
    pub phones: String,
    pub address: String,
    pub rubrics: Vec<i64>,
}

/// Company as declared inside a building insert request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    #[serde(default)]
    pub phones: String,
    #[serde(default)]
    pub rubrics: Vec<i64>,
}

/// Insert request body: a building and the companies it houses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub address: String,
    #[serde(default)]
    pub coordinates: String,
    #[serde(default)]
    pub companies: Vec<CompanyInput>,
}

/// Identifiers generated by a successful building insert.
///
/// `company_ids` follows the order of `Building::companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedBuilding {
    pub building_id: i64,
    pub company_ids: Vec<i64>,
}
