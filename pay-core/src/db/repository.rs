use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    ContributionLimits, PerformanceRecord, Person, TaxYearConfig, WithholdingTables,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Source of reference data, household profiles and observed contributions.
///
/// Calculations never call the repository themselves; callers load what
/// they need and hand plain values to the calculators.
#[async_trait]
pub trait PayrollRepository: Send + Sync {
    // Tax year config
    async fn get_tax_year_config(&self, year: i32) -> Result<TaxYearConfig, RepositoryError>;
    async fn list_tax_years(&self) -> Result<Vec<i32>, RepositoryError>;

    // Contribution limits
    async fn get_contribution_limits(&self, year: i32)
    -> Result<ContributionLimits, RepositoryError>;

    // Withholding tables
    async fn get_withholding_tables(&self, year: i32)
    -> Result<WithholdingTables, RepositoryError>;

    // Household members
    async fn get_person(&self, name: &str) -> Result<Person, RepositoryError>;
    async fn list_persons(&self) -> Result<Vec<Person>, RepositoryError>;
    async fn save_person(&self, person: &Person) -> Result<(), RepositoryError>;

    // Observed contributions
    async fn list_performance_records(
        &self,
        year: i32,
    ) -> Result<Vec<PerformanceRecord>, RepositoryError>;

    /// Inserts or replaces the record with the same year, account type,
    /// account name and owner.
    async fn upsert_performance_record(
        &self,
        record: &PerformanceRecord,
    ) -> Result<(), RepositoryError>;
}
