use std::collections::BTreeMap;

use async_trait::async_trait;
use pay_core::db::{RepositoryFactory, StoreConfig};
use pay_core::{
    ContributionLimits, PayrollRepository, PerformanceRecord, Person, RepositoryError,
    TaxYearConfig, WithholdingTables,
};
use tokio::sync::RwLock;

use crate::reference::ReferenceStore;

/// Repository kept entirely in memory. Nothing survives the process.
pub struct MemoryRepository {
    reference: ReferenceStore,
    persons: RwLock<BTreeMap<String, Person>>,
    performance: RwLock<Vec<PerformanceRecord>>,
}

impl MemoryRepository {
    pub fn new(reference: ReferenceStore) -> Self {
        Self {
            reference,
            persons: RwLock::new(BTreeMap::new()),
            performance: RwLock::new(Vec::new()),
        }
    }

    pub fn builtin() -> Result<Self, RepositoryError> {
        let reference =
            ReferenceStore::builtin().map_err(|e| RepositoryError::Storage(e.to_string()))?;
        Ok(Self::new(reference))
    }
}

/// Replaces the record with the same year, account type, account name and
/// owner, or appends it.
pub(crate) fn upsert_record(
    records: &mut Vec<PerformanceRecord>,
    record: &PerformanceRecord,
) {
    let existing = records.iter_mut().find(|r| {
        r.year == record.year
            && r.account_type == record.account_type
            && r.account_name == record.account_name
            && r.owner == record.owner
    });
    match existing {
        Some(slot) => *slot = record.clone(),
        None => records.push(record.clone()),
    }
}

#[async_trait]
impl PayrollRepository for MemoryRepository {
    async fn get_tax_year_config(
        &self,
        year: i32,
    ) -> Result<TaxYearConfig, RepositoryError> {
        self.reference.tax_year_config(year)
    }

    async fn list_tax_years(&self) -> Result<Vec<i32>, RepositoryError> {
        Ok(self.reference.tax_years())
    }

    async fn get_contribution_limits(
        &self,
        year: i32,
    ) -> Result<ContributionLimits, RepositoryError> {
        self.reference.contribution_limits(year)
    }

    async fn get_withholding_tables(
        &self,
        year: i32,
    ) -> Result<WithholdingTables, RepositoryError> {
        self.reference.withholding_tables(year)
    }

    async fn get_person(
        &self,
        name: &str,
    ) -> Result<Person, RepositoryError> {
        self.persons
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("person '{name}'")))
    }

    async fn list_persons(&self) -> Result<Vec<Person>, RepositoryError> {
        Ok(self.persons.read().await.values().cloned().collect())
    }

    async fn save_person(
        &self,
        person: &Person,
    ) -> Result<(), RepositoryError> {
        self.persons
            .write()
            .await
            .insert(person.name.clone(), person.clone());
        Ok(())
    }

    async fn list_performance_records(
        &self,
        year: i32,
    ) -> Result<Vec<PerformanceRecord>, RepositoryError> {
        Ok(self
            .performance
            .read()
            .await
            .iter()
            .filter(|r| r.year == year)
            .cloned()
            .collect())
    }

    async fn upsert_performance_record(
        &self,
        record: &PerformanceRecord,
    ) -> Result<(), RepositoryError> {
        upsert_record(&mut *self.performance.write().await, record);
        Ok(())
    }
}

/// [`RepositoryFactory`] for the `"memory"` backend. The location is
/// ignored and the built-in reference data is used.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn PayrollRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::builtin()?))
    }
}
