//! Storage backends and file formats for household payroll data.
//!
//! Two backends implement [`pay_core::PayrollRepository`]:
//!
//! * `memory` ([`MemoryRepository`]): built-in reference data, nothing persisted.
//! * `files` ([`FileRepository`]): a directory of CSV and TOML files.
//!
//! Call [`register_backends`] to make both available through a
//! [`pay_core::db::RepositoryRegistry`].

pub mod files;
pub mod loader;
pub mod memory;
pub mod profile;
pub mod reference;

use pay_core::db::RepositoryRegistry;

pub use files::{
    CONTRIBUTION_LIMITS_FILE, FileRepository, FileRepositoryFactory, PERFORMANCE_FILE, PERSONS_DIR,
    TAX_YEAR_CONFIG_FILE, WITHHOLDING_TABLES_FILE, profile_file_name,
};
pub use loader::{
    DataLoadError, PerformanceLoader, PerformanceRow, WithholdingTableLoader,
    WithholdingTableRecord, load_contribution_limits, load_tax_year_configs, parse_csv,
};
pub use memory::{MemoryRepository, MemoryRepositoryFactory};
pub use profile::{IncomePeriodEntry, LoadedProfile, PersonProfile};
pub use reference::ReferenceStore;

/// Registers the `memory` and `files` backends.
pub fn register_backends(registry: &mut RepositoryRegistry) {
    registry.register(Box::new(MemoryRepositoryFactory));
    registry.register(Box::new(FileRepositoryFactory));
}
