//! Repository backed by a directory of CSV and TOML files.
//!
//! ```text
//! <root>/
//!   withholding_tables.csv    optional, merged over the built-in tables
//!   contribution_limits.csv   optional, merged over the built-in limits
//!   tax_year_config.csv       optional, merged over the built-in config
//!   performance.csv           optional, created on first upsert
//!   persons/<name>.toml       one profile per household member
//! ```

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pay_core::db::{RepositoryFactory, StoreConfig};
use pay_core::{
    ContributionLimits, PayrollRepository, PerformanceRecord, Person, RepositoryError,
    TaxYearConfig, WithholdingTables,
};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::loader::{
    DataLoadError, PerformanceLoader, WithholdingTableLoader, load_contribution_limits,
    load_tax_year_configs,
};
use crate::memory::upsert_record;
use crate::profile::PersonProfile;
use crate::reference::ReferenceStore;

pub const WITHHOLDING_TABLES_FILE: &str = "withholding_tables.csv";
pub const CONTRIBUTION_LIMITS_FILE: &str = "contribution_limits.csv";
pub const TAX_YEAR_CONFIG_FILE: &str = "tax_year_config.csv";
pub const PERFORMANCE_FILE: &str = "performance.csv";
pub const PERSONS_DIR: &str = "persons";

pub struct FileRepository {
    root: PathBuf,
    reference: ReferenceStore,
    /// Serializes read-modify-write cycles on the performance file.
    performance_lock: Mutex<()>,
}

impl FileRepository {
    /// Opens `root`, creating it and its `persons/` directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        fs::create_dir_all(root.join(PERSONS_DIR))
            .await
            .map_err(|e| io_error(&root, e))?;

        let mut reference =
            ReferenceStore::builtin().map_err(|e| RepositoryError::Storage(e.to_string()))?;

        if let Some(text) = read_optional(&root.join(TAX_YEAR_CONFIG_FILE)).await? {
            reference.merge_configs(
                load_tax_year_configs(text.as_bytes())
                    .map_err(|e| load_error(&root, TAX_YEAR_CONFIG_FILE, e))?,
            );
        }
        if let Some(text) = read_optional(&root.join(CONTRIBUTION_LIMITS_FILE)).await? {
            reference.merge_limits(
                load_contribution_limits(text.as_bytes())
                    .map_err(|e| load_error(&root, CONTRIBUTION_LIMITS_FILE, e))?,
            );
        }
        if let Some(text) = read_optional(&root.join(WITHHOLDING_TABLES_FILE)).await? {
            reference.merge_tables(
                WithholdingTableLoader::load(text.as_bytes())
                    .map_err(|e| load_error(&root, WITHHOLDING_TABLES_FILE, e))?,
            );
        }

        info!(root = %root.display(), years = ?reference.tax_years(), "Opened file store");

        Ok(Self {
            root,
            reference,
            performance_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn persons_dir(&self) -> PathBuf {
        self.root.join(PERSONS_DIR)
    }

    fn performance_path(&self) -> PathBuf {
        self.root.join(PERFORMANCE_FILE)
    }

    async fn read_performance(&self) -> Result<Vec<PerformanceRecord>, RepositoryError> {
        match read_optional(&self.performance_path()).await? {
            Some(text) => PerformanceLoader::parse(text.as_bytes())
                .map_err(|e| load_error(&self.root, PERFORMANCE_FILE, e)),
            None => Ok(Vec::new()),
        }
    }

    async fn load_profile(
        &self,
        path: &Path,
    ) -> Result<Person, RepositoryError> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| io_error(path, e))?;
        let loaded = PersonProfile::parse(&text)
            .and_then(PersonProfile::into_person)
            .map_err(|e| RepositoryError::Storage(format!("{}: {e}", path.display())))?;
        Ok(loaded.person)
    }
}

/// File name used for a person's profile: lowercase, with anything other
/// than ASCII letters and digits replaced by `-`.
pub fn profile_file_name(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{stem}.toml")
}

async fn read_optional(path: &Path) -> Result<Option<String>, RepositoryError> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "File not present");
            Ok(None)
        }
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(
    path: &Path,
    source: io::Error,
) -> RepositoryError {
    RepositoryError::Storage(
        DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        }
        .to_string(),
    )
}

fn load_error(
    root: &Path,
    file: &str,
    err: DataLoadError,
) -> RepositoryError {
    RepositoryError::Storage(format!("{}: {err}", root.join(file).display()))
}

#[async_trait]
impl PayrollRepository for FileRepository {
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
        let path = self.persons_dir().join(profile_file_name(name));
        if fs::try_exists(&path).await.map_err(|e| io_error(&path, e))? {
            let person = self.load_profile(&path).await?;
            if person.name == name {
                return Ok(person);
            }
        }

        // Profiles written by hand may not follow the file naming rule.
        self.list_persons()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| RepositoryError::NotFound(format!("person '{name}'")))
    }

    async fn list_persons(&self) -> Result<Vec<Person>, RepositoryError> {
        let dir = self.persons_dir();
        let mut entries = fs::read_dir(&dir).await.map_err(|e| io_error(&dir, e))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }

        let mut persons = Vec::with_capacity(paths.len());
        for path in paths {
            persons.push(self.load_profile(&path).await?);
        }
        persons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(persons)
    }

    async fn save_person(
        &self,
        person: &Person,
    ) -> Result<(), RepositoryError> {
        let path = self.persons_dir().join(profile_file_name(&person.name));
        let text = PersonProfile::from_person(person)
            .to_toml()
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        fs::write(&path, text)
            .await
            .map_err(|e| io_error(&path, e))?;
        debug!(person = %person.name, path = %path.display(), "Saved profile");
        Ok(())
    }

    async fn list_performance_records(
        &self,
        year: i32,
    ) -> Result<Vec<PerformanceRecord>, RepositoryError> {
        let mut records = self.read_performance().await?;
        records.retain(|r| r.year == year);
        Ok(records)
    }

    async fn upsert_performance_record(
        &self,
        record: &PerformanceRecord,
    ) -> Result<(), RepositoryError> {
        let _guard = self.performance_lock.lock().await;

        let mut records = self.read_performance().await?;
        upsert_record(&mut records, record);

        let mut buffer = Vec::new();
        PerformanceLoader::write(&mut buffer, &records)
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        let path = self.performance_path();
        fs::write(&path, buffer)
            .await
            .map_err(|e| io_error(&path, e))?;
        Ok(())
    }
}

/// [`RepositoryFactory`] for the `"files"` backend. `location` is the
/// store directory.
pub struct FileRepositoryFactory;

#[async_trait]
impl RepositoryFactory for FileRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "files"
    }

    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn PayrollRepository>, RepositoryError> {
        if config.location.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "the files backend needs a store directory".to_string(),
            ));
        }
        Ok(Box::new(FileRepository::open(&config.location).await?))
    }
}
