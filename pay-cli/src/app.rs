use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use tracing::{debug, info};

use pay_core::calculations::{
    HouseholdSummary, JointAccountAllocator, JointPolicy, PersonReport, ReferenceData,
};
use pay_core::db::RepositoryRegistry;
use pay_core::{FilingStatus, PayrollRepository, PerformanceRecord, Person};
use pay_data::register_backends;

use crate::views::{HouseholdView, PaycheckView, RoomView, TablesView};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Take-home pay per paycheck and for the year, with bonus and budget.
    Paycheck {
        /// Household member name, as in their profile.
        name: String,
    },
    /// Contributions so far, projections and remaining room per account.
    Room {
        /// Household member name, as in their profile.
        name: String,
    },
    /// Pay and contributions summed across the household.
    Household,
    /// Print the withholding tables for the year.
    Tables {
        /// Only this filing status (S, MFJ, MFS or HOH).
        #[arg(long)]
        status: Option<String>,
    },
}

/// Registry with every backend this build knows about.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    register_backends(&mut registry);
    registry
}

/// Picks the as-of date for a run.
///
/// With only `--year`, a past or future year is viewed from January 1 so
/// the whole year is projected. `--today` must fall inside `--year` when
/// both are given.
pub fn resolve_as_of(
    year: Option<i32>,
    today: Option<NaiveDate>,
    local_today: NaiveDate,
) -> Result<NaiveDate> {
    match (year, today) {
        (None, Some(today)) => Ok(today),
        (None, None) => Ok(local_today),
        (Some(year), Some(today)) if today.year() == year => Ok(today),
        (Some(year), Some(today)) => {
            bail!("--today {today} is not in tax year {year}")
        }
        (Some(year), None) if local_today.year() == year => Ok(local_today),
        (Some(year), None) => NaiveDate::from_ymd_opt(year, 1, 1)
            .with_context(|| format!("tax year {year} is out of range")),
    }
}

pub async fn load_reference_data(
    repo: &dyn PayrollRepository,
    year: i32,
) -> Result<ReferenceData> {
    let available = repo.list_tax_years().await?;
    if !available.contains(&year) {
        bail!("no reference data for tax year {year}; available: {available:?}");
    }

    let config = repo
        .get_tax_year_config(year)
        .await
        .with_context(|| format!("Failed to load tax year config for {year}"))?;
    let limits = repo
        .get_contribution_limits(year)
        .await
        .with_context(|| format!("Failed to load contribution limits for {year}"))?;
    let tables = repo
        .get_withholding_tables(year)
        .await
        .with_context(|| format!("Failed to load withholding tables for {year}"))?;

    Ok(ReferenceData::new(config, limits, tables)?)
}

/// Everything needed to build reports for one tax year.
pub struct Household {
    pub reference: ReferenceData,
    pub persons: Vec<Person>,
    pub records: Vec<PerformanceRecord>,
    pub allocator: JointAccountAllocator,
}

impl Household {
    pub async fn load(
        repo: &dyn PayrollRepository,
        year: i32,
    ) -> Result<Self> {
        let reference = load_reference_data(repo, year).await?;
        let persons = repo
            .list_persons()
            .await
            .context("Failed to load household profiles")?;
        let records = repo
            .list_performance_records(year)
            .await
            .with_context(|| format!("Failed to load contributions for {year}"))?;
        debug!(
            members = persons.len(),
            records = records.len(),
            "Loaded household"
        );

        let allocator = JointAccountAllocator::new(
            JointPolicy::default(),
            persons.iter().map(|p| p.name.clone()).collect(),
        );

        Ok(Self {
            reference,
            persons,
            records,
            allocator,
        })
    }

    pub fn report(
        &self,
        name: &str,
        today: NaiveDate,
    ) -> Result<PersonReport> {
        let person = self
            .persons
            .iter()
            .find(|p| p.name == name)
            .with_context(|| {
                let names: Vec<&str> = self.persons.iter().map(|p| p.name.as_str()).collect();
                format!("no household member named '{name}'; members: {names:?}")
            })?;
        self.build(person, today)
    }

    pub fn summary(
        &self,
        today: NaiveDate,
    ) -> Result<HouseholdSummary> {
        let reports = self
            .persons
            .iter()
            .map(|person| self.build(person, today))
            .collect::<Result<Vec<_>>>()?;
        Ok(HouseholdSummary::from_reports(
            &reports,
            &self.records,
            &self.allocator,
        ))
    }

    fn build(
        &self,
        person: &Person,
        today: NaiveDate,
    ) -> Result<PersonReport> {
        PersonReport::build(
            &self.reference,
            person,
            &self.records,
            &self.allocator,
            today,
        )
        .with_context(|| format!("Failed to build report for {}", person.name))
    }
}

/// Runs one subcommand and returns what should be printed.
pub async fn run(
    repo: &dyn PayrollRepository,
    command: &Command,
    as_of: NaiveDate,
) -> Result<String> {
    let year = as_of.year();
    info!(year, %as_of, "Running {command:?}");

    let output = match command {
        Command::Paycheck { name } => {
            let report = Household::load(repo, year).await?.report(name, as_of)?;
            PaycheckView(&report).to_string()
        }
        Command::Room { name } => {
            let report = Household::load(repo, year).await?.report(name, as_of)?;
            RoomView(&report).to_string()
        }
        Command::Household => {
            let household = Household::load(repo, year).await?;
            let summary = household.summary(as_of)?;
            HouseholdView {
                tax_year: household.reference.tax_year(),
                summary: &summary,
            }
            .to_string()
        }
        Command::Tables { status } => {
            let status = status
                .as_deref()
                .map(|code| {
                    FilingStatus::parse(code)
                        .with_context(|| format!("unknown filing status '{code}'"))
                })
                .transpose()?;
            let reference = load_reference_data(repo, year).await?;
            TablesView {
                tables: reference.tables(),
                status,
            }
            .to_string()
        }
    };

    Ok(output)
}
