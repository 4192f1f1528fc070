//! CSV readers for reference data and observed contributions.
//!
//! | File                        | Columns |
//! |-----------------------------|---------|
//! | `withholding_tables.csv`    | `tax_year,filing_status,variant,threshold,base_withholding,rate` |
//! | `contribution_limits.csv`   | `plan_year,k401_employee,k401_catch_up,hsa_self,hsa_family,hsa_catch_up,ira_self,ira_catch_up` |
//! | `tax_year_config.csv`       | `tax_year,social_security_rate,medicare_rate,child_tax_credit,other_dependent_credit,allowance_amount,supplemental_rate` |
//! | `performance.csv`           | `year,account_type,account_name,owner,contributions,employer_match` |
//!
//! Withholding rows may appear in any order; each `(tax_year,
//! filing_status, variant)` group is sorted by threshold before it is
//! validated.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::PathBuf;

use pay_core::{
    AccountType, ContributionLimits, FilingStatus, PerformanceRecord, TableError, TableVariant,
    TaxYearConfig, WithholdingBracket, WithholdingTable, WithholdingTables,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown filing status '{value}' on row {row}")]
    UnknownFilingStatus { value: String, row: usize },

    #[error("unknown table variant '{value}' on row {row}")]
    UnknownTableVariant { value: String, row: usize },

    #[error("unknown account type '{value}' on row {row}")]
    UnknownAccountType { value: String, row: usize },

    #[error("invalid {status} {variant} table for {tax_year}: {source}")]
    InvalidTable {
        tax_year: i32,
        status: FilingStatus,
        variant: TableVariant,
        #[source]
        source: TableError,
    },

    #[error("invalid date '{value}' for {field}")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid profile for {name}: {reason}")]
    InvalidProfile { name: String, reason: String },
}

impl From<csv::Error> for DataLoadError {
    fn from(err: csv::Error) -> Self {
        DataLoadError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for DataLoadError {
    fn from(err: toml::de::Error) -> Self {
        DataLoadError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for DataLoadError {
    fn from(err: toml::ser::Error) -> Self {
        DataLoadError::Toml(err.to_string())
    }
}

/// Deserializes every row of a headed CSV.
pub fn parse_csv<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, DataLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

/// A single row of `withholding_tables.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WithholdingTableRecord {
    pub tax_year: i32,
    pub filing_status: String,
    pub variant: String,
    pub threshold: Decimal,
    pub base_withholding: Decimal,
    pub rate: Decimal,
}

pub struct WithholdingTableLoader;

impl WithholdingTableLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<WithholdingTableRecord>, DataLoadError> {
        parse_csv(reader)
    }

    /// Groups rows into one [`WithholdingTables`] per tax year.
    ///
    /// Unknown filing status codes and variants are errors, not warnings.
    pub fn build(
        records: &[WithholdingTableRecord]
    ) -> Result<BTreeMap<i32, WithholdingTables>, DataLoadError> {
        let mut groups: BTreeMap<(i32, FilingStatus, TableVariant), Vec<WithholdingBracket>> =
            BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            let row = index + 1;
            let status = FilingStatus::parse(&record.filing_status).ok_or_else(|| {
                DataLoadError::UnknownFilingStatus {
                    value: record.filing_status.clone(),
                    row,
                }
            })?;
            let variant = TableVariant::parse(&record.variant).ok_or_else(|| {
                DataLoadError::UnknownTableVariant {
                    value: record.variant.clone(),
                    row,
                }
            })?;

            groups
                .entry((record.tax_year, status, variant))
                .or_default()
                .push(WithholdingBracket::new(
                    record.threshold,
                    record.base_withholding,
                    record.rate,
                ));
        }

        let mut years: BTreeMap<i32, WithholdingTables> = BTreeMap::new();
        for ((tax_year, status, variant), mut brackets) in groups {
            brackets.sort_by(|a, b| a.threshold.cmp(&b.threshold));
            let table =
                WithholdingTable::new(brackets).map_err(|source| DataLoadError::InvalidTable {
                    tax_year,
                    status,
                    variant,
                    source,
                })?;
            years
                .entry(tax_year)
                .or_insert_with(|| WithholdingTables::new(tax_year))
                .insert(status, variant, table);
        }

        Ok(years)
    }

    pub fn load<R: Read>(reader: R) -> Result<BTreeMap<i32, WithholdingTables>, DataLoadError> {
        Self::build(&Self::parse(reader)?)
    }
}

/// Reads `contribution_limits.csv`, keyed by plan year.
pub fn load_contribution_limits<R: Read>(
    reader: R
) -> Result<BTreeMap<i32, ContributionLimits>, DataLoadError> {
    let rows: Vec<ContributionLimits> = parse_csv(reader)?;
    Ok(rows.into_iter().map(|l| (l.plan_year, l)).collect())
}

/// Reads `tax_year_config.csv`, keyed by tax year.
pub fn load_tax_year_configs<R: Read>(
    reader: R
) -> Result<BTreeMap<i32, TaxYearConfig>, DataLoadError> {
    let rows: Vec<TaxYearConfig> = parse_csv(reader)?;
    Ok(rows.into_iter().map(|c| (c.tax_year, c)).collect())
}

/// A single row of `performance.csv`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceRow {
    pub year: i32,
    pub account_type: String,
    pub account_name: String,
    pub owner: String,
    pub contributions: Decimal,
    /// Empty cells read as zero.
    pub employer_match: Option<Decimal>,
}

impl From<&PerformanceRecord> for PerformanceRow {
    fn from(record: &PerformanceRecord) -> Self {
        Self {
            year: record.year,
            account_type: record.account_type.as_str().to_string(),
            account_name: record.account_name.clone(),
            owner: record.owner.clone(),
            contributions: record.contributions,
            employer_match: Some(record.employer_match),
        }
    }
}

pub struct PerformanceLoader;

impl PerformanceLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PerformanceRecord>, DataLoadError> {
        let rows: Vec<PerformanceRow> = parse_csv(reader)?;
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| Self::convert_row(row, index + 1))
            .collect()
    }

    /// Writes records with a header row, in the order given.
    pub fn write<W: Write>(
        writer: W,
        records: &[PerformanceRecord],
    ) -> Result<(), DataLoadError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in records {
            csv_writer.serialize(PerformanceRow::from(record))?;
        }
        csv_writer.flush().map_err(|e| DataLoadError::CsvParse(e.to_string()))?;
        Ok(())
    }

    fn convert_row(
        row: PerformanceRow,
        row_number: usize,
    ) -> Result<PerformanceRecord, DataLoadError> {
        let account_type = AccountType::parse(&row.account_type).ok_or_else(|| {
            DataLoadError::UnknownAccountType {
                value: row.account_type.clone(),
                row: row_number,
            }
        })?;

        Ok(PerformanceRecord {
            year: row.year,
            account_type,
            account_name: row.account_name,
            owner: row.owner,
            contributions: row.contributions,
            employer_match: row.employer_match.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TABLES_CSV: &str = "tax_year,filing_status,variant,threshold,base_withholding,rate
2025,S,standard,6400,0,0.10
2025,S,standard,0,0,0
2025,S,standard,18325,1192.50,0.12
2025,MFJ,multiple_jobs,0,0,0
2025,MFJ,multiple_jobs,15000,0,0.10
";

    #[test]
    fn test_parse_table_row() {
        let csv = "tax_year,filing_status,variant,threshold,base_withholding,rate\n2025,S,standard,6400,0,0.10";

        let records = WithholdingTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![WithholdingTableRecord {
                tax_year: 2025,
                filing_status: "S".to_string(),
                variant: "standard".to_string(),
                threshold: dec!(6400),
                base_withholding: dec!(0),
                rate: dec!(0.10),
            }]
        );
    }

    #[test]
    fn test_build_sorts_rows_by_threshold() {
        let tables = WithholdingTableLoader::load(TABLES_CSV.as_bytes()).expect("Failed to load");

        let year = &tables[&2025];
        let single = year
            .get(FilingStatus::Single, TableVariant::Standard)
            .expect("single table");
        let thresholds: Vec<_> = single.brackets().iter().map(|b| b.threshold).collect();
        assert_eq!(thresholds, vec![dec!(0), dec!(6400), dec!(18325)]);
        assert!(
            year.get(FilingStatus::MarriedJointly, TableVariant::MultipleJobs)
                .is_some()
        );
        assert!(
            year.get(FilingStatus::MarriedJointly, TableVariant::Standard)
                .is_none()
        );
    }

    #[test]
    fn test_unknown_filing_status_is_an_error() {
        let csv = "tax_year,filing_status,variant,threshold,base_withholding,rate\n2025,QSS,standard,0,0,0";

        let result = WithholdingTableLoader::load(csv.as_bytes());

        match result {
            Err(DataLoadError::UnknownFilingStatus { value, row }) => {
                assert_eq!(value, "QSS");
                assert_eq!(row, 1);
            }
            other => panic!("expected UnknownFilingStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_variant_is_an_error() {
        let csv = "tax_year,filing_status,variant,threshold,base_withholding,rate\n2025,S,weekly,0,0,0";

        let result = WithholdingTableLoader::load(csv.as_bytes());

        assert!(matches!(result, Err(DataLoadError::UnknownTableVariant { .. })));
    }

    #[test]
    fn test_table_without_zero_row_is_invalid() {
        let csv = "tax_year,filing_status,variant,threshold,base_withholding,rate\n2025,S,standard,6400,0,0.10";

        let result = WithholdingTableLoader::load(csv.as_bytes());

        assert!(matches!(
            result,
            Err(DataLoadError::InvalidTable {
                source: TableError::FirstThresholdNotZero(_),
                ..
            })
        ));
    }

    #[test]
    fn test_bad_decimal_is_a_parse_error() {
        let csv = "tax_year,filing_status,variant,threshold,base_withholding,rate\n2025,S,standard,abc,0,0";

        let err = WithholdingTableLoader::parse(csv.as_bytes()).expect_err("should fail");

        let DataLoadError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("invalid"), "Expected 'invalid' in error, got: {}", msg);
    }

    #[test]
    fn test_load_limits_and_config() {
        let limits = load_contribution_limits(
            "plan_year,k401_employee,k401_catch_up,hsa_self,hsa_family,hsa_catch_up,ira_self,ira_catch_up\n2025,23500,7500,4300,8550,1000,7000,1000\n"
                .as_bytes(),
        )
        .expect("limits");
        let configs = load_tax_year_configs(
            "tax_year,social_security_rate,medicare_rate,child_tax_credit,other_dependent_credit,allowance_amount,supplemental_rate\n2025,0.062,0.0145,2000,500,4300,0.22\n"
                .as_bytes(),
        )
        .expect("config");

        assert_eq!(limits[&2025].hsa_family, dec!(8550));
        assert_eq!(configs[&2025].medicare_rate, dec!(0.0145));
    }

    #[test]
    fn test_performance_account_type_is_case_insensitive() {
        let csv = "year,account_type,account_name,owner,contributions,employer_match
2025,Traditional_401k,Fidelity 401k,Alex,4000,2000
2025,roth_ira,Vanguard Roth,Joint,3500,
";

        let records = PerformanceLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].account_type, AccountType::Traditional401k);
        assert_eq!(records[0].employer_match, dec!(2000));
        assert_eq!(records[1].account_type, AccountType::RothIra);
    }

    #[test]
    fn test_performance_unknown_account_type() {
        let csv = "year,account_type,account_name,owner,contributions,employer_match\n2025,pension,Plan,Alex,1,0\n";

        let result = PerformanceLoader::parse(csv.as_bytes());

        match result {
            Err(DataLoadError::UnknownAccountType { value, row }) => {
                assert_eq!(value, "pension");
                assert_eq!(row, 1);
            }
            other => panic!("expected UnknownAccountType, got {other:?}"),
        }
    }

    #[test]
    fn test_write_then_parse_keeps_records() {
        let records = vec![PerformanceRecord {
            year: 2025,
            account_type: AccountType::Hsa,
            account_name: "HSA Bank".to_string(),
            owner: "Sam".to_string(),
            contributions: dec!(1200.50),
            employer_match: dec!(500),
        }];
        let mut buffer = Vec::new();

        PerformanceLoader::write(&mut buffer, &records).expect("write");
        let parsed = PerformanceLoader::parse(buffer.as_slice()).expect("parse");

        assert_eq!(parsed, records);
    }
}
