//! Runs each subcommand against an in-memory household.

use chrono::NaiveDate;
use pay_cli::{Command, run};
use pay_core::{
    AccountType, BonusOptions, BudgetImpacting, FilingStatus, HsaCoverage, MedicalDeductions,
    PayPeriod, PayrollRepository, PerformanceRecord, Person, RetirementOptions, W4Profile,
};
use pay_data::MemoryRepository;
use rust_decimal_macros::dec;

fn alex() -> Person {
    Person {
        name: "Alex".to_string(),
        salary: dec!(80000),
        birthday: NaiveDate::from_ymd_opt(1988, 5, 5).unwrap(),
        pay_period: PayPeriod::BiWeekly,
        filing_status: FilingStatus::Single,
        w4: W4Profile::default(),
        retirement: RetirementOptions {
            traditional_401k_percent: dec!(5),
            ..RetirementOptions::default()
        },
        medical: MedicalDeductions::default(),
        budget: BudgetImpacting::default(),
        espp_percent: dec!(0),
        post_tax_deductions: vec![],
        bonus: BonusOptions::default(),
        hsa_coverage: HsaCoverage::None,
        income_periods: vec![],
        unreadable_income_periods: 0,
    }
}

async fn household() -> MemoryRepository {
    let repo = MemoryRepository::builtin().expect("built-in data");
    repo.save_person(&alex()).await.unwrap();
    repo.save_person(&Person {
        name: "Sam".to_string(),
        salary: dec!(0),
        ..alex()
    })
    .await
    .unwrap();
    repo.upsert_performance_record(&PerformanceRecord {
        year: 2025,
        account_type: AccountType::RothIra,
        account_name: "Vanguard Roth".to_string(),
        owner: "Joint".to_string(),
        contributions: dec!(4000),
        employer_match: dec!(0),
    })
    .await
    .unwrap();
    repo
}

fn mid_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

#[tokio::test]
async fn test_paycheck_prints_net_pay() {
    let repo = household().await;

    let output = run(
        &repo,
        &Command::Paycheck {
            name: "Alex".to_string(),
        },
        mid_year(),
    )
    .await
    .expect("paycheck should render");

    assert!(output.starts_with("Alex (2025 tax year, paid bi-weekly, Single, age 37)"));
    assert!(output.contains("$2,306.15"), "{output}");
    assert!(output.contains("$59,959.90"), "{output}");
}

#[tokio::test]
async fn test_paycheck_without_salary_explains() {
    let repo = household().await;

    let output = run(
        &repo,
        &Command::Paycheck {
            name: "Sam".to_string(),
        },
        mid_year(),
    )
    .await
    .expect("report should still render");

    assert!(output.contains("No paycheck could be computed"), "{output}");
}

#[tokio::test]
async fn test_room_lists_every_account() {
    let repo = household().await;

    let output = run(
        &repo,
        &Command::Room {
            name: "Alex".to_string(),
        },
        mid_year(),
    )
    .await
    .expect("room should render");

    for label in ["401(k)", "IRA", "HSA", "ESPP", "Brokerage"] {
        assert!(output.contains(label), "missing {label}:\n{output}");
    }
    assert!(output.contains("$2,000.00"), "joint IRA half:\n{output}");
}

#[tokio::test]
async fn test_household_totals_and_joint_split() {
    let repo = household().await;

    let output = run(&repo, &Command::Household, mid_year())
        .await
        .expect("household should render");

    assert!(output.contains("Household"), "{output}");
    assert!(output.contains("roth_ira"), "{output}");
    assert!(output.contains("$4,000.00"), "{output}");
}

#[tokio::test]
async fn test_tables_filtered_by_status() {
    let repo = household().await;

    let output = run(
        &repo,
        &Command::Tables {
            status: Some("MFJ".to_string()),
        },
        mid_year(),
    )
    .await
    .expect("tables should render");

    assert!(output.contains("Married Filing Jointly (standard)"), "{output}");
    assert!(output.contains("Married Filing Jointly (multiple_jobs)"), "{output}");
    assert!(!output.contains("Head of Household"), "{output}");
}

#[tokio::test]
async fn test_unknown_member_and_year_are_errors() {
    let repo = household().await;

    let unknown = run(
        &repo,
        &Command::Room {
            name: "Pat".to_string(),
        },
        mid_year(),
    )
    .await;
    let wrong_year = run(
        &repo,
        &Command::Household,
        NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
    )
    .await;

    assert!(unknown.unwrap_err().to_string().contains("Pat"));
    assert!(wrong_year.unwrap_err().to_string().contains("2019"));
}
