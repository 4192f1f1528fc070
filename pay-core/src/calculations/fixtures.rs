//! 2025 reference data shared by the calculator unit tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    ContributionLimits, FilingStatus, TableVariant, TaxYearConfig, WithholdingBracket,
    WithholdingTable, WithholdingTables,
};

fn table(rows: &[(Decimal, Decimal, Decimal)]) -> WithholdingTable {
    WithholdingTable::new(
        rows.iter()
            .map(|&(threshold, base, rate)| WithholdingBracket::new(threshold, base, rate))
            .collect(),
    )
    .unwrap()
}

pub fn single_standard() -> WithholdingTable {
    table(&[
        (dec!(0), dec!(0), dec!(0)),
        (dec!(6400), dec!(0), dec!(0.10)),
        (dec!(18325), dec!(1192.50), dec!(0.12)),
        (dec!(54875), dec!(5578.50), dec!(0.22)),
        (dec!(109750), dec!(17651), dec!(0.24)),
        (dec!(203700), dec!(40199), dec!(0.32)),
        (dec!(256925), dec!(57231), dec!(0.35)),
        (dec!(632750), dec!(188769.75), dec!(0.37)),
    ])
}

pub fn single_multiple_jobs() -> WithholdingTable {
    table(&[
        (dec!(0), dec!(0), dec!(0)),
        (dec!(7500), dec!(0), dec!(0.10)),
        (dec!(13462.50), dec!(596.25), dec!(0.12)),
        (dec!(31737.50), dec!(2789.25), dec!(0.22)),
        (dec!(59175), dec!(8825.50), dec!(0.24)),
        (dec!(106150), dec!(20099.50), dec!(0.32)),
        (dec!(132762.50), dec!(28615.50), dec!(0.35)),
        (dec!(320675), dec!(94384.875), dec!(0.37)),
    ])
}

pub fn married_jointly_standard() -> WithholdingTable {
    table(&[
        (dec!(0), dec!(0), dec!(0)),
        (dec!(17100), dec!(0), dec!(0.10)),
        (dec!(40950), dec!(2385), dec!(0.12)),
        (dec!(114050), dec!(11157), dec!(0.22)),
        (dec!(223800), dec!(35302), dec!(0.24)),
        (dec!(411700), dec!(80398), dec!(0.32)),
        (dec!(518150), dec!(114462), dec!(0.35)),
        (dec!(768700), dec!(202154.50), dec!(0.37)),
    ])
}

pub fn married_jointly_multiple_jobs() -> WithholdingTable {
    table(&[
        (dec!(0), dec!(0), dec!(0)),
        (dec!(15000), dec!(0), dec!(0.10)),
        (dec!(26925), dec!(1192.50), dec!(0.12)),
        (dec!(63475), dec!(5578.50), dec!(0.22)),
        (dec!(118350), dec!(17651), dec!(0.24)),
        (dec!(212300), dec!(40199), dec!(0.32)),
        (dec!(265525), dec!(57231), dec!(0.35)),
        (dec!(390800), dec!(101077.25), dec!(0.37)),
    ])
}

pub fn head_of_household_standard() -> WithholdingTable {
    table(&[
        (dec!(0), dec!(0), dec!(0)),
        (dec!(13900), dec!(0), dec!(0.10)),
        (dec!(30900), dec!(1700), dec!(0.12)),
        (dec!(78750), dec!(7442), dec!(0.22)),
        (dec!(117250), dec!(15912), dec!(0.24)),
        (dec!(211200), dec!(38460), dec!(0.32)),
        (dec!(264400), dec!(55484), dec!(0.35)),
        (dec!(640250), dec!(187031.50), dec!(0.37)),
    ])
}

/// Single, married-jointly and head-of-household tables. Married-separately
/// is left out on purpose so the single fallback can be exercised.
pub fn tables_2025() -> WithholdingTables {
    let mut tables = WithholdingTables::new(2025);
    tables.insert(FilingStatus::Single, TableVariant::Standard, single_standard());
    tables.insert(
        FilingStatus::Single,
        TableVariant::MultipleJobs,
        single_multiple_jobs(),
    );
    tables.insert(
        FilingStatus::MarriedJointly,
        TableVariant::Standard,
        married_jointly_standard(),
    );
    tables.insert(
        FilingStatus::MarriedJointly,
        TableVariant::MultipleJobs,
        married_jointly_multiple_jobs(),
    );
    tables.insert(
        FilingStatus::HeadOfHousehold,
        TableVariant::Standard,
        head_of_household_standard(),
    );
    tables
}

pub fn config_2025() -> TaxYearConfig {
    TaxYearConfig {
        tax_year: 2025,
        social_security_rate: dec!(0.062),
        medicare_rate: dec!(0.0145),
        child_tax_credit: dec!(2000),
        other_dependent_credit: dec!(500),
        allowance_amount: dec!(4300),
        supplemental_rate: dec!(0.22),
    }
}

pub fn limits_2025() -> ContributionLimits {
    ContributionLimits {
        plan_year: 2025,
        k401_employee: dec!(23500),
        k401_catch_up: dec!(7500),
        hsa_self: dec!(4300),
        hsa_family: dec!(8550),
        hsa_catch_up: dec!(1000),
        ira_self: dec!(7000),
        ira_catch_up: dec!(1000),
    }
}

/// Installs a subscriber for tests that walk warning paths.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}
