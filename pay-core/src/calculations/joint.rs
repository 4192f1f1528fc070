//! Splitting jointly held accounts between household members.
//!
//! A record is joint when its owner is [`JOINT_OWNER`], when it is a
//! brokerage account whose name mentions "joint", or when it is an IRA and
//! the policy treats every IRA as joint. Joint money is divided evenly
//! between the actual members; a household of one keeps it undivided.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountType, JOINT_OWNER, PerformanceRecord};

/// IRA contributions are recorded per household rather than per person.
pub const IRA_ALWAYS_JOINT: bool = true;

static JOINT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)joint").expect("joint account pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointPolicy {
    pub ira_always_joint: bool,
}

impl Default for JointPolicy {
    fn default() -> Self {
        Self {
            ira_always_joint: IRA_ALWAYS_JOINT,
        }
    }
}

/// One person's share of an account type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub individual: Decimal,
    pub joint_share: Decimal,
    pub employer_match: Decimal,
}

impl Attribution {
    /// Employee money: individual plus the joint share.
    pub fn contributions(&self) -> Decimal {
        self.individual + self.joint_share
    }

    pub fn total(&self) -> Decimal {
        self.contributions() + self.employer_match
    }
}

#[derive(Debug, Clone)]
pub struct JointAccountAllocator {
    policy: JointPolicy,
    members: Vec<String>,
}

impl JointAccountAllocator {
    pub fn new(
        policy: JointPolicy,
        members: Vec<String>,
    ) -> Self {
        Self { policy, members }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Number of people joint money is divided between.
    pub fn divisor(&self) -> Decimal {
        Decimal::from(self.members.len().max(1))
    }

    pub fn is_joint(
        &self,
        record: &PerformanceRecord,
    ) -> bool {
        if record.owner == JOINT_OWNER {
            return true;
        }
        match record.account_type {
            AccountType::TraditionalIra | AccountType::RothIra => self.policy.ira_always_joint,
            AccountType::Brokerage => JOINT_NAME.is_match(&record.account_name),
            _ => false,
        }
    }

    /// `person`'s individual records of `account_type` plus an even share
    /// of the joint ones. Non-members get no joint share.
    pub fn attribute(
        &self,
        records: &[PerformanceRecord],
        person: &str,
        account_type: AccountType,
    ) -> Attribution {
        let is_member = self.members.iter().any(|m| m == person);
        let divisor = self.divisor();
        let mut attribution = Attribution::default();

        for record in records.iter().filter(|r| r.account_type == account_type) {
            if self.is_joint(record) {
                if is_member {
                    attribution.joint_share += record.contributions / divisor;
                    attribution.employer_match += record.employer_match / divisor;
                }
            } else if record.owner == person {
                attribution.individual += record.contributions;
                attribution.employer_match += record.employer_match;
            }
        }

        attribution
    }

    /// Employee and employer money attributed to `person`.
    pub fn attributed_total(
        &self,
        records: &[PerformanceRecord],
        person: &str,
        account_type: AccountType,
    ) -> Decimal {
        self.attribute(records, person, account_type).total()
    }

    /// Everything recorded for `account_type`, each joint record once.
    pub fn household_total(
        &self,
        records: &[PerformanceRecord],
        account_type: AccountType,
    ) -> Decimal {
        records
            .iter()
            .filter(|r| r.account_type == account_type)
            .map(PerformanceRecord::total_contributions)
            .sum()
    }
}
