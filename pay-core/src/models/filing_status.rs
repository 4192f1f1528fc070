use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedJointly,
    MarriedSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn all() -> &'static [FilingStatus] {
        &[
            FilingStatus::Single,
            FilingStatus::MarriedJointly,
            FilingStatus::MarriedSeparately,
            FilingStatus::HeadOfHousehold,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedJointly => "MFJ",
            Self::MarriedSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJointly => "Married Filing Jointly",
            Self::MarriedSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// Accepts the short codes as well as the long camel-case names used by
    /// older profile exports.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "S" | "single" => Some(Self::Single),
            "MFJ" | "marriedJointly" => Some(Self::MarriedJointly),
            "MFS" | "marriedSeparately" => Some(Self::MarriedSeparately),
            "HOH" | "headOfHousehold" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    /// Parses `code`, falling back to [`FilingStatus::Single`] when it is not
    /// recognised. The second element is `true` when the fallback was taken.
    pub fn resolve(code: &str) -> (Self, bool) {
        match Self::parse(code) {
            Some(status) => (status, false),
            None => (Self::Single, true),
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
