//! Filing form types.
//!
//! This module defines [`FormType`], the periodic report forms whose facts are
//! resolved into statements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StatementError;

/// SEC periodic report form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report.
    #[default]
    #[serde(rename = "10-K")]
    TenK,
    /// Quarterly report.
    #[serde(rename = "10-Q")]
    TenQ,
}

impl FormType {
    /// Returns the form code as it appears in EDGAR data (e.g. "10-K").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TenK => "10-K",
            Self::TenQ => "10-Q",
        }
    }

    /// Returns true if this is the annual form.
    #[must_use]
    pub const fn is_annual(&self) -> bool {
        matches!(self, Self::TenK)
    }

    /// Fiscal period code reported for filings of this form.
    ///
    /// Quarterly filings are reported as the generic `Q` code since the
    /// quarter number is not known from the filing descriptor alone.
    #[must_use]
    pub const fn fiscal_period(&self) -> &'static str {
        match self {
            Self::TenK => "FY",
            Self::TenQ => "Q",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "10-K" | "10K" => Ok(Self::TenK),
            "10-Q" | "10Q" => Ok(Self::TenQ),
            other => Err(StatementError::InvalidParameter(format!(
                "Unsupported form type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_parsing() {
        assert_eq!("10-K".parse::<FormType>().unwrap(), FormType::TenK);
        assert_eq!("10q".parse::<FormType>().unwrap(), FormType::TenQ);
        assert!("8-K".parse::<FormType>().is_err());
    }

    #[test]
    fn test_form_codes() {
        assert_eq!(FormType::TenK.to_string(), "10-K");
        assert_eq!(FormType::TenQ.as_str(), "10-Q");
        assert_eq!(FormType::TenK.fiscal_period(), "FY");
        assert_eq!(FormType::TenQ.fiscal_period(), "Q");
        assert!(FormType::TenK.is_annual());
    }

    #[test]
    fn test_form_serde() {
        let json = serde_json::to_string(&FormType::TenQ).unwrap();
        assert_eq!(json, "\"10-Q\"");
        let form: FormType = serde_json::from_str("\"10-K\"").unwrap();
        assert_eq!(form, FormType::TenK);
    }
}
