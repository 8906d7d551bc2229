use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dispensing state of an ATM's cash service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashStatus {
    Working,
    NotWorking,
    OutOfCash,
}

/// Availability of an auxiliary ATM service (deposit slot, passbook printer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Available,
    NotAvailable,
}

#[derive(Debug, Error)]
#[error("unrecognized status '{0}'")]
pub struct ParseStatusError(String);

impl FromStr for CashStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "WORKING" => Ok(CashStatus::Working),
            "NOT_WORKING" => Ok(CashStatus::NotWorking),
            "OUT_OF_CASH" => Ok(CashStatus::OutOfCash),
            _ => Err(ParseStatusError(value.to_string())),
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "AVAILABLE" => Ok(ServiceStatus::Available),
            "NOT_AVAILABLE" => Ok(ServiceStatus::NotAvailable),
            _ => Err(ParseStatusError(value.to_string())),
        }
    }
}

// Accepts both the wire tokens and their kebab/lowercase CLI spellings.
fn normalize(value: &str) -> String {
    value.trim().replace('-', "_").to_ascii_uppercase()
}

impl fmt::Display for CashStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            CashStatus::Working => "WORKING",
            CashStatus::NotWorking => "NOT_WORKING",
            CashStatus::OutOfCash => "OUT_OF_CASH",
        };
        f.write_str(token)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ServiceStatus::Available => "AVAILABLE",
            ServiceStatus::NotAvailable => "NOT_AVAILABLE",
        };
        f.write_str(token)
    }
}

/// A point-in-time observation of an ATM's service availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub cash_status: CashStatus,
    pub deposit_status: ServiceStatus,
    pub passbook_status: ServiceStatus,
}

impl Default for Report {
    /// Initial draft values of the report form.
    fn default() -> Self {
        Self {
            cash_status: CashStatus::Working,
            deposit_status: ServiceStatus::NotAvailable,
            passbook_status: ServiceStatus::NotAvailable,
        }
    }
}

/// An ATM as listed by the directory service. The `address` doubles as the
/// listing identity key; the contract carries no dedicated id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Atm {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub latest_report: Option<Report>,
}
