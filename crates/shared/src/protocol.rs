use serde::{Deserialize, Serialize};

use crate::domain::{Atm, CashStatus, Report, ServiceStatus};

/// Body of `POST /api/report`: the draft report denormalized with the
/// selected ATM's name and address. The directory service resolves the
/// pair back to an ATM identity on its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub name: String,
    pub address: String,
    pub cash_status: CashStatus,
    pub deposit_status: ServiceStatus,
    pub passbook_status: ServiceStatus,
}

impl ReportSubmission {
    pub fn for_atm(atm: &Atm, draft: &Report) -> Self {
        Self {
            name: atm.name.clone(),
            address: atm.address.clone(),
            cash_status: draft.cash_status,
            deposit_status: draft.deposit_status,
            passbook_status: draft.passbook_status,
        }
    }
}

/// Acknowledgement body of `POST /api/report`. Any 2xx is treated as
/// success; clients do not inspect this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the `GET /api/test` reachability probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm() -> Atm {
        Atm {
            name: "A".to_string(),
            address: "1 Main St".to_string(),
            latest_report: None,
        }
    }

    #[test]
    fn submission_copies_identity_from_the_atm() {
        let draft = Report {
            cash_status: CashStatus::OutOfCash,
            deposit_status: ServiceStatus::NotAvailable,
            passbook_status: ServiceStatus::NotAvailable,
        };
        let submission = ReportSubmission::for_atm(&atm(), &draft);
        assert_eq!(submission.name, "A");
        assert_eq!(submission.address, "1 Main St");
        assert_eq!(submission.cash_status, CashStatus::OutOfCash);
    }

    #[test]
    fn submission_serializes_to_exactly_the_merged_object() {
        let submission = ReportSubmission::for_atm(
            &atm(),
            &Report {
                cash_status: CashStatus::OutOfCash,
                deposit_status: ServiceStatus::NotAvailable,
                passbook_status: ServiceStatus::NotAvailable,
            },
        );
        assert_eq!(
            serde_json::to_value(&submission).expect("serialize"),
            serde_json::json!({
                "name": "A",
                "address": "1 Main St",
                "cashStatus": "OUT_OF_CASH",
                "depositStatus": "NOT_AVAILABLE",
                "passbookStatus": "NOT_AVAILABLE",
            })
        );
    }
}
