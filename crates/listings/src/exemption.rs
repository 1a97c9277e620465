//! Regulatory exemption evaluation.
//!
//! A check only scans the exemption list while the listing awaits its exemption
//! check. A supplier organisation found on the regulator's exempted list routes
//! the listing into hazard analysis; any other supplier completes inspection.
//! A listing already in hazard analysis completes on the next check without
//! consulting the list.

use foodtrace_core::{DomainError, DomainResult};
use foodtrace_parties::Supplier;
use foodtrace_regulation::Regulator;

use crate::listing::ListingStatus;

/// Result of one regulatory check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionOutcome {
    Completed,
    HazardAnalysisRequired,
}

impl InspectionOutcome {
    pub fn resulting_status(self) -> ListingStatus {
        match self {
            InspectionOutcome::Completed => ListingStatus::CheckCompleted,
            InspectionOutcome::HazardAnalysisRequired => ListingStatus::HazardAnalysisCheckReq,
        }
    }
}

/// Decide the inspection outcome for a listing in `status`.
pub fn evaluate(
    status: ListingStatus,
    supplier: &Supplier,
    regulator: &Regulator,
) -> DomainResult<InspectionOutcome> {
    if !status.awaits_inspection() {
        return Err(DomainError::invalid_state(
            "Invalid state, listing cannot be checked",
        ));
    }

    let mut passes = true;
    if status == ListingStatus::ExemptCheckReq && regulator.lists_org(&supplier.org_id) {
        passes = false;
    }

    Ok(if passes {
        InspectionOutcome::Completed
    } else {
        InspectionOutcome::HazardAnalysisRequired
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodtrace_core::{ParticipantId, RegulatorId};
    use foodtrace_parties::UserBase;
    use proptest::prelude::*;

    fn supplier(org_id: &str) -> Supplier {
        Supplier {
            base: UserBase {
                id: ParticipantId::new("S1"),
            },
            country_id: "NZ".to_string(),
            org_id: org_id.to_string(),
        }
    }

    fn regulator(exempted: &[&str]) -> Regulator {
        let mut regulator = Regulator::new(RegulatorId::new("R1"), "NZ");
        regulator.set_exempted_org_ids(exempted.iter().map(|o| o.to_string()).collect());
        regulator
    }

    #[test]
    fn listed_org_is_routed_to_hazard_analysis() {
        let outcome = evaluate(
            ListingStatus::ExemptCheckReq,
            &supplier("ORG1"),
            &regulator(&["ORG0", "ORG1"]),
        )
        .unwrap();
        assert_eq!(outcome, InspectionOutcome::HazardAnalysisRequired);
        assert_eq!(outcome.resulting_status(), ListingStatus::HazardAnalysisCheckReq);
    }

    #[test]
    fn unlisted_org_completes_inspection() {
        let outcome =
            evaluate(ListingStatus::ExemptCheckReq, &supplier("ORG2"), &regulator(&["ORG1"]))
                .unwrap();
        assert_eq!(outcome, InspectionOutcome::Completed);
    }

    #[test]
    fn listings_not_awaiting_inspection_cannot_be_checked() {
        for status in [ListingStatus::InitialRequest, ListingStatus::CheckCompleted] {
            let err = evaluate(status, &supplier("ORG1"), &regulator(&[])).unwrap_err();
            assert_eq!(err.to_string(), "Invalid state, listing cannot be checked");
        }
    }

    proptest! {
        /// Property: hazard analysis always completes, whatever the exemption list holds.
        #[test]
        fn hazard_analysis_completes_regardless_of_membership(
            org in "[A-Z0-9]{1,8}",
            exempted in proptest::collection::vec("[A-Z0-9]{1,8}", 0..6),
            include_org in any::<bool>(),
        ) {
            let mut list: Vec<&str> = exempted.iter().map(String::as_str).collect();
            if include_org {
                list.push(org.as_str());
            }
            let outcome = evaluate(
                ListingStatus::HazardAnalysisCheckReq,
                &supplier(&org),
                &regulator(&list),
            ).unwrap();
            prop_assert_eq!(outcome, InspectionOutcome::Completed);
        }

        /// Property: an exemption check routes to hazard analysis exactly when the org is listed.
        #[test]
        fn exemption_check_follows_list_membership(
            org in "[A-Z0-9]{1,8}",
            exempted in proptest::collection::vec("[A-Z0-9]{1,8}", 0..6),
        ) {
            let list: Vec<&str> = exempted.iter().map(String::as_str).collect();
            let listed = exempted.contains(&org);
            let outcome = evaluate(
                ListingStatus::ExemptCheckReq,
                &supplier(&org),
                &regulator(&list),
            ).unwrap();
            prop_assert_eq!(outcome == InspectionOutcome::HazardAnalysisRequired, listed);
        }
    }
}
