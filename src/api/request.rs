//! Request types for the coverage and time-accounting API.
//!
//! Every body type denies unknown fields so a misspelled key fails loudly
//! instead of being silently dropped. Conversions into the core input types
//! live here; boundary checks that need more than shape (cross-field rules)
//! stay in the core operations.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::coverage::{BlockChanges, BlockFilter, CoverAction, FillAction, NewBlock, NewCover};
use crate::error::{CoreError, CoreResult};
use crate::leave::{NewLeaveRequest, ReviewAction};
use crate::models::{
    EmploymentStatus, KycStatus, LeaveStatus, LeaveType, PayType, PayrollStatus, Staff,
};
use crate::payroll::PayrollInput;

/// Request body for creating a staff member.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStaffRequest {
    /// Display name.
    pub name: String,
    /// Job role, e.g. `nurse` or `gp`.
    pub job_role: String,
    /// Contact email, if known.
    #[serde(default)]
    pub email: Option<String>,
    /// Employment status; defaults to active.
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
    /// Identity verification status; defaults to pending.
    #[serde(default)]
    pub kyc_status: Option<KycStatus>,
}

impl CreateStaffRequest {
    /// Builds the staff record for a clinic, generating its id.
    pub fn into_staff(self, clinic_id: &str) -> CoreResult<Staff> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name must not be empty"));
        }
        if self.job_role.trim().is_empty() {
            return Err(CoreError::validation("job_role must not be empty"));
        }
        Ok(Staff {
            id: Uuid::new_v4(),
            clinic_id: clinic_id.to_string(),
            name: self.name,
            email: self.email,
            job_role: self.job_role,
            employment_status: self.employment_status.unwrap_or(EmploymentStatus::Active),
            kyc_status: self.kyc_status.unwrap_or(KycStatus::Pending),
        })
    }
}

/// Request body for creating a schedule block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBlockRequest {
    /// The location within the clinic, if any.
    #[serde(default)]
    pub location_id: Option<String>,
    /// The date the demand falls on.
    pub date: NaiveDate,
    /// Start of the demand window.
    pub start_time: NaiveTime,
    /// End of the demand window.
    pub end_time: NaiveTime,
    /// The job role needed.
    pub role_needed: String,
    /// Target headcount; defaults to 1 when absent.
    #[serde(default)]
    pub qty_needed: Option<u32>,
}

impl From<CreateBlockRequest> for NewBlock {
    fn from(request: CreateBlockRequest) -> Self {
        NewBlock {
            location_id: request.location_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            role_needed: request.role_needed,
            qty_needed: request.qty_needed,
        }
    }
}

/// Request body for partially updating a schedule block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlockRequest {
    /// New location, if changing.
    #[serde(default)]
    pub location_id: Option<String>,
    /// New date, if changing.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New window start, if changing.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// New window end, if changing.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// New role, if changing.
    #[serde(default)]
    pub role_needed: Option<String>,
    /// New target headcount, if changing.
    #[serde(default)]
    pub qty_needed: Option<u32>,
}

impl From<UpdateBlockRequest> for BlockChanges {
    fn from(request: UpdateBlockRequest) -> Self {
        BlockChanges {
            location_id: request.location_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            role_needed: request.role_needed,
            qty_needed: request.qty_needed,
        }
    }
}

/// Query parameters for listing schedule blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListBlocksQuery {
    /// Only blocks at this location.
    #[serde(default)]
    pub location_id: Option<String>,
    /// Only blocks on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only blocks on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl From<ListBlocksQuery> for BlockFilter {
    fn from(query: ListBlocksQuery) -> Self {
        BlockFilter {
            location_id: query.location_id,
            from: query.from,
            to: query.to,
        }
    }
}

/// Request body for adding or removing a staff assignment on a block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignRequest {
    /// The staff member to add or remove.
    pub staff_id: Uuid,
    /// Whether to add or remove.
    pub action: FillAction,
}

/// Locum details for a cover add.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocumPayload {
    /// The locum's display name.
    pub name: String,
    /// Contact details, if known.
    #[serde(default)]
    pub contact: Option<String>,
}

/// Request body for attaching or detaching a locum cover on a block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverRequest {
    /// Whether to add or remove.
    pub action: FillAction,
    /// The locum to attach. Required for add.
    #[serde(default)]
    pub locum: Option<LocumPayload>,
    /// The cover id to detach. Required for remove.
    #[serde(default)]
    pub locum_id: Option<Uuid>,
}

impl CoverRequest {
    /// Resolves the payload into a cover mutation.
    pub fn into_action(self) -> CoreResult<CoverAction> {
        match self.action {
            FillAction::Add => {
                let locum = self
                    .locum
                    .ok_or_else(|| CoreError::validation("locum is required for an add"))?;
                Ok(CoverAction::Add(NewCover {
                    name: locum.name,
                    contact: locum.contact,
                }))
            }
            FillAction::Remove => {
                let locum_id = self
                    .locum_id
                    .ok_or_else(|| CoreError::validation("locum_id is required for a remove"))?;
                Ok(CoverAction::Remove(locum_id))
            }
        }
    }
}

/// Request body for clock-in and clock-out.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockRequest {
    /// The staff member clocking.
    pub staff_id: Uuid,
    /// Event timestamp; defaults to now. The attendance date derives from it.
    #[serde(default)]
    pub at: Option<NaiveDateTime>,
}

/// Query parameters for the attendance summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryQuery {
    /// Only records on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only records on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Only this staff member.
    #[serde(default)]
    pub staff_id: Option<Uuid>,
}

/// Query parameters for the CSV export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportQuery {
    /// Only records on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only records on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Request body for creating a leave request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateLeaveRequest {
    /// The staff member requesting time off.
    pub staff_id: Uuid,
    /// The category of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub from_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub to_date: NaiveDate,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<CreateLeaveRequest> for NewLeaveRequest {
    fn from(request: CreateLeaveRequest) -> Self {
        NewLeaveRequest {
            staff_id: request.staff_id,
            leave_type: request.leave_type,
            from_date: request.from_date,
            to_date: request.to_date,
            reason: request.reason,
        }
    }
}

/// Query parameters for listing leave requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListLeaveQuery {
    /// Only requests in this status.
    #[serde(default)]
    pub status: Option<LeaveStatus>,
    /// Only requests from this staff member.
    #[serde(default)]
    pub staff_id: Option<Uuid>,
}

/// The review verb on a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerb {
    /// Approve the request.
    Approve,
    /// Reject the request.
    Reject,
    /// Withdraw the request.
    Cancel,
}

/// Request body for reviewing a leave request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewLeaveRequest {
    /// The decision to apply.
    pub action: ReviewVerb,
    /// Who reviewed it. Required for approve and reject.
    #[serde(default)]
    pub reviewer: Option<String>,
    /// Why it was rejected. Required for reject.
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl ReviewLeaveRequest {
    /// Resolves the payload into a review decision.
    pub fn into_action(self) -> CoreResult<ReviewAction> {
        match self.action {
            ReviewVerb::Approve => {
                let reviewer = self
                    .reviewer
                    .ok_or_else(|| CoreError::validation("reviewer is required for an approval"))?;
                Ok(ReviewAction::Approve { reviewer })
            }
            ReviewVerb::Reject => {
                let reviewer = self
                    .reviewer
                    .ok_or_else(|| CoreError::validation("reviewer is required for a rejection"))?;
                let reason = self.rejection_reason.ok_or_else(|| {
                    CoreError::validation("rejection_reason is required for a rejection")
                })?;
                Ok(ReviewAction::Reject { reviewer, reason })
            }
            ReviewVerb::Cancel => Ok(ReviewAction::Cancel),
        }
    }
}

/// Request body for creating or overwriting a payroll entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertPayrollRequest {
    /// Unique key per clinic for this line item.
    pub payroll_key: String,
    /// The kind of payable line item.
    pub pay_type: PayType,
    /// The staff member paid. Exactly one of `staff_id` / `location_id`.
    #[serde(default)]
    pub staff_id: Option<Uuid>,
    /// The location paid for. Exactly one of `staff_id` / `location_id`.
    #[serde(default)]
    pub location_id: Option<String>,
    /// Number of payable units.
    pub units: Decimal,
    /// Rate per unit.
    pub rate: Decimal,
    /// Total payable amount.
    pub amount: Decimal,
}

impl From<UpsertPayrollRequest> for PayrollInput {
    fn from(request: UpsertPayrollRequest) -> Self {
        PayrollInput {
            payroll_key: request.payroll_key,
            pay_type: request.pay_type,
            staff_id: request.staff_id,
            location_id: request.location_id,
            units: request.units,
            rate: request.rate,
            amount: request.amount,
        }
    }
}

/// Query parameters for listing payroll entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListPayrollQuery {
    /// Only entries in this status.
    #[serde(default)]
    pub status: Option<PayrollStatus>,
}

/// Request body for advancing one payroll entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetStatusRequest {
    /// The target status.
    pub status: PayrollStatus,
}

/// Request body for advancing many payroll entries at once.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkStatusRequest {
    /// The keys to advance. Missing keys are skipped.
    pub payroll_keys: Vec<String>,
    /// The target status.
    pub status: PayrollStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_is_rejected() {
        let json = r#"{"staff_id":"4b4d6a2e-8c6f-4a7e-9d71-2f6b0a9c1d10","shift":"night"}"#;
        let result: Result<ClockRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_cover_add_requires_locum() {
        let request = CoverRequest {
            action: FillAction::Add,
            locum: None,
            locum_id: None,
        };
        assert!(matches!(
            request.into_action(),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn test_cover_remove_requires_locum_id() {
        let request = CoverRequest {
            action: FillAction::Remove,
            locum: None,
            locum_id: None,
        };
        assert!(matches!(
            request.into_action(),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn test_review_reject_requires_reason() {
        let request = ReviewLeaveRequest {
            action: ReviewVerb::Reject,
            reviewer: Some("practice_manager".to_string()),
            rejection_reason: None,
        };
        assert!(matches!(
            request.into_action(),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn test_create_staff_defaults() {
        let json = r#"{"name":"Asha Verma","job_role":"nurse"}"#;
        let request: CreateStaffRequest = serde_json::from_str(json).unwrap();
        let staff = request.into_staff("clinic_a").unwrap();
        assert_eq!(staff.employment_status, EmploymentStatus::Active);
        assert_eq!(staff.kyc_status, KycStatus::Pending);
    }

    #[test]
    fn test_upsert_payroll_decimals_parse_from_strings() {
        let json = r#"{
            "payroll_key": "2024-03-asha",
            "pay_type": "salary",
            "staff_id": "4b4d6a2e-8c6f-4a7e-9d71-2f6b0a9c1d10",
            "units": "20",
            "rate": "35.00",
            "amount": "700.00"
        }"#;
        let request: UpsertPayrollRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount.to_string(), "700.00");
    }
}
