//! Staff model and related types.
//!
//! The staff directory is the leaf dependency of the core: attendance,
//! leave, and payroll records all reference staff members and must agree
//! with the staff member's clinic.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the employment state of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Invited to the clinic but not yet active.
    Invited,
    /// Actively employed.
    Active,
    /// Temporarily suspended.
    Suspended,
    /// Employment ended. Records referencing the staff member survive.
    Terminated,
}

/// Represents the credential verification state of a staff member.
///
/// Verification itself is handled by an external collaborator; the core
/// only stores the resulting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    /// Verification not yet completed.
    Pending,
    /// Credentials verified.
    Verified,
    /// Verification rejected.
    Rejected,
}

/// Represents a tenant employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique identifier for the staff member.
    pub id: Uuid,
    /// The clinic this staff member belongs to.
    pub clinic_id: String,
    /// Display name.
    pub name: String,
    /// Contact email, if known.
    pub email: Option<String>,
    /// The job role (e.g. "nurse", "receptionist"), matched against a
    /// schedule block's `role_needed`.
    pub job_role: String,
    /// The employment state.
    pub employment_status: EmploymentStatus,
    /// The credential verification state.
    pub kyc_status: KycStatus,
}

impl Staff {
    /// Returns true if the staff member is actively employed.
    pub fn is_active(&self) -> bool {
        self.employment_status == EmploymentStatus::Active
    }
}
