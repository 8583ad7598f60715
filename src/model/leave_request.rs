use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Approval state of a leave request. Wire form is snake_case; the
/// French labels and calendar colours ride along as display metadata.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Postponed,
}

impl LeaveStatus {
    /// Label shown on the calendar (French locale).
    pub fn label_fr(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "En attente",
            LeaveStatus::Approved => "Approuvé",
            LeaveStatus::Rejected => "Refusé",
            LeaveStatus::Postponed => "Reporté",
        }
    }

    /// Event background colour for this status.
    pub fn color(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "#ffc107",
            LeaveStatus::Approved => "#28a745",
            LeaveStatus::Rejected => "#dc3545",
            LeaveStatus::Postponed => "#b04c33",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1,
        "manager_id": 1,
        "start": "2025-02-25",
        "end": "2025-02-28",
        "status": "pending"
    })
)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub manager_id: u64,

    #[schema(example = "2025-02-25", format = "date", value_type = String)]
    pub start: NaiveDate,

    #[schema(example = "2025-02-28", format = "date", value_type = String)]
    pub end: NaiveDate,

    pub status: LeaveStatus,
}

/// Payload for creating a request. The store assigns the id and the
/// authenticated session supplies the manager id.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewLeaveRequest {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2025-05-01", format = "date", value_type = String)]
    pub start: NaiveDate,

    #[schema(example = "2025-05-03", format = "date", value_type = String)]
    pub end: NaiveDate,

    #[serde(default)]
    pub status: LeaveStatus,
}

/// Patch for an existing request: fields present overwrite, fields
/// absent are retained.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LeaveRequestPatch {
    pub employee_id: Option<u64>,

    #[schema(example = "2025-05-01", format = "date", value_type = Option<String>)]
    pub start: Option<NaiveDate>,

    #[schema(example = "2025-05-03", format = "date", value_type = Option<String>)]
    pub end: Option<NaiveDate>,

    pub status: Option<LeaveStatus>,
}

/// A leave request joined with display data, ready for the calendar.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarEvent {
    pub id: u64,

    pub employee_id: u64,

    /// Employee display name, used as the event title.
    #[schema(example = "Omar Kamali")]
    pub name: String,

    #[schema(example = "2025-02-25", format = "date", value_type = String)]
    pub start: NaiveDate,

    #[schema(example = "2025-02-28", format = "date", value_type = String)]
    pub end: NaiveDate,

    pub status: LeaveStatus,

    /// Localized status label.
    #[schema(example = "En attente")]
    pub label: String,

    #[schema(example = "#ffc107")]
    pub color: String,
}
