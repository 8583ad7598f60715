use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveRequestPatch, LeaveStatus, NewLeaveRequest};
use crate::model::manager::Manager;

/// The in-progress, not-yet-saved edit buffer behind the create/edit
/// modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PendingEvent {
    /// Present when editing an existing request, absent when creating.
    pub id: Option<u64>,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2025-05-01", format = "date", value_type = String)]
    pub start: NaiveDate,

    #[schema(example = "2025-05-03", format = "date", value_type = String)]
    pub end: NaiveDate,

    pub status: LeaveStatus,
}

impl PendingEvent {
    pub fn from_request(request: &LeaveRequest) -> Self {
        Self {
            id: Some(request.id),
            employee_id: request.employee_id,
            start: request.start,
            end: request.end,
            status: request.status,
        }
    }

    /// The store dispatch this buffer resolves to on save: an update
    /// when it carries an id, a create otherwise. The active manager's
    /// id is supplied by the caller at dispatch time.
    pub fn into_action(self) -> SaveAction {
        match self.id {
            Some(id) => SaveAction::Update {
                id,
                patch: LeaveRequestPatch {
                    employee_id: Some(self.employee_id),
                    start: Some(self.start),
                    end: Some(self.end),
                    status: Some(self.status),
                },
            },
            None => SaveAction::Create(NewLeaveRequest {
                employee_id: self.employee_id,
                start: self.start,
                end: self.end,
                status: self.status,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SaveAction {
    Create(NewLeaveRequest),
    Update { id: u64, patch: LeaveRequestPatch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EditorError {
    #[display(fmt = "no edit in progress")]
    NotEditing,
    #[display(fmt = "manager has no employees to assign")]
    EmptyRoster,
}

/// Pending-edit state machine behind the calendar: Idle until a slot or
/// an event is selected, Editing until save or cancel. The buffer is
/// reset on every transition, so a cancelled edit can never leak into
/// the next modal.
#[derive(Debug, Default)]
pub struct EventEditor {
    pending: Option<PendingEvent>,
}

impl EventEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingEvent> {
        self.pending.as_ref()
    }

    /// Slot click. If one of the manager's requests starts exactly on
    /// the clicked date for the default assignee (the roster's first
    /// employee), that request is loaded for editing; otherwise a fresh
    /// buffer opens over the clicked range with status Pending.
    pub fn select_slot(
        &mut self,
        manager: &Manager,
        requests: &[LeaveRequest],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<&PendingEvent, EditorError> {
        let default_employee = manager.employees.first().ok_or(EditorError::EmptyRoster)?;

        let existing = requests.iter().find(|req| {
            req.manager_id == manager.id
                && req.start == start
                && req.employee_id == default_employee.id
        });

        let pending = match existing {
            Some(request) => PendingEvent::from_request(request),
            None => PendingEvent {
                id: None,
                employee_id: default_employee.id,
                start,
                end,
                status: LeaveStatus::Pending,
            },
        };
        Ok(self.pending.insert(pending))
    }

    /// Event click: load the clicked record, always edit-existing.
    pub fn select_event(&mut self, request: &LeaveRequest) -> &PendingEvent {
        self.pending.insert(PendingEvent::from_request(request))
    }

    /// Re-enter Editing with a buffer the client handed back (the modal
    /// state lives on the client between requests).
    pub fn resume(&mut self, pending: PendingEvent) -> &PendingEvent {
        self.pending.insert(pending)
    }

    pub fn set_employee(&mut self, employee_id: u64) -> Result<(), EditorError> {
        self.editing_mut()?.employee_id = employee_id;
        Ok(())
    }

    pub fn set_start(&mut self, start: NaiveDate) -> Result<(), EditorError> {
        self.editing_mut()?.start = start;
        Ok(())
    }

    pub fn set_end(&mut self, end: NaiveDate) -> Result<(), EditorError> {
        self.editing_mut()?.end = end;
        Ok(())
    }

    pub fn set_status(&mut self, status: LeaveStatus) -> Result<(), EditorError> {
        self.editing_mut()?.status = status;
        Ok(())
    }

    /// Save: resolves the buffer to a store dispatch and returns to
    /// Idle.
    pub fn save(&mut self) -> Result<SaveAction, EditorError> {
        let pending = self.pending.take().ok_or(EditorError::NotEditing)?;
        Ok(pending.into_action())
    }

    /// Cancel: back to Idle, buffer discarded.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn editing_mut(&mut self) -> Result<&mut PendingEvent, EditorError> {
        self.pending.as_mut().ok_or(EditorError::NotEditing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::Employee;

    fn manager() -> Manager {
        Manager {
            id: 1,
            username: "Aya".to_string(),
            password_hash: String::new(),
            employees: vec![
                Employee { id: 1, name: "Omar Kamali".to_string() },
                Employee { id: 2, name: "Youssef Ennaciri".to_string() },
                Employee { id: 4, name: "Ziyad Gout".to_string() },
            ],
        }
    }

    fn request(id: u64, employee_id: u64, start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id,
            manager_id: 1,
            start: start.parse().expect("date"),
            end: end.parse().expect("date"),
            status: LeaveStatus::Pending,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("date")
    }

    #[test]
    fn starts_idle() {
        let editor = EventEditor::new();
        assert!(!editor.is_editing());
        assert!(editor.pending().is_none());
    }

    #[test]
    fn empty_slot_opens_fresh_buffer() {
        let mut editor = EventEditor::new();
        let pending = editor
            .select_slot(&manager(), &[], date("2025-05-01"), date("2025-05-03"))
            .expect("slot click")
            .clone();

        assert_eq!(pending.id, None);
        assert_eq!(pending.employee_id, 1); // first of the roster
        assert_eq!(pending.start, date("2025-05-01"));
        assert_eq!(pending.end, date("2025-05-03"));
        assert_eq!(pending.status, LeaveStatus::Pending);
        assert!(editor.is_editing());
    }

    #[test]
    fn occupied_slot_loads_existing_request() {
        let requests = vec![request(1, 1, "2025-02-25", "2025-02-28")];
        let mut editor = EventEditor::new();
        let pending = editor
            .select_slot(&manager(), &requests, date("2025-02-25"), date("2025-02-25"))
            .expect("slot click")
            .clone();

        assert_eq!(pending.id, Some(1));
        assert_eq!(pending.end, date("2025-02-28"));
    }

    #[test]
    fn slot_match_ignores_other_employees() {
        // same start date, but the request belongs to employee 2, not
        // the default assignee
        let requests = vec![request(1, 2, "2025-02-25", "2025-02-28")];
        let mut editor = EventEditor::new();
        let pending = editor
            .select_slot(&manager(), &requests, date("2025-02-25"), date("2025-02-26"))
            .expect("slot click")
            .clone();

        assert_eq!(pending.id, None);
        assert_eq!(pending.employee_id, 1);
    }

    #[test]
    fn empty_roster_is_an_error() {
        let mut rosterless = manager();
        rosterless.employees.clear();
        let mut editor = EventEditor::new();
        let err = editor
            .select_slot(&rosterless, &[], date("2025-05-01"), date("2025-05-01"))
            .unwrap_err();
        assert_eq!(err, EditorError::EmptyRoster);
        assert!(!editor.is_editing());
    }

    #[test]
    fn event_click_always_edits_existing() {
        let req = request(4, 4, "2025-04-05", "2025-04-20");
        let mut editor = EventEditor::new();
        let pending = editor.select_event(&req).clone();
        assert_eq!(pending.id, Some(4));
        assert_eq!(pending.employee_id, 4);
    }

    #[test]
    fn setters_replace_fields_immediately() {
        let mut editor = EventEditor::new();
        editor
            .select_slot(&manager(), &[], date("2025-05-01"), date("2025-05-03"))
            .expect("slot click");

        editor.set_employee(2).expect("set employee");
        editor.set_start(date("2025-05-02")).expect("set start");
        // no end >= start validation at this layer
        editor.set_end(date("2025-04-30")).expect("set end");
        editor.set_status(LeaveStatus::Postponed).expect("set status");

        let pending = editor.pending().expect("editing");
        assert_eq!(pending.employee_id, 2);
        assert_eq!(pending.start, date("2025-05-02"));
        assert_eq!(pending.end, date("2025-04-30"));
        assert_eq!(pending.status, LeaveStatus::Postponed);
    }

    #[test]
    fn setters_require_an_open_edit() {
        let mut editor = EventEditor::new();
        assert_eq!(editor.set_employee(1), Err(EditorError::NotEditing));
        assert_eq!(
            editor.set_status(LeaveStatus::Approved),
            Err(EditorError::NotEditing)
        );
    }

    #[test]
    fn save_without_id_dispatches_create() {
        let mut editor = EventEditor::new();
        editor
            .select_slot(&manager(), &[], date("2025-05-01"), date("2025-05-03"))
            .expect("slot click");

        match editor.save().expect("save") {
            SaveAction::Create(new) => {
                assert_eq!(new.employee_id, 1);
                assert_eq!(new.status, LeaveStatus::Pending);
            }
            SaveAction::Update { .. } => panic!("expected a create dispatch"),
        }
        assert!(!editor.is_editing());
    }

    #[test]
    fn save_with_id_dispatches_full_patch() {
        let req = request(2, 2, "2025-03-02", "2025-03-10");
        let mut editor = EventEditor::new();
        editor.select_event(&req);
        editor.set_status(LeaveStatus::Approved).expect("set status");

        match editor.save().expect("save") {
            SaveAction::Update { id, patch } => {
                assert_eq!(id, 2);
                assert_eq!(patch.employee_id, Some(2));
                assert_eq!(patch.status, Some(LeaveStatus::Approved));
                assert!(patch.start.is_some() && patch.end.is_some());
            }
            SaveAction::Create(_) => panic!("expected an update dispatch"),
        }
    }

    #[test]
    fn resume_reopens_a_client_buffer() {
        let mut editor = EventEditor::new();
        let buffer = PendingEvent {
            id: Some(3),
            employee_id: 3,
            start: date("2025-03-12"),
            end: date("2025-03-20"),
            status: LeaveStatus::Rejected,
        };
        editor.resume(buffer.clone());
        assert!(editor.is_editing());
        assert_eq!(editor.pending(), Some(&buffer));
    }

    #[test]
    fn save_in_idle_is_an_error() {
        let mut editor = EventEditor::new();
        assert!(matches!(editor.save(), Err(EditorError::NotEditing)));
    }

    #[test]
    fn cancel_discards_the_buffer() {
        let mut editor = EventEditor::new();
        editor
            .select_slot(&manager(), &[], date("2025-05-01"), date("2025-05-03"))
            .expect("slot click");
        editor.set_employee(4).expect("set employee");

        editor.cancel();
        assert!(!editor.is_editing());

        // re-entering starts from defaults, not the cancelled edit
        let pending = editor
            .select_slot(&manager(), &[], date("2025-06-01"), date("2025-06-02"))
            .expect("slot click");
        assert_eq!(pending.employee_id, 1);
        assert_eq!(pending.id, None);
    }
}
