use anyhow::Context;

use crate::auth::password::hash_password;
use crate::model::employee::Employee;
use crate::model::leave_request::{
    CalendarEvent, LeaveRequest, LeaveRequestPatch, NewLeaveRequest,
};
use crate::model::manager::Manager;

/// A miss on one of the store's named operations. The original app
/// swallowed these; here every caller has to handle them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StoreError {
    #[display(fmt = "manager {} not found", _0)]
    ManagerNotFound(u64),
    #[display(fmt = "leave request {} not found", _0)]
    RequestNotFound(u64),
    #[display(fmt = "employee {} is not on this manager's team", _0)]
    EmployeeNotFound(u64),
}

/// In-memory source of truth for managers, their employees, and leave
/// requests. Mutation goes through the named operations below, never
/// through raw field writes.
pub struct LeaveStore {
    managers: Vec<Manager>,
    leave_requests: Vec<LeaveRequest>,
    next_request_id: u64,
}

impl LeaveStore {
    fn new(managers: Vec<Manager>, leave_requests: Vec<LeaveRequest>) -> Self {
        let next_request_id = leave_requests.iter().map(|req| req.id).max().unwrap_or(0) + 1;
        Self {
            managers,
            leave_requests,
            next_request_id,
        }
    }

    /// Builds the seed dataset. Passwords are hashed here so the clear
    /// text never lives past startup.
    pub fn seed() -> anyhow::Result<Self> {
        let password_hash = hash_password("123456")
            .map_err(|e| anyhow::anyhow!("failed to hash seed password: {e}"))?;

        let managers = vec![
            Manager {
                id: 1,
                username: "Aya".to_string(),
                password_hash: password_hash.clone(),
                employees: vec![
                    Employee { id: 1, name: "Omar Kamali".to_string() },
                    Employee { id: 2, name: "Youssef Ennaciri".to_string() },
                    Employee { id: 4, name: "Ziyad Gout".to_string() },
                ],
            },
            Manager {
                id: 2,
                username: "Fatima Zahra".to_string(),
                password_hash,
                employees: vec![
                    Employee { id: 3, name: "Fatima Alaoui".to_string() },
                    Employee { id: 5, name: "Farah BABA".to_string() },
                ],
            },
        ];

        let leave_requests = vec![
            seed_request(1, 1, 1, "2025-02-25", "2025-02-28", "pending")?,
            seed_request(2, 2, 1, "2025-03-02", "2025-03-10", "approved")?,
            seed_request(3, 3, 2, "2025-03-12", "2025-03-20", "rejected")?,
            seed_request(4, 4, 1, "2025-04-05", "2025-04-20", "pending")?,
            seed_request(5, 5, 2, "2025-04-10", "2025-04-25", "pending")?,
        ];

        Ok(Self::new(managers, leave_requests))
    }

    pub fn manager_by_id(&self, manager_id: u64) -> Result<&Manager, StoreError> {
        self.managers
            .iter()
            .find(|mgr| mgr.id == manager_id)
            .ok_or(StoreError::ManagerNotFound(manager_id))
    }

    pub fn manager_by_username(&self, username: &str) -> Option<&Manager> {
        self.managers.iter().find(|mgr| mgr.username == username)
    }

    pub fn request_by_id(&self, request_id: u64) -> Result<&LeaveRequest, StoreError> {
        self.leave_requests
            .iter()
            .find(|req| req.id == request_id)
            .ok_or(StoreError::RequestNotFound(request_id))
    }

    /// All requests belonging to one manager, in insertion order.
    pub fn requests_for(&self, manager_id: u64) -> Vec<LeaveRequest> {
        self.leave_requests
            .iter()
            .filter(|req| req.manager_id == manager_id)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.leave_requests.len()
    }

    /// The calendar-displayable events for one manager: their requests,
    /// each joined with the employee's display name and the status
    /// presentation metadata. Pure: repeatable and deterministic for the
    /// same (store, manager), insertion order preserved.
    ///
    /// A request referencing an employee outside the roster is an
    /// explicit error; the write operations keep that from happening.
    pub fn visible_requests(&self, manager: &Manager) -> Result<Vec<CalendarEvent>, StoreError> {
        self.leave_requests
            .iter()
            .filter(|req| req.manager_id == manager.id)
            .map(|req| {
                let employee = manager
                    .employee_by_id(req.employee_id)
                    .ok_or(StoreError::EmployeeNotFound(req.employee_id))?;
                Ok(CalendarEvent {
                    id: req.id,
                    employee_id: req.employee_id,
                    name: employee.name.clone(),
                    start: req.start,
                    end: req.end,
                    status: req.status,
                    label: req.status.label_fr().to_string(),
                    color: req.status.color().to_string(),
                })
            })
            .collect()
    }

    /// Appends a new request for the given manager. The store assigns
    /// the id (monotonic counter); the employee must be on the manager's
    /// team. Returns the stored record.
    pub fn add_leave_request(
        &mut self,
        manager_id: u64,
        new: NewLeaveRequest,
    ) -> Result<LeaveRequest, StoreError> {
        let manager = self.manager_by_id(manager_id)?;
        if manager.employee_by_id(new.employee_id).is_none() {
            return Err(StoreError::EmployeeNotFound(new.employee_id));
        }

        let id = self.next_request_id;
        self.next_request_id += 1;

        let request = LeaveRequest {
            id,
            employee_id: new.employee_id,
            manager_id,
            start: new.start,
            end: new.end,
            status: new.status,
        };
        self.leave_requests.push(request.clone());
        Ok(request)
    }

    /// Patches an existing request: fields present in the patch
    /// overwrite, absent fields are retained. Unknown ids, and requests
    /// owned by another manager, answer `RequestNotFound` and create
    /// nothing. Idempotent for identical payloads.
    pub fn update_leave_request(
        &mut self,
        manager_id: u64,
        request_id: u64,
        patch: LeaveRequestPatch,
    ) -> Result<LeaveRequest, StoreError> {
        if let Some(employee_id) = patch.employee_id {
            let manager = self.manager_by_id(manager_id)?;
            if manager.employee_by_id(employee_id).is_none() {
                return Err(StoreError::EmployeeNotFound(employee_id));
            }
        }

        let request = self
            .leave_requests
            .iter_mut()
            .find(|req| req.id == request_id && req.manager_id == manager_id)
            .ok_or(StoreError::RequestNotFound(request_id))?;

        if let Some(employee_id) = patch.employee_id {
            request.employee_id = employee_id;
        }
        if let Some(start) = patch.start {
            request.start = start;
        }
        if let Some(end) = patch.end {
            request.end = end;
        }
        if let Some(status) = patch.status {
            request.status = status;
        }
        Ok(request.clone())
    }
}

fn seed_request(
    id: u64,
    employee_id: u64,
    manager_id: u64,
    start: &str,
    end: &str,
    status: &str,
) -> anyhow::Result<LeaveRequest> {
    Ok(LeaveRequest {
        id,
        employee_id,
        manager_id,
        start: start
            .parse()
            .with_context(|| format!("bad seed date {start}"))?,
        end: end.parse().with_context(|| format!("bad seed date {end}"))?,
        status: status
            .parse()
            .map_err(|e| anyhow::anyhow!("bad seed status {status}: {e}"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveStatus;

    fn store() -> LeaveStore {
        LeaveStore::seed().expect("seed store")
    }

    fn new_request(employee_id: u64) -> NewLeaveRequest {
        NewLeaveRequest {
            employee_id,
            start: "2025-05-01".parse().expect("date"),
            end: "2025-05-03".parse().expect("date"),
            status: LeaveStatus::Pending,
        }
    }

    #[test]
    fn seed_matches_fixture() {
        let store = store();
        assert_eq!(store.request_count(), 5);
        assert_eq!(store.manager_by_id(1).expect("Aya").username, "Aya");
        assert_eq!(
            store.manager_by_id(2).expect("Fatima").username,
            "Fatima Zahra"
        );
    }

    #[test]
    fn manager_lookup_miss_is_explicit() {
        let store = store();
        assert!(matches!(
            store.manager_by_id(99),
            Err(StoreError::ManagerNotFound(99))
        ));
        assert!(store.manager_by_username("nobody").is_none());
    }

    #[test]
    fn visible_requests_for_aya() {
        let store = store();
        let aya = store.manager_by_id(1).expect("Aya").clone();
        let events = store.visible_requests(&aya).expect("events");

        assert_eq!(
            events.iter().map(|ev| ev.id).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
        assert_eq!(
            events.iter().map(|ev| ev.name.as_str()).collect::<Vec<_>>(),
            vec!["Omar Kamali", "Youssef Ennaciri", "Ziyad Gout"]
        );
        assert_eq!(
            events.iter().map(|ev| ev.status).collect::<Vec<_>>(),
            vec![
                LeaveStatus::Pending,
                LeaveStatus::Approved,
                LeaveStatus::Pending
            ]
        );
    }

    #[test]
    fn visible_requests_for_fatima() {
        let store = store();
        let fatima = store.manager_by_id(2).expect("Fatima").clone();
        let events = store.visible_requests(&fatima).expect("events");

        assert_eq!(
            events.iter().map(|ev| ev.id).collect::<Vec<_>>(),
            vec![3, 5]
        );
        assert_eq!(
            events.iter().map(|ev| ev.status).collect::<Vec<_>>(),
            vec![LeaveStatus::Rejected, LeaveStatus::Pending]
        );
    }

    #[test]
    fn visible_requests_excludes_other_managers() {
        let store = store();
        let aya = store.manager_by_id(1).expect("Aya").clone();
        let events = store.visible_requests(&aya).expect("events");
        assert!(events.iter().all(|ev| ![3, 5].contains(&ev.id)));
    }

    #[test]
    fn visible_requests_is_repeatable() {
        let store = store();
        let aya = store.manager_by_id(1).expect("Aya").clone();
        let first = store.visible_requests(&aya).expect("events");
        let second = store.visible_requests(&aya).expect("events");
        assert_eq!(first.len(), second.len());
        assert!(
            first
                .iter()
                .zip(&second)
                .all(|(a, b)| a.id == b.id && a.name == b.name && a.status == b.status)
        );
    }

    #[test]
    fn add_assigns_next_id_and_grows_collection() {
        let mut store = store();
        let created = store
            .add_leave_request(1, new_request(1))
            .expect("create request");

        assert_eq!(created.id, 6);
        assert_eq!(created.manager_id, 1);
        assert_eq!(store.request_count(), 6);
        assert_eq!(store.request_by_id(6).expect("stored").employee_id, 1);
    }

    #[test]
    fn add_assigns_distinct_ids() {
        let mut store = store();
        let first = store.add_leave_request(1, new_request(1)).expect("first");
        let second = store.add_leave_request(1, new_request(2)).expect("second");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn add_rejects_employee_outside_team() {
        let mut store = store();
        // employee 3 belongs to Fatima Zahra, not Aya
        let err = store.add_leave_request(1, new_request(3)).unwrap_err();
        assert_eq!(err, StoreError::EmployeeNotFound(3));
        assert_eq!(store.request_count(), 5);
    }

    #[test]
    fn add_rejects_unknown_manager() {
        let mut store = store();
        let err = store.add_leave_request(99, new_request(1)).unwrap_err();
        assert_eq!(err, StoreError::ManagerNotFound(99));
    }

    #[test]
    fn update_patches_only_named_fields() {
        let mut store = store();
        let patch = LeaveRequestPatch {
            status: Some(LeaveStatus::Approved),
            ..Default::default()
        };
        let updated = store
            .update_leave_request(1, 1, patch)
            .expect("patch request");

        assert_eq!(updated.status, LeaveStatus::Approved);
        // untouched fields retained
        assert_eq!(updated.employee_id, 1);
        assert_eq!(updated.start, "2025-02-25".parse().expect("date"));
        // other requests untouched, count unchanged
        assert_eq!(store.request_count(), 5);
        assert_eq!(
            store.request_by_id(2).expect("request 2").status,
            LeaveStatus::Approved
        );
        assert_eq!(
            store.request_by_id(4).expect("request 4").status,
            LeaveStatus::Pending
        );
    }

    #[test]
    fn update_is_idempotent() {
        let mut store = store();
        let patch = LeaveRequestPatch {
            start: Some("2025-03-01".parse().expect("date")),
            status: Some(LeaveStatus::Postponed),
            ..Default::default()
        };
        let once = store
            .update_leave_request(1, 4, patch.clone())
            .expect("first patch");
        let twice = store
            .update_leave_request(1, 4, patch)
            .expect("second patch");

        assert_eq!(once.start, twice.start);
        assert_eq!(once.status, twice.status);
        assert_eq!(store.request_count(), 5);
    }

    #[test]
    fn update_unknown_id_creates_nothing() {
        let mut store = store();
        let err = store
            .update_leave_request(1, 42, LeaveRequestPatch::default())
            .unwrap_err();
        assert_eq!(err, StoreError::RequestNotFound(42));
        assert_eq!(store.request_count(), 5);
    }

    #[test]
    fn update_hides_foreign_requests() {
        let mut store = store();
        // request 3 belongs to Fatima Zahra
        let err = store
            .update_leave_request(1, 3, LeaveRequestPatch::default())
            .unwrap_err();
        assert_eq!(err, StoreError::RequestNotFound(3));
    }

    #[test]
    fn update_rejects_employee_outside_team() {
        let mut store = store();
        let patch = LeaveRequestPatch {
            employee_id: Some(5),
            ..Default::default()
        };
        let err = store.update_leave_request(1, 1, patch).unwrap_err();
        assert_eq!(err, StoreError::EmployeeNotFound(5));
        assert_eq!(store.request_by_id(1).expect("request 1").employee_id, 1);
    }
}
