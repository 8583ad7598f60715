use crate::auth::auth::AuthManager;
use crate::editor::{EventEditor, PendingEvent, SaveAction};
use crate::model::leave_request::{CalendarEvent, LeaveRequest};
use crate::store::{LeaveStore, StoreError};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::sync::RwLock;
use tracing::{error, info};
use utoipa::ToSchema;

/// A clicked calendar range.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SlotSelection {
    #[schema(example = "2025-05-01", format = "date", value_type = String)]
    pub start: NaiveDate,

    #[schema(example = "2025-05-03", format = "date", value_type = String)]
    pub end: NaiveDate,
}

/* =========================
Calendar events
========================= */
/// The active manager's leave requests as calendar events, employee
/// names resolved, insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/calendar/events",
    responses(
        (status = 200, description = "Calendar events for the active manager", body = [CalendarEvent]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn list_events(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
) -> actix_web::Result<impl Responder> {
    let guard = store
        .read()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    let manager = match guard.manager_by_id(auth.manager_id) {
        Ok(m) => m,
        Err(e) => {
            info!(error = %e, "Token references an unknown manager");
            return Ok(HttpResponse::Unauthorized().json(json!({"message": "Unknown manager"})));
        }
    };

    match guard.visible_requests(manager) {
        Ok(events) => Ok(HttpResponse::Ok().json(events)),
        Err(e) => {
            // a request points at an employee outside the roster; the
            // write operations are supposed to make this unreachable
            error!(error = %e, manager_id = auth.manager_id, "Inconsistent leave data");
            Ok(HttpResponse::InternalServerError()
                .json(json!({"message": "Internal Server Error"})))
        }
    }
}

/* =========================
Slot click
========================= */
/// Resolve a clicked slot to the edit buffer the modal should open
/// with: the existing request occupying that slot for the default
/// assignee, or a fresh pending event over the clicked range.
#[utoipa::path(
    post,
    path = "/api/v1/calendar/slot",
    request_body = SlotSelection,
    responses(
        (status = 200, description = "Edit buffer for the clicked slot", body = PendingEvent),
        (status = 400, description = "Manager has no employees to assign"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn select_slot(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    payload: web::Json<SlotSelection>,
) -> actix_web::Result<impl Responder> {
    let guard = store
        .read()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    let manager = match guard.manager_by_id(auth.manager_id) {
        Ok(m) => m,
        Err(e) => {
            info!(error = %e, "Token references an unknown manager");
            return Ok(HttpResponse::Unauthorized().json(json!({"message": "Unknown manager"})));
        }
    };

    let requests = guard.requests_for(manager.id);

    let mut editor = EventEditor::new();
    match editor.select_slot(manager, &requests, payload.start, payload.end) {
        Ok(pending) => {
            info!(
                manager_id = manager.id,
                start = %payload.start,
                editing_existing = pending.id.is_some(),
                "Slot selected"
            );
            Ok(HttpResponse::Ok().json(pending))
        }
        Err(e) => {
            info!(error = %e, manager_id = manager.id, "Slot selection rejected");
            Ok(HttpResponse::BadRequest()
                .json(json!({"message": "Manager has no employees to assign"})))
        }
    }
}

/* =========================
Event click
========================= */
/// Resolve a clicked event to its edit buffer (always edit-existing).
#[utoipa::path(
    post,
    path = "/api/v1/calendar/event/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the clicked event")
    ),
    responses(
        (status = 200, description = "Edit buffer for the clicked event", body = PendingEvent),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn select_event(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let guard = store
        .read()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    match guard.request_by_id(leave_id) {
        Ok(request) if request.manager_id == auth.manager_id => {
            let mut editor = EventEditor::new();
            let pending = editor.select_event(request);
            info!(request_id = leave_id, "Event selected for editing");
            Ok(HttpResponse::Ok().json(pending))
        }
        _ => Ok(HttpResponse::NotFound().json(json!({"message": "Leave request not found"}))),
    }
}

/* =========================
Save (create or update)
========================= */
/// Save the modal's edit buffer: an update when it carries an id, a
/// create (owned by the active manager) otherwise. Returns the stored
/// record.
#[utoipa::path(
    post,
    path = "/api/v1/calendar/save",
    request_body = PendingEvent,
    responses(
        (status = 200, description = "Stored leave request", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request or employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn save_event(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    payload: web::Json<PendingEvent>,
) -> actix_web::Result<impl Responder> {
    let mut editor = EventEditor::new();
    editor.resume(payload.into_inner());
    let action = editor
        .save()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    let mut guard = store
        .write()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    let result = match action {
        SaveAction::Create(new) => guard.add_leave_request(auth.manager_id, new),
        SaveAction::Update { id, patch } => {
            guard.update_leave_request(auth.manager_id, id, patch)
        }
    };

    match result {
        Ok(request) => {
            info!(
                request_id = request.id,
                manager_id = auth.manager_id,
                status = %request.status,
                "Leave request saved"
            );
            Ok(HttpResponse::Ok().json(request))
        }
        Err(e @ StoreError::RequestNotFound(_)) => {
            info!(error = %e, "Save targeted a missing request");
            Ok(HttpResponse::NotFound().json(json!({"message": "Leave request not found"})))
        }
        Err(e @ StoreError::EmployeeNotFound(_)) => {
            info!(error = %e, "Save for an employee outside the team");
            Ok(HttpResponse::NotFound().json(json!({"message": "Employee not found"})))
        }
        Err(e @ StoreError::ManagerNotFound(_)) => {
            info!(error = %e, "Token references an unknown manager");
            Ok(HttpResponse::Unauthorized().json(json!({"message": "Unknown manager"})))
        }
    }
}
