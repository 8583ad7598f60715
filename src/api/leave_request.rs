use crate::auth::auth::AuthManager;
use crate::model::leave_request::{
    LeaveRequest, LeaveRequestPatch, LeaveStatus, NewLeaveRequest,
};
use crate::store::{LeaveStore, StoreError};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::sync::RwLock;
use tracing::info;

/* =========================
List leave requests
========================= */
/// The active manager's leave requests, raw records in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    responses(
        (status = 200, description = "Leave requests of the active manager", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
) -> actix_web::Result<impl Responder> {
    let guard = store
        .read()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    if let Err(e) = guard.manager_by_id(auth.manager_id) {
        info!(error = %e, "Token references an unknown manager");
        return Ok(HttpResponse::Unauthorized().json(json!({"message": "Unknown manager"})));
    }

    Ok(HttpResponse::Ok().json(guard.requests_for(auth.manager_id)))
}

/* =========================
Get one leave request
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let guard = store
        .read()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    // a foreign request answers exactly like a missing one
    match guard.request_by_id(leave_id) {
        Ok(request) if request.manager_id == auth.manager_id => {
            Ok(HttpResponse::Ok().json(request))
        }
        _ => Ok(HttpResponse::NotFound().json(json!({"message": "Leave request not found"}))),
    }
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = NewLeaveRequest,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request created", body = LeaveRequest),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    payload: web::Json<NewLeaveRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.start > payload.end {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "start cannot be after end"
        })));
    }

    let mut guard = store
        .write()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    match guard.add_leave_request(auth.manager_id, payload.into_inner()) {
        Ok(request) => {
            info!(
                request_id = request.id,
                manager_id = auth.manager_id,
                employee_id = request.employee_id,
                "Leave request created"
            );
            Ok(HttpResponse::Ok().json(request))
        }
        Err(e @ StoreError::EmployeeNotFound(_)) => {
            info!(error = %e, "Create for an employee outside the team");
            Ok(HttpResponse::NotFound().json(json!({"message": "Employee not found"})))
        }
        Err(e) => {
            info!(error = %e, "Token references an unknown manager");
            Ok(HttpResponse::Unauthorized().json(json!({"message": "Unknown manager"})))
        }
    }
}

/* =========================
Patch leave request
========================= */
/// Patch semantics: fields present in the body overwrite, absent fields
/// are retained.
#[utoipa::path(
    patch,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to patch")
    ),
    request_body = LeaveRequestPatch,
    responses(
        (status = 200, description = "Updated leave request", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request or employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    path: web::Path<u64>,
    payload: web::Json<LeaveRequestPatch>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let mut guard = store
        .write()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    match guard.update_leave_request(auth.manager_id, leave_id, payload.into_inner()) {
        Ok(request) => {
            info!(
                request_id = request.id,
                manager_id = auth.manager_id,
                status = %request.status,
                "Leave request patched"
            );
            Ok(HttpResponse::Ok().json(request))
        }
        Err(e @ StoreError::RequestNotFound(_)) => {
            info!(error = %e, "Patch targeted a missing request");
            Ok(HttpResponse::NotFound().json(json!({"message": "Leave request not found"})))
        }
        Err(e @ StoreError::EmployeeNotFound(_)) => {
            info!(error = %e, "Patch to an employee outside the team");
            Ok(HttpResponse::NotFound().json(json!({"message": "Employee not found"})))
        }
        Err(e @ StoreError::ManagerNotFound(_)) => {
            info!(error = %e, "Token references an unknown manager");
            Ok(HttpResponse::Unauthorized().json(json!({"message": "Unknown manager"})))
        }
    }
}

/* =========================
Approve leave
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let mut guard = store
        .write()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    // only a pending request of this manager can be approved
    let is_pending_here = guard
        .request_by_id(leave_id)
        .ok()
        .is_some_and(|req| {
            req.manager_id == auth.manager_id && req.status == LeaveStatus::Pending
        });
    if !is_pending_here {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Leave request not found or already processed"
        })));
    }

    let patch = LeaveRequestPatch {
        status: Some(LeaveStatus::Approved),
        ..Default::default()
    };
    match guard.update_leave_request(auth.manager_id, leave_id, patch) {
        Ok(request) => {
            info!(request_id = request.id, "Leave approved");
            Ok(HttpResponse::Ok().json(json!({"message": "Leave approved"})))
        }
        Err(e) => {
            tracing::error!(error = %e, leave_id, "Approve leave failed");
            Err(actix_web::error::ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/* =========================
Reject leave
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected successfully", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let mut guard = store
        .write()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    let is_pending_here = guard
        .request_by_id(leave_id)
        .ok()
        .is_some_and(|req| {
            req.manager_id == auth.manager_id && req.status == LeaveStatus::Pending
        });
    if !is_pending_here {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Leave request not found or already processed"
        })));
    }

    let patch = LeaveRequestPatch {
        status: Some(LeaveStatus::Rejected),
        ..Default::default()
    };
    match guard.update_leave_request(auth.manager_id, leave_id, patch) {
        Ok(request) => {
            info!(request_id = request.id, "Leave rejected");
            Ok(HttpResponse::Ok().json(json!({"message": "Leave rejected"})))
        }
        Err(e) => {
            tracing::error!(error = %e, leave_id, "Reject leave failed");
            Err(actix_web::error::ErrorInternalServerError("Internal Server Error"))
        }
    }
}
