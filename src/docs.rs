use crate::api::calendar::SlotSelection;
use crate::editor::PendingEvent;
use crate::model::employee::Employee;
use crate::model::leave_request::{
    CalendarEvent, LeaveRequest, LeaveRequestPatch, LeaveStatus, NewLeaveRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gestion des Congés API",
        version = "1.0.0",
        description = r#"
## Leave Management (Gestion des Congés)

This API powers a small leave-management tool: a manager signs in, sees
the leave requests of their own employees as calendar events, and can
create, edit, approve, or reject a request.

### 🔹 Key Features
- **Calendar**
  - Display-ready events (names, French labels, status colours)
  - Slot-click resolution and save dispatch for the edit modal
- **Leave Management**
  - List, create, patch, approve/reject requests
- **Employees**
  - The active manager's roster

### 🔐 Security
Endpoints under the API prefix require a **JWT Bearer access token**
issued by `/auth/login`. Each manager only ever sees their own team's
requests.

### 📦 State
All data is in-memory seed data; nothing persists across restarts.

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::calendar::list_events,
        crate::api::calendar::select_slot,
        crate::api::calendar::select_event,
        crate::api::calendar::save_event,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::employee::list_employees
    ),
    components(
        schemas(
            CalendarEvent,
            Employee,
            LeaveRequest,
            LeaveRequestPatch,
            LeaveStatus,
            NewLeaveRequest,
            PendingEvent,
            SlotSelection
        )
    ),
    tags(
        (name = "Calendar", description = "Calendar display and interaction APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Employee", description = "Employee roster APIs"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
