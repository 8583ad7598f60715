use crate::model::employee::Employee;

/// A manager account. Owns a roster of employees and approves their leave.
///
/// Not serialized anywhere: the password hash must never reach a response
/// body. The roster is exposed through its own endpoint instead.
#[derive(Debug, Clone)]
pub struct Manager {
    pub id: u64,
    pub username: String,
    /// Argon2 PHC string, never the clear-text password.
    pub password_hash: String,
    pub employees: Vec<Employee>,
}

impl Manager {
    pub fn employee_by_id(&self, employee_id: u64) -> Option<&Employee> {
        self.employees.iter().find(|emp| emp.id == employee_id)
    }
}
