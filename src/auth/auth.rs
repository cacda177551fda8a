use crate::config::Config;
use crate::model::role::Role;
use crate::models::Claims;
use crate::utils::token_blacklist;
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::decode;
use jsonwebtoken::{DecodingKey, Validation};

/// Operations declare the capability they need; the table below maps each
/// capability to the roles that hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageEmployees,
    ViewEmployees,
    DecideLeave,
    ViewLeave,
    GeneratePayroll,
    ViewPayroll,
    ViewAttendance,
    ViewScreenshots,
}

pub fn allowed_roles(capability: Capability) -> &'static [Role] {
    use Role::*;

    match capability {
        Capability::ManageEmployees => &[Admin, HrOfficer],
        Capability::ViewEmployees => &[Admin, HrOfficer, PayrollOfficer, Manager],
        Capability::DecideLeave => &[Admin, HrOfficer, Manager],
        Capability::ViewLeave => &[Admin, HrOfficer, Manager],
        Capability::GeneratePayroll => &[Admin, PayrollOfficer],
        Capability::ViewPayroll => &[Admin, PayrollOfficer, HrOfficer],
        Capability::ViewAttendance => &[Admin, HrOfficer, Manager],
        Capability::ViewScreenshots => &[Admin, Manager],
    }
}

pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,

    /// Tenant scope for employee and payroll operations
    pub company_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        if token_blacklist::is_revoked(&data.claims.jti) {
            return ready(Err(ErrorUnauthorized("Token revoked")));
        }

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Invalid role"))),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            username: data.claims.sub,
            role,
            employee_id: data.claims.employee_id,
            company_id: data.claims.company_id,
        }))
    }
}

impl AuthUser {
    pub fn require(&self, capability: Capability) -> actix_web::Result<()> {
        if allowed_roles(capability).contains(&self.role) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden(
                "Insufficient role for this operation",
            ))
        }
    }

    /// Self-service endpoints (leave application, check-in, screenshot
    /// upload) need a linked employee profile.
    pub fn employee_id_required(&self) -> actix_web::Result<u64> {
        self.employee_id
            .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))
    }

    /// Tenant scope for employee and payroll operations.
    pub fn company_id_required(&self) -> actix_web::Result<u64> {
        self.company_id
            .ok_or_else(|| actix_web::error::ErrorForbidden("No company scope"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "test".into(),
            role,
            employee_id: None,
            company_id: Some(1),
        }
    }

    #[test]
    fn payroll_generation_is_admin_or_payroll_officer_only() {
        assert!(user(Role::Admin).require(Capability::GeneratePayroll).is_ok());
        assert!(
            user(Role::PayrollOfficer)
                .require(Capability::GeneratePayroll)
                .is_ok()
        );
        assert!(
            user(Role::HrOfficer)
                .require(Capability::GeneratePayroll)
                .is_err()
        );
        assert!(
            user(Role::Employee)
                .require(Capability::GeneratePayroll)
                .is_err()
        );
    }

    #[test]
    fn employees_hold_no_management_capabilities() {
        let employee = user(Role::Employee);
        for capability in [
            Capability::ManageEmployees,
            Capability::ViewEmployees,
            Capability::DecideLeave,
            Capability::ViewLeave,
            Capability::ViewPayroll,
            Capability::ViewAttendance,
            Capability::ViewScreenshots,
        ] {
            assert!(employee.require(capability).is_err());
        }
    }

    #[test]
    fn managers_decide_leave_but_do_not_manage_employees() {
        let manager = user(Role::Manager);
        assert!(manager.require(Capability::DecideLeave).is_ok());
        assert!(manager.require(Capability::ViewScreenshots).is_ok());
        assert!(manager.require(Capability::ManageEmployees).is_err());
    }

    #[test]
    fn missing_employee_profile_is_forbidden() {
        assert!(user(Role::Employee).employee_id_required().is_err());
    }
}
