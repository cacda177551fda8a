use crate::api::attendance::{AttendanceListResponse, AttendanceQuery};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee};
use crate::api::leave::{
    ApplyLeave, BalanceQuery, BalanceResponse, LeaveFilter, LeaveListResponse,
};
use crate::api::monitoring::{ScreenshotResponse, UploadScreenshot};
use crate::api::payroll::{GeneratePayroll, PaginatedPayrollResponse, PayrollQuery};
use crate::leave::accountant::LeaveBalance;
use crate::model::attendance::Attendance;
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRecord, LeaveStatus, LeaveType};
use crate::model::leave_type::LeaveTypeConfig;
use crate::model::payroll::PayrollRecord;
use crate::payroll::calculator::PayBreakdown;
use crate::payroll::orchestrator::{PayrollRunOutcome, SkipReason, SkippedEmployee};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

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

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "HRMS Backend API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System

Backend for core HR operations within an organization.

### Key Features
- **Employee Management**
  - Profiles, salaries and disbursement details
- **Leave Management**
  - Applications with overlap protection, approval workflow and per-type annual balances
- **Attendance**
  - Daily check-in and check-out tracking
- **Payroll**
  - Idempotent per-period generation with provident fund, tax and unpaid-leave proration
- **Monitoring**
  - Ad-hoc screen captures with automatic expiry

### Security
Endpoints are protected with **JWT Bearer authentication**; each operation
declares the roles allowed to call it (ADMIN, HR_OFFICER, PAYROLL_OFFICER,
MANAGER, EMPLOYEE).
"#,
    ),
    paths(
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::apply_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::cancel_leave,
        crate::api::leave::leave_types,
        crate::api::leave::leave_balance,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::attendance_history,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::payroll::generate_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls,

        crate::api::monitoring::upload_screenshot,
        crate::api::monitoring::latest_screenshot
    ),
    components(
        schemas(
            ApplyLeave,
            LeaveFilter,
            LeaveRecord,
            LeaveType,
            LeaveStatus,
            LeaveTypeConfig,
            LeaveListResponse,
            BalanceQuery,
            BalanceResponse,
            LeaveBalance,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            Employee,
            EmployeeListResponse,
            Attendance,
            AttendanceQuery,
            AttendanceListResponse,
            GeneratePayroll,
            PayrollQuery,
            PayrollRecord,
            PayBreakdown,
            PayrollRunOutcome,
            SkippedEmployee,
            SkipReason,
            PaginatedPayrollResponse,
            UploadScreenshot,
            ScreenshotResponse
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payroll", description = "Payroll generation and history APIs"),
        (name = "Monitoring", description = "Ad-hoc screen monitoring APIs"),
    )
)]
pub struct ApiDoc;
