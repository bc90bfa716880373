//! Role and permission gates for administrative operations.
//!
//! Both checks are pure: they read the [`Viewer`] built from the session and
//! either pass or return `AppError::PermissionDenied`.

use crate::auth::session::Viewer;
use crate::errors::AppError;

/// Roles allowed to manage templates and publish surveys.
pub const SURVEY_ADMIN_ROLES: &[&str] = &["admin", "survey_manager"];

/// Fails unless the viewer holds at least one of `roles`.
pub fn require_any_role(viewer: &Viewer, roles: &[&str]) -> Result<(), AppError> {
    if roles.iter().any(|role| viewer.has_role(role)) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(format!(
            "requires one of the roles: {}",
            roles.join(", ")
        )))
    }
}

/// Fails unless the viewer may perform `action` on `entity_type`.
/// Permission codes have the form `<entity_type>.<action>`.
pub fn require_permission(viewer: &Viewer, entity_type: &str, action: &str) -> Result<(), AppError> {
    let code = permission_code(entity_type, action);
    if viewer.has_permission(&code) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(code))
    }
}

pub fn permission_code(entity_type: &str, action: &str) -> String {
    format!("{entity_type}.{action}")
}

/// Combined gate used by every administrative survey operation.
pub fn require_survey_admin(viewer: &Viewer, entity_type: &str, action: &str) -> Result<(), AppError> {
    require_any_role(viewer, SURVEY_ADMIN_ROLES)?;
    require_permission(viewer, entity_type, action)
}
