use actix_session::Session;
use serde::Serialize;

use crate::errors::AppError;

/// Wrapper around a list of codes (permission codes or role names).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code)
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }

    pub fn to_csv(&self) -> String {
        self.0.join(",")
    }
}

/// Signed-in identity carried through every operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub roles: Permissions,
    pub permissions: Permissions,
}

/// The caller of an operation: a guest or an authenticated user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewer(Option<AuthUser>);

impl Viewer {
    pub fn guest() -> Self {
        Viewer(None)
    }

    pub fn user(user: AuthUser) -> Self {
        Viewer(Some(user))
    }

    pub fn is_guest(&self) -> bool {
        self.0.is_none()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }

    pub fn username(&self) -> Option<&str> {
        self.0.as_ref().map(|u| u.username.as_str())
    }

    pub fn auth_user(&self) -> Option<&AuthUser> {
        self.0.as_ref()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.0.as_ref().is_some_and(|u| u.roles.has(role))
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.0.as_ref().is_some_and(|u| u.permissions.has(code))
    }

    /// Build the viewer from the session cookie. Missing keys mean guest.
    pub fn from_session(session: &Session) -> Result<Self, AppError> {
        let Some(id) = session.get::<i64>("user_id")? else {
            return Ok(Viewer::guest());
        };
        let username = session.get::<String>("username")?.unwrap_or_default();
        let roles = session.get::<String>("roles")?.unwrap_or_default();
        let permissions = session.get::<String>("permissions")?.unwrap_or_default();
        Ok(Viewer::user(AuthUser {
            id,
            username,
            roles: Permissions::from_csv(&roles),
            permissions: Permissions::from_csv(&permissions),
        }))
    }
}

/// Persist a signed-in user into the session.
pub fn store_login(session: &Session, user: &AuthUser) -> Result<(), AppError> {
    session.renew();
    session.insert("user_id", user.id)?;
    session.insert("username", &user.username)?;
    session.insert("roles", user.roles.to_csv())?;
    session.insert("permissions", user.permissions.to_csv())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AuthUser {
        AuthUser {
            id: 7,
            username: "alice".into(),
            roles: Permissions::from_csv("survey_manager"),
            permissions: Permissions::from_csv("survey_template.read, survey_instance.create"),
        }
    }

    #[test]
    fn csv_round_trip_skips_blanks() {
        let p = Permissions::from_csv(" a, ,b,");
        assert_eq!(p, Permissions(vec!["a".into(), "b".into()]));
        assert_eq!(p.to_csv(), "a,b");
    }

    #[test]
    fn guest_has_nothing() {
        let v = Viewer::guest();
        assert!(v.is_guest());
        assert_eq!(v.user_id(), None);
        assert!(!v.has_role("admin"));
        assert!(!v.has_permission("survey_template.read"));
    }

    #[test]
    fn user_roles_and_permissions() {
        let v = Viewer::user(alice());
        assert_eq!(v.user_id(), Some(7));
        assert_eq!(v.username(), Some("alice"));
        assert!(v.has_role("survey_manager"));
        assert!(!v.has_role("admin"));
        assert!(v.has_permission("survey_instance.create"));
        assert!(!v.has_permission("survey_instance.read"));
    }
}
