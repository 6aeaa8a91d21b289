// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Role hierarchy: `admin_utama` (owner) > `admin` > `petugas` (staff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    AdminUtama,
    Admin,
    Petugas,
}

impl Role {
    /// Owner-only capabilities: user management, full settings.
    pub fn is_owner(self) -> bool {
        matches!(self, Role::AdminUtama)
    }

    /// Admin capabilities: mutate rooms, tenants, expenses, settings.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::AdminUtama | Role::Admin)
    }
}

// A user row from the database.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub is_active: bool,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: Option<String>,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub reset_token: Option<String>,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub reset_token_expires: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// The slice of the user that rides in request extensions after the auth
/// guard validates the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

// JWT claims: subject + role, 7 day expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
    pub name: Option<String>,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "Token wajib diisi"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_hierarchy() {
        assert!(Role::AdminUtama.is_owner());
        assert!(Role::AdminUtama.is_admin());
        assert!(!Role::Admin.is_owner());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Petugas.is_owner());
        assert!(!Role::Petugas.is_admin());
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::AdminUtama).unwrap(),
            "\"admin_utama\""
        );
        let r: Role = serde_json::from_str("\"petugas\"").unwrap();
        assert_eq!(r, Role::Petugas);
    }
}
