// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::{AuthUser, Role}};

/// A role gate a route can require.
pub trait RoleGate: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn denied_message() -> &'static str;
}

/// `admin_utama` only: user management, full settings.
pub struct OwnerOnly;
impl RoleGate for OwnerOnly {
    fn allows(role: Role) -> bool {
        role.is_owner()
    }
    fn denied_message() -> &'static str {
        "Hanya admin utama yang dapat melakukan aksi ini"
    }
}

/// `admin_utama` or `admin`: mutate rooms, tenants, expenses, settings.
pub struct AdminOnly;
impl RoleGate for AdminOnly {
    fn allows(role: Role) -> bool {
        role.is_admin()
    }
    fn denied_message() -> &'static str {
        "Anda tidak memiliki akses untuk aksi ini"
    }
}

/// Extractor-guard: adding `RequireRole<AdminOnly>` to a handler's arguments
/// rejects the call with 403 before the body runs. Relies on the auth guard
/// having inserted the user into the extensions.
pub struct RequireRole<T: RoleGate>(PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleGate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthUser>()
            .ok_or_else(|| AppError::unauthorized("Token tidak ditemukan"))?;

        if !T::allows(user.role) {
            return Err(AppError::forbidden(T::denied_message()));
        }
        Ok(RequireRole(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_gate_admits_only_admin_utama() {
        assert!(OwnerOnly::allows(Role::AdminUtama));
        assert!(!OwnerOnly::allows(Role::Admin));
        assert!(!OwnerOnly::allows(Role::Petugas));
    }

    #[test]
    fn admin_gate_admits_both_admin_tiers() {
        assert!(AdminOnly::allows(Role::AdminUtama));
        assert!(AdminOnly::allows(Role::Admin));
        assert!(!AdminOnly::allows(Role::Petugas));
    }
}
