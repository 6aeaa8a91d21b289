// src/services/auth.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::Config,
    db::UserRepository,
    integrations::mailer::Mailer,
    models::auth::{
        AuthUser, Claims, CreateUserPayload, ForgotPasswordPayload, LoginPayload, LoginResponse,
        ResetPasswordPayload, Role, User,
    },
};

const TOKEN_TTL_DAYS: i64 = 7;
const RESET_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Clone)]
pub struct AuthService {
    repo: UserRepository,
    mailer: Mailer,
    config: Config,
}

impl AuthService {
    pub fn new(repo: UserRepository, mailer: Mailer, config: Config) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse, AppError> {
        let user = self
            .repo
            .find_by_email(&payload.email)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("Email atau password salah"))?;

        let hash = user
            .password_hash
            .clone()
            .ok_or_else(|| AppError::unauthorized("Email atau password salah"))?;

        // bcrypt is CPU-bound; keep it off the async workers.
        let password = payload.password;
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        if !ok {
            return Err(AppError::unauthorized("Email atau password salah"));
        }

        let token = self.issue_token(&user)?;
        Ok(LoginResponse {
            token,
            role: user.role,
        })
    }

    fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Validates a bearer token and loads the live user behind it. The user
    /// row is re-read on every request so a deactivated account dies with
    /// its next call, not at token expiry.
    pub async fn validate_token(&self, token: &str) -> Result<AuthUser, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        let user = self
            .repo
            .find_by_id(data.claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("Sesi tidak valid"))?;

        Ok(AuthUser::from(&user))
    }

    /// Always answers ok, whether or not the email exists, so the endpoint
    /// cannot be used to enumerate accounts. Mail delivery failure is logged
    /// and swallowed for the same reason.
    pub async fn forgot_password(&self, payload: ForgotPasswordPayload) -> Result<(), AppError> {
        let Some(user) = self
            .repo
            .find_by_email(&payload.email)
            .await?
            .filter(|u| u.is_active)
        else {
            return Ok(());
        };

        let token = Uuid::new_v4().to_string();
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.repo.set_reset_token(user.id, &token, expires).await?;

        let Some(api_key) = self.config.resend_api_key.as_deref() else {
            tracing::warn!("Reset requested but RESEND_API_KEY is not configured");
            return Ok(());
        };
        let origin = self
            .config
            .app_origins
            .first()
            .map(String::as_str)
            .unwrap_or("http://localhost:5173");
        let reset_link = format!("{origin}/reset-password?token={token}");

        if let Err(e) = self
            .mailer
            .send_reset_password(api_key, &user.email, &reset_link, user.name.as_deref())
            .await
        {
            tracing::warn!("Reset mail to {} failed: {e}", user.email);
        }
        Ok(())
    }

    pub async fn reset_password(&self, payload: ResetPasswordPayload) -> Result<(), AppError> {
        let user = self
            .repo
            .find_by_reset_token(&payload.token)
            .await?
            .ok_or_else(|| AppError::bad_request("Token reset tidak valid"))?;

        let expired = user
            .reset_token_expires
            .map(|t| t < Utc::now())
            .unwrap_or(true);
        if expired {
            return Err(AppError::bad_request("Token reset sudah kedaluwarsa"));
        }

        let hash = hash_password(payload.password).await?;
        self.repo.reset_password(user.id, &hash).await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list().await
    }

    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        if self.repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::conflict("Email sudah terdaftar"));
        }
        let hash = hash_password(payload.password).await?;
        self.repo
            .create(&payload.email, payload.name.as_deref(), payload.role, &hash)
            .await
    }

    pub async fn deactivate_user(&self, id: Uuid) -> Result<(), AppError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Pengguna tidak ditemukan"))?;
        // The owner account cannot be locked out.
        if user.role == Role::AdminUtama {
            return Err(AppError::forbidden("Admin utama tidak dapat dinonaktifkan"));
        }
        self.repo.deactivate(id).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Pengguna tidak ditemukan"))?;
        if user.role == Role::AdminUtama {
            return Err(AppError::forbidden("Admin utama tidak dapat dihapus"));
        }
        self.repo.delete(id).await
    }
}

async fn hash_password(password: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(hash)
}
