use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{AdminClaims, AdminUser, AuthSession, LoginInput};
use super::errors::AuthError;
use super::repository::AdminRepository;

const PASSWORD_ALGORITHM: &str = "argon2";

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl From<&configs::AuthConfig> for AuthSettings {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), token_ttl_hours: cfg.token_ttl_hours }
    }
}

/// Admin auth service independent of web framework
pub struct AuthService<R: AdminRepository> {
    repo: Arc<R>,
    cfg: AuthSettings,
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_ascii_lowercase();
    models::validation::validate_email(&email).map_err(|e| AuthError::Validation(e.to_string()))?;
    Ok(email)
}

impl<R: AdminRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthSettings) -> Self { Self { repo, cfg } }

    /// Create an admin with an argon2 password hash.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthSettings, repository::mock::MockAdminRepository};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAdminRepository::default()), AuthSettings { jwt_secret: "0123456789abcdef".into(), token_ttl_hours: 12 });
    /// let admin = tokio_test::block_on(svc.create_admin("Owner@Shop.test", "Owner", "Secret123")).unwrap();
    /// assert_eq!(admin.email, "owner@shop.test");
    /// ```
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn create_admin(&self, email: &str, name: &str, password: &str) -> Result<AdminUser, AuthError> {
        let email = normalize_email(email)?;
        if password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            debug!("admin exists: {}", email);
            return Err(AuthError::Conflict);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        let admin = self.repo.create_admin(&email, name, hash, PASSWORD_ALGORITHM.to_string()).await?;
        info!(admin_id = %admin.id, email = %admin.email, "admin_created");
        Ok(admin)
    }

    /// Creates the first admin when none exists yet. Returns `None` when admins are already present.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<Option<AdminUser>, AuthError> {
        if self.repo.count_admins().await? > 0 {
            debug!("bootstrap skipped: admins present");
            return Ok(None);
        }
        let name = email.split('@').next().unwrap_or("admin").to_string();
        let admin = self.create_admin(email, &name, password).await?;
        info!(event = "admin_bootstrap", admin_id = %admin.id);
        Ok(Some(admin))
    }

    /// Verify the password and issue an HS256 token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthSettings, domain::LoginInput, repository::mock::MockAdminRepository};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAdminRepository::default()), AuthSettings { jwt_secret: "0123456789abcdef".into(), token_ttl_hours: 12 });
    /// tokio_test::block_on(svc.create_admin("a@shop.test", "A", "Passw0rd!")).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "a@shop.test".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert_eq!(session.admin.email, "a@shop.test");
    /// assert!(svc.verify_token(&session.token).is_ok());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = normalize_email(&input.email).map_err(|_| AuthError::Unauthorized)?;
        let (admin, cred) = self.repo.find_by_email(&email).await?.ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let (token, expires_at) = self.issue_token(&admin)?;
        info!(admin_id = %admin.id, "admin_login");
        Ok(AuthSession { admin, token, expires_at })
    }

    pub fn issue_token(&self, admin: &AdminUser) -> Result<(String, i64), AuthError> {
        let now = chrono::Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp();
        let claims = AdminClaims { sub: admin.email.clone(), uid: admin.id, exp: exp as usize, iat: now.timestamp() as usize };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok((token, exp))
    }

    /// Signature and expiry check; any failure is `Unauthorized`.
    pub fn verify_token(&self, token: &str) -> Result<AdminClaims, AuthError> {
        decode::<AdminClaims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::seaorm::SeaOrmAdminRepository;
    use crate::auth::repository::mock::MockAdminRepository;
    use crate::test_support::get_db;

    fn settings() -> AuthSettings {
        AuthSettings { jwt_secret: "test-secret-0123456789".into(), token_ttl_hours: 12 }
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = AuthService::new(Arc::new(MockAdminRepository::default()), settings());
        svc.create_admin("a@shop.test", "A", "Passw0rd!").await.unwrap();
        let err = svc.login(LoginInput { email: "a@shop.test".into(), password: "nope-nope".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        let err = svc.login(LoginInput { email: "b@shop.test".into(), password: "Passw0rd!".into() }).await.unwrap_err();
        assert_eq!(err.code(), 1004);
    }

    #[tokio::test]
    async fn tokens_from_other_secrets_are_rejected() {
        let svc = AuthService::new(Arc::new(MockAdminRepository::default()), settings());
        let admin = AdminUser { id: uuid::Uuid::new_v4(), email: "a@shop.test".into(), name: "A".into() };
        let (token, _) = svc.issue_token(&admin).unwrap();
        assert_eq!(svc.verify_token(&token).unwrap().uid, admin.id);

        let other = AuthService::new(Arc::new(MockAdminRepository::default()), AuthSettings { jwt_secret: "another-secret-abcdef".into(), token_ttl_hours: 12 });
        assert!(matches!(other.verify_token(&token), Err(AuthError::Unauthorized)));

        let expired = AuthService::new(Arc::new(MockAdminRepository::default()), AuthSettings { token_ttl_hours: -1, ..settings() });
        let (old, _) = expired.issue_token(&admin).unwrap();
        assert!(matches!(svc.verify_token(&old), Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn bootstrap_runs_once_against_database() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let svc = AuthService::new(Arc::new(SeaOrmAdminRepository { db }), settings());
        let first = svc.bootstrap_admin("owner@shop.test", "Passw0rd!").await?;
        assert!(first.is_some());
        assert!(svc.bootstrap_admin("second@shop.test", "Passw0rd!").await?.is_none());

        let session = svc.login(LoginInput { email: "OWNER@shop.test".into(), password: "Passw0rd!".into() }).await?;
        assert_eq!(session.admin.name, "owner");
        Ok(())
    }
}
