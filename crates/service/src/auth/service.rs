use std::sync::Arc;

use tracing::{info, debug, instrument};

use models::user::{normalize_email, validate_email, validate_password};
use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::password::{hash_password, verify_password};
use super::repository::AuthRepository;
use super::token::{decode_token, issue_token};

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        Self { jwt_secret: c.secret_key.clone(), token_ttl_minutes: c.access_token_expire_minutes }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_minutes: 30 });
    /// let input = RegisterInput { email: "User@Example.com".into(), password: "Secret123".into(), full_name: Some("Test".into()) };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert!(user.is_active);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        validate_password(&input.password).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = normalize_email(&input.email);
        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(&input.password)?;
        let full_name = input.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let user = self.repo.create_user(&email, full_name, &hash).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue an access token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_minutes: 30 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), password: "Passw0rd".into(), full_name: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = normalize_email(&input.email);
        let user = self.repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &cred.password_hash) {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }
        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        let token = issue_token(&self.cfg.jwt_secret, user.id, &user.email, self.cfg.token_ttl_minutes)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token, expires_in: self.cfg.token_ttl_minutes * 60 })
    }

    /// Resolve a bearer token to its (active) user.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = decode_token(&self.cfg.jwt_secret, token)?;
        let user = self.repo
            .find_user_by_id(claims.user_id()?)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> (Arc<MockAuthRepository>, AuthService<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "test-secret".into(), token_ttl_minutes: 30 });
        (repo, svc)
    }

    fn reg(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), password: password.into(), full_name: Some("Alice Smith".into()) }
    }

    #[tokio::test]
    async fn register_validates_input() {
        let (_, svc) = svc();
        assert!(matches!(svc.register(reg("nope", "12345678")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(reg("a@b.co", "short")).await, Err(AuthError::Validation(_))));
        let long = "x".repeat(73);
        assert!(matches!(svc.register(reg("a@b.co", &long)).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let (_, svc) = svc();
        svc.register(reg("alice@example.com", "12345678")).await.unwrap();
        let err = svc.register(reg("ALICE@example.com", "12345678")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(err.code(), 1002);
    }

    #[tokio::test]
    async fn login_round_trip_and_authenticate() {
        let (_, svc) = svc();
        let u = svc.register(reg("alice@example.com", "12345678")).await.unwrap();
        assert_eq!(u.full_name.as_deref(), Some("Alice Smith"));

        let s = svc
            .login(LoginInput { email: "Alice@Example.com".into(), password: "12345678".into() })
            .await
            .unwrap();
        assert_eq!(s.expires_in, 1800);
        let who = svc.authenticate(&s.token).await.unwrap();
        assert_eq!(who.id, u.id);
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let (_, svc) = svc();
        svc.register(reg("bob@example.com", "12345678")).await.unwrap();
        let wrong = svc.login(LoginInput { email: "bob@example.com".into(), password: "87654321".into() }).await;
        assert!(matches!(wrong, Err(AuthError::Unauthorized)));
        let unknown = svc.login(LoginInput { email: "ghost@example.com".into(), password: "12345678".into() }).await;
        assert!(matches!(unknown, Err(AuthError::Unauthorized)));
        assert!(matches!(svc.authenticate("garbage").await, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn inactive_user_is_rejected() {
        let (repo, svc) = svc();
        svc.register(reg("carol@example.com", "12345678")).await.unwrap();
        let s = svc
            .login(LoginInput { email: "carol@example.com".into(), password: "12345678".into() })
            .await
            .unwrap();
        repo.set_active("carol@example.com", false);
        assert!(matches!(svc.authenticate(&s.token).await, Err(AuthError::Inactive)));
        let again = svc.login(LoginInput { email: "carol@example.com".into(), password: "12345678".into() }).await;
        assert!(matches!(again, Err(AuthError::Inactive)));
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_unauthorized() {
        let (_, svc) = svc();
        let t = issue_token("test-secret", uuid::Uuid::new_v4(), "x@y.co", 5).unwrap();
        assert!(matches!(svc.authenticate(&t).await, Err(AuthError::Unauthorized)));
    }
}
