use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, email: &str, full_name: Option<&str>, password_hash: &str) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
    }

    impl MockAuthRepository {
        fn lock_err<T>(_: T) -> AuthError {
            AuthError::Repository("mock lock poisoned".into())
        }

        /// Flip the active flag of a stored user.
        pub fn set_active(&self, email: &str, active: bool) {
            if let Ok(mut users) = self.users.lock() {
                if let Some(u) = users.get_mut(email) {
                    u.is_active = active;
                }
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(Self::lock_err)?;
            Ok(users.get(email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(Self::lock_err)?;
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn create_user(&self, email: &str, full_name: Option<&str>, password_hash: &str) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().map_err(Self::lock_err)?;
            if users.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                email: email.to_string(),
                full_name: full_name.map(str::to_string),
                is_active: true,
                is_superuser: false,
            };
            users.insert(email.to_string(), user.clone());
            self.creds
                .lock()
                .map_err(Self::lock_err)?
                .insert(user.id, Credentials { user_id: user.id, password_hash: password_hash.to_string() });
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().map_err(Self::lock_err)?;
            Ok(creds.get(&user_id).cloned())
        }
    }
}
