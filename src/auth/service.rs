use crate::auth::token::{Token, TokenIssuer};
use crate::auth::validation::validate_credentials;
use crate::db::{IdentityStore, StoreError};
use crate::types::{AppError, FieldError, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Registration and login over an [`IdentityStore`].
///
/// Stateless per call: the only shared state is the store itself and the
/// immutable token issuer.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    issuer: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(store: Arc<dyn IdentityStore>, issuer: Arc<TokenIssuer>) -> Self {
        Self { store, issuer }
    }

    pub fn issuer(&self) -> &Arc<TokenIssuer> {
        &self.issuer
    }

    /// Creates an account and logs it in.
    ///
    /// The username is the email. Every message the store reports is passed
    /// back to the caller.
    pub async fn register(&self, email: &str, password: &str) -> Result<Token> {
        validate_credentials(email, password)?;

        let account = self
            .store
            .create_account(email, email, password)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(messages) => AppError::DuplicateAccount(messages),
                StoreError::Rejected(messages) => {
                    AppError::Validation(messages.into_iter().map(FieldError::general).collect())
                }
                StoreError::Backend(msg) => AppError::Store(msg),
            })?;

        info!(account_id = %account.id, "account created");

        match self.login(email, password).await {
            Err(AppError::InvalidCredentials) => {
                error!(account_id = %account.id, "account missing right after creation");
                Err(AppError::Store(format!(
                    "Account {} not found after creation",
                    account.id
                )))
            }
            other => other,
        }
    }

    /// Checks credentials and issues a token for the account's username.
    ///
    /// An unknown email and a wrong password produce the same error and cost
    /// one Argon2 verification each.
    pub async fn login(&self, email: &str, password: &str) -> Result<Token> {
        validate_credentials(email, password)?;

        let account = match self.store.find_by_email(email).await.map_err(store_fault)? {
            Some(account) => account,
            None => {
                // Pay for a hash verification anyway so response time does not
                // reveal whether the email is registered.
                self.store
                    .verify_decoy(password)
                    .await
                    .map_err(store_fault)?;
                warn!("login rejected: bad credentials");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self
            .store
            .verify_password(&account, password)
            .await
            .map_err(store_fault)?
        {
            warn!("login rejected: bad credentials");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issuer.issue(&account.username)?;
        info!(account_id = %account.id, expires_at = %token.expires_at, "login succeeded");

        Ok(token)
    }
}

fn store_fault(err: StoreError) -> AppError {
    AppError::Store(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{HashCost, PasswordHasher, PasswordPolicy};
    use crate::auth::token::SigningKey;
    use crate::db::{Credentials, MemoryIdentityStore};

    fn create_test_service() -> (AuthService, Arc<MemoryIdentityStore>) {
        let hasher = PasswordHasher::new(HashCost {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params");
        let store = Arc::new(MemoryIdentityStore::new(Credentials::new(
            hasher,
            PasswordPolicy::default(),
        )));
        let key = SigningKey::from_secret("test-secret-key-that-is-at-least-32-chars")
            .expect("valid secret");
        let issuer = Arc::new(TokenIssuer::with_default_lifetime(&key));

        (AuthService::new(store.clone(), issuer), store)
    }

    #[tokio::test]
    async fn test_register_logs_in() {
        let (service, store) = create_test_service();

        let token = service.register("a@x.com", "Pw1!").await.expect("should register");

        assert_eq!(token.username, "a@x.com");
        let claims = service.issuer().verify(&token.value).expect("should verify");
        assert_eq!(claims.username, "a@x.com");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_login_after_register() {
        let (service, _) = create_test_service();
        service.register("a@x.com", "Pw1!").await.expect("should register");

        let token = service.login("a@x.com", "Pw1!").await.expect("should login");
        assert!(!token.value.is_empty());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let (service, _) = create_test_service();
        service.register("a@x.com", "Pw1!").await.expect("should register");

        let unknown = service
            .login("nouser@x.com", "whatever")
            .await
            .expect_err("unknown email");
        let wrong = service
            .login("a@x.com", "Wrong1!")
            .await
            .expect_err("wrong password");

        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(
            serde_json::to_value(unknown.body()).expect("json"),
            serde_json::to_value(wrong.body()).expect("json")
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let (service, store) = create_test_service();
        service.register("a@x.com", "Pw1!").await.expect("should register");

        let err = service
            .register("a@x.com", "Pw1!")
            .await
            .expect_err("should fail");

        match err {
            AppError::DuplicateAccount(messages) => {
                assert!(messages.contains(&"Email 'a@x.com' is already taken.".to_string()));
            }
            other => panic!("expected duplicate, got {:?}", other),
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_policy_violation_is_validation_error() {
        let (service, store) = create_test_service();

        let err = service
            .register("a@x.com", "weak")
            .await
            .expect_err("should fail");

        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.iter().all(|e| e.field.is_none()));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_email_never_reaches_store() {
        let (service, store) = create_test_service();

        let err = service
            .register("notanemail", "Pw1!")
            .await
            .expect_err("should fail");

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty());
    }
}
