//! Registration, login and principal search.

use std::sync::Arc;

use validator::ValidateEmail;

use coffer_shared::auth::{LoginRequest, RegisterRequest};
use coffer_shared::error::FieldErrors;
use coffer_shared::types::UserId;

use crate::accounts::error::AccountError;
use crate::accounts::types::{NewPrincipal, Principal};
use crate::auth::{hash_password_async, verify_password_async};
use crate::store::{PrincipalStore, StoreError};

/// Well-formed `derivedKey:salt` that no password derives to.
const UNKNOWN_PRINCIPAL_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000:00000000000000000000000000000000";

/// Principal lifecycle operations.
#[derive(Clone)]
pub struct AccountService {
    principals: Arc<dyn PrincipalStore>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

/// Field checks for a registration request. Every failing field is reported.
#[must_use]
pub fn validate_registration(request: &RegisterRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if request.first_name.trim().is_empty() {
        errors.insert("firstName".to_string(), "First name is required".to_string());
    }
    if request.last_name.trim().is_empty() {
        errors.insert("lastName".to_string(), "Last name is required".to_string());
    }
    if request.email.trim().is_empty() {
        errors.insert("email".to_string(), "Email is required".to_string());
    } else if !request.email.trim().validate_email() {
        errors.insert("email".to_string(), "Invalid email".to_string());
    }
    if request.password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
    }
    if let Some(username) = &request.username {
        if username.trim().is_empty() {
            errors.insert("username".to_string(), "Username cannot be blank".to_string());
        }
    }

    errors
}

impl AccountService {
    /// Creates the service over a principal repository.
    #[must_use]
    pub fn new(principals: Arc<dyn PrincipalStore>) -> Self {
        Self { principals }
    }

    /// Registers a principal.
    ///
    /// The password is hashed off the async executor. The username defaults
    /// to the email when none is given.
    pub async fn register(&self, request: RegisterRequest) -> Result<Principal, AccountError> {
        let errors = validate_registration(&request);
        if !errors.is_empty() {
            return Err(AccountError::Validation(errors));
        }

        let email = request.email.trim().to_string();
        let username = request
            .username
            .as_deref()
            .map_or_else(|| email.clone(), |name| name.trim().to_string());

        if self.principals.find_principal_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }
        if self
            .principals
            .find_principal_by_username(&username)
            .await?
            .is_some()
        {
            return Err(AccountError::UsernameTaken);
        }

        let password_hash = hash_password_async(request.password).await?;
        let created = self
            .principals
            .create_principal(NewPrincipal {
                username,
                email: email.clone(),
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                password_hash,
            })
            .await;
        let principal = match created {
            Ok(principal) => principal,
            // A concurrent registration won one of the unique indexes.
            Err(StoreError::Conflict(_)) => return Err(self.conflict_for(&email).await),
            Err(other) => return Err(AccountError::Store(other)),
        };

        tracing::info!(user_id = %principal.id, "principal registered");
        Ok(principal)
    }

    async fn conflict_for(&self, email: &str) -> AccountError {
        match self.principals.find_principal_by_email(email).await {
            Ok(Some(_)) => AccountError::EmailTaken,
            Ok(None) => AccountError::UsernameTaken,
            Err(err) => AccountError::Store(err),
        }
    }

    /// Checks an email and password pair.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<Principal, AccountError> {
        let Some(principal) = self
            .principals
            .find_principal_by_email(request.email.trim())
            .await?
        else {
            // Same Argon2 cost as a known email.
            verify_password_async(request.password, UNKNOWN_PRINCIPAL_HASH.to_string()).await?;
            tracing::warn!("login failed: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let matches =
            verify_password_async(request.password, principal.password_hash.clone()).await?;
        if !matches {
            tracing::warn!(user_id = %principal.id, "login failed: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        tracing::info!(user_id = %principal.id, "login succeeded");
        Ok(principal)
    }

    /// Loads a principal by ID.
    pub async fn find(&self, id: UserId) -> Result<Principal, AccountError> {
        self.principals
            .find_principal(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    /// Loads a principal by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, AccountError> {
        Ok(self.principals.find_principal_by_username(username).await?)
    }

    /// Fuzzy search over username, names and email, never returning `requester`.
    pub async fn search(
        &self,
        query: &str,
        requester: UserId,
        limit: u64,
    ) -> Result<Vec<Principal>, AccountError> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .principals
            .search_principals(query, requester, limit)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockPrincipalStore};
    use rstest::rstest;

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "correct horse battery staple".to_string(),
            username: None,
        }
    }

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryStore::new()))
    }

    #[rstest]
    #[case("firstName", "", "Lovelace", "ada@example.com", "pw", "First name is required")]
    #[case("lastName", "Ada", " ", "ada@example.com", "pw", "Last name is required")]
    #[case("email", "Ada", "Lovelace", "", "pw", "Email is required")]
    #[case("email", "Ada", "Lovelace", "not-an-email", "pw", "Invalid email")]
    #[case("password", "Ada", "Lovelace", "ada@example.com", "", "Password is required")]
    fn test_validate_registration_field(
        #[case] field: &str,
        #[case] first_name: &str,
        #[case] last_name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] message: &str,
    ) {
        let errors = validate_registration(&RegisterRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            username: None,
        });

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(field).map(String::as_str), Some(message));
    }

    #[test]
    fn test_validate_registration_reports_every_field() {
        let errors = validate_registration(&RegisterRequest {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            username: Some("  ".to_string()),
        });
        assert_eq!(errors.len(), 5);
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_defaults_username() {
        let service = service();
        let principal = service.register(request("ada@example.com")).await.unwrap();

        assert_eq!(principal.username, "ada@example.com");
        assert_ne!(principal.password_hash, "correct horse battery staple");
        assert!(principal.password_hash.contains(':'));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = service();
        service.register(request("ada@example.com")).await.unwrap();

        let err = service
            .register(request("ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts() {
        let service = service();
        let mut first = request("ada@example.com");
        first.username = Some("ada".to_string());
        service.register(first).await.unwrap();

        let mut second = request("countess@example.com");
        second.username = Some("ada".to_string());
        let err = service.register(second).await.unwrap_err();
        assert!(matches!(err, AccountError::UsernameTaken));
    }

    fn racing_store(email_registered_meanwhile: bool) -> MockPrincipalStore {
        let mut store = MockPrincipalStore::new();
        let mut email_lookups = 0;
        store.expect_find_principal_by_email().returning(move |email| {
            email_lookups += 1;
            if email_registered_meanwhile && email_lookups > 1 {
                Ok(Some(Principal {
                    id: UserId::new(),
                    username: "winner".to_string(),
                    email: email.to_string(),
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    password_hash: "hash:salt".to_string(),
                }))
            } else {
                Ok(None)
            }
        });
        store
            .expect_find_principal_by_username()
            .returning(|_| Ok(None));
        store
            .expect_create_principal()
            .times(1)
            .returning(|_| Err(StoreError::Conflict("duplicate key".to_string())));
        store
    }

    #[rstest]
    #[case(false, "USERNAME_TAKEN")]
    #[case(true, "EMAIL_TAKEN")]
    #[tokio::test]
    async fn test_racing_registration_names_the_taken_field(
        #[case] email_registered_meanwhile: bool,
        #[case] code: &str,
    ) {
        let service = AccountService::new(Arc::new(racing_store(email_registered_meanwhile)));

        let err = service.register(request("ada@example.com")).await.unwrap_err();

        assert_eq!(err.error_code(), code);
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_unknown_principal_hash_is_well_formed() {
        assert!(!crate::auth::verify_password("anything", UNKNOWN_PRINCIPAL_HASH).unwrap());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = service();
        let registered = service.register(request("ada@example.com")).await.unwrap();

        let principal = service
            .authenticate(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "correct horse battery staple".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(principal.id, registered.id);

        let wrong = service
            .authenticate(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AccountError::InvalidCredentials)));

        let unknown = service
            .authenticate(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(unknown, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_search_excludes_requester() {
        let service = service();
        let ada = service.register(request("ada@example.com")).await.unwrap();
        let mut other = request("ada.byron@example.com");
        other.first_name = "Augusta".to_string();
        let augusta = service.register(other).await.unwrap();

        let found = service.search("ADA", ada.id, 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, augusta.id);

        assert!(service.search("   ", ada.id, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let result = service().find(UserId::new()).await;
        assert!(matches!(result, Err(AccountError::NotFound)));
    }
}
