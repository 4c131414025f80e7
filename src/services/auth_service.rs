//! Authentication service - registration, login and JWT issuance.
//!
//! Password hashing lives in the domain Password value object; this
//! service owns token minting and verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{is_valid_role, Config, ROLE_USER, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{CreateUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, input: CreateUser) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Verify JWT token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: CreateUser) -> AppResult<User> {
        // Email format is validated by the handler's ValidatedJson extractor
        let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
        if !is_valid_role(&role) {
            return Err(AppError::validation(format!("Invalid role: {role}")));
        }

        if self.uow.users().find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(input.email, password_hash, input.name, role)
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.uow.users().find_by_email(&email).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid emails.
        // We use a dummy hash that will always fail verification.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since we verified user_exists is true
        generate_token(user_result.as_ref().unwrap(), &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockConcertRepository, MockReservationRepository, MockTransactionRepository,
        MockUserRepository,
    };
    use crate::services::test_support::{user, MockUow};

    fn uow_with_users(users: MockUserRepository) -> Arc<MockUow> {
        Arc::new(MockUow::new(
            users,
            MockConcertRepository::new(),
            MockReservationRepository::new(),
            MockTransactionRepository::new(),
        ))
    }

    fn test_config() -> Config {
        Config::with_secret("test-secret-that-is-long-enough-0123456789")
    }

    fn register_input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: "correct horse battery".to_string(),
            name: "Test User".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn register_defaults_role_to_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|_, hash, _, role| role.as_str() == "user" && hash.starts_with("$argon2"))
            .returning(|email, password_hash, name, role| {
                let mut u = user(Uuid::new_v4());
                u.email = email;
                u.password_hash = password_hash;
                u.name = name;
                u.role = crate::domain::UserRole::from(role.as_str());
                Ok(u)
            });

        let service = Authenticator::new(uow_with_users(users), test_config());
        let created = service.register(register_input("a@b.com")).await.unwrap();
        assert_eq!(created.email, "a@b.com");
        assert!(!created.role.is_admin());
    }

    #[tokio::test]
    async fn register_duplicate_email_rejected() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(Uuid::new_v4()))));

        let service = Authenticator::new(uow_with_users(users), test_config());
        let err = service.register(register_input("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let service = Authenticator::new(uow_with_users(MockUserRepository::new()), test_config());
        let mut input = register_input("a@b.com");
        input.role = Some("root".to_string());
        let err = service.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn login_roundtrips_claims_through_verify() {
        let password = "correct horse battery";
        let hash = Password::new(password).unwrap().into_string();

        let mut users = MockUserRepository::new();
        let id = Uuid::new_v4();
        users.expect_find_by_email().returning(move |email| {
            let mut u = user(id);
            u.email = email.to_string();
            u.password_hash = hash.clone();
            Ok(Some(u))
        });

        let service = Authenticator::new(uow_with_users(users), test_config());
        let token = service
            .login("a@b.com".to_string(), password.to_string())
            .await
            .unwrap();
        assert_eq!(token.token_type, TOKEN_TYPE_BEARER);

        let claims = service.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@b.com");
    }

    #[tokio::test]
    async fn login_wrong_password_rejected() {
        let hash = Password::new("the real password").unwrap().into_string();

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| {
            let mut u = user(Uuid::new_v4());
            u.password_hash = hash.clone();
            Ok(Some(u))
        });

        let service = Authenticator::new(uow_with_users(users), test_config());
        let err = service
            .login("a@b.com".to_string(), "wrong".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_unknown_email_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let service = Authenticator::new(uow_with_users(users), test_config());
        let err = service
            .login("nobody@b.com".to_string(), "whatever".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn verify_rejects_garbage_token() {
        let service = Authenticator::new(uow_with_users(MockUserRepository::new()), test_config());
        assert!(service.verify_token("not-a-jwt").is_err());
    }
}
