//! 认证服务

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use rand_core::OsRng;

use common::errors::{AppError, AppResult};
use common::models::user::USERS;
use common::models::{LoginRequest, RegisterRequest, UserDocument, UserProfile};

use super::{is_duplicate_key, now_rfc3339};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Account registration and credential checks.
pub struct AuthService {
    users: Collection<UserDocument>,
}

impl AuthService {
    pub fn new(db: Database) -> Self {
        Self {
            users: db.collection(USERS),
        }
    }

    /// Creates an account. The email is stored lower-cased and must be unique.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserProfile> {
        let email = normalize_email(&req.email);
        let existing = self.users.find_one(doc! { "email": email.as_str() }).await?;
        ensure_email_available(existing.as_ref())?;

        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        let mut user = UserDocument {
            id: None,
            name: req.name.trim().to_string(),
            email,
            password_hash,
            bio: String::new(),
            skills: Vec::new(),
            github: None,
            linkedin: None,
            created_at: now_rfc3339(),
            updated_at: None,
        };

        let result = self.users.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict("email already registered".into())
            } else {
                AppError::from(e)
            }
        })?;
        user.id = result.inserted_id.as_object_id();

        tracing::info!(email = %user.email, "用户已注册");
        Ok(UserProfile::from(user))
    }

    /// Checks credentials. Unknown email and wrong password are reported
    /// identically.
    pub async fn login(&self, req: LoginRequest) -> AppResult<UserProfile> {
        let email = normalize_email(&req.email);
        let user = self.users.find_one(doc! { "email": email.as_str() }).await?;

        let password = req.password;
        let result = tokio::task::spawn_blocking(move || check_credentials(user, &password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if result.is_err() {
            tracing::warn!(email = %email, "登录失败");
        }
        result.map(UserProfile::from)
    }
}

/// Rejects a registration whose email already belongs to `existing`.
pub(crate) fn ensure_email_available(existing: Option<&UserDocument>) -> AppResult<()> {
    match existing {
        Some(_) => Err(AppError::Conflict("email already registered".into())),
        None => Ok(()),
    }
}

/// Returns the account when `password` matches it. A missing account and a
/// wrong password produce the same error.
pub(crate) fn check_credentials(user: Option<UserDocument>, password: &str) -> AppResult<UserDocument> {
    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashes a password with Argon2 and a random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a password against a stored hash. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("same-password").unwrap(),
            hash_password("same-password").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    fn account(password: &str) -> UserDocument {
        UserDocument {
            id: Some(mongodb::bson::oid::ObjectId::new()),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: hash_password(password).unwrap(),
            bio: String::new(),
            skills: Vec::new(),
            github: None,
            linkedin: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        assert!(ensure_email_available(None).is_ok());

        let err = ensure_email_available(Some(&account("hunter222"))).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_unknown_email_and_wrong_password_look_the_same() {
        let unknown = check_credentials(None, "hunter222").unwrap_err();
        let wrong = check_credentials(Some(account("hunter222")), "hunter333").unwrap_err();

        assert_eq!(unknown.status_code(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status_code(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.code(), wrong.code());
    }

    #[test]
    fn test_correct_password_returns_account() {
        let user = check_credentials(Some(account("hunter222")), "hunter222").unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
