// 비밀번호 정책 및 해싱
// Password strength policy, argon2 hashing and verification
use crate::shared::errors::AuthError;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use std::sync::OnceLock;

const MIN_PASSWORD_LENGTH: usize = 8;

// 존재하지 않는 사용자용 고정 해시의 원문
const DUMMY_PASSWORD: &str = "unknown-user-placeholder";

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// 비밀번호 강도 검사
/// At least 8 characters, an uppercase letter, a digit and a symbol outside [A-Za-z0-9]
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// 비밀번호 검증. 불일치 시 InvalidCredentials
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// 존재하지 않는 이메일에도 argon2 검증 1회 수행 (응답 시간으로 계정 존재 여부 노출 방지)
/// Always rejects, after paying the same verification cost as a real account.
pub fn verify_unknown_user(password: &str) -> AuthError {
    if let Some(hash) = DUMMY_HASH.get_or_init(|| hash_password(DUMMY_PASSWORD).ok()) {
        let _ = verify_password(password, hash);
    }
    AuthError::InvalidCredentials
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(is_strong_password("Abcd123!"));
        assert!(is_strong_password("Zz9 zzzz"));

        assert!(!is_strong_password("Abc123!"), "too short");
        assert!(!is_strong_password("abcd123!"), "no uppercase");
        assert!(!is_strong_password("Abcdefg!"), "no digit");
        assert!(!is_strong_password("Abcd1234"), "no symbol");
        assert!(!is_strong_password(""));
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("Abcd123!").unwrap();

        assert_ne!(hash, "Abcd123!");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Abcd123!", &hash).is_ok());
        assert!(matches!(
            verify_password("Abcd123?", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("Abcd123!").unwrap();
        let second = hash_password("Abcd123!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_corrupt_hash_is_internal_error() {
        assert!(matches!(
            verify_password("Abcd123!", "not-a-phc-string"),
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn test_unknown_user_always_rejected() {
        assert!(matches!(verify_unknown_user("Abcd123!"), AuthError::InvalidCredentials));
        assert!(matches!(verify_unknown_user(DUMMY_PASSWORD), AuthError::InvalidCredentials));
        // 고정 해시 생성 완료
        assert!(DUMMY_HASH.get().is_some_and(|hash| hash.is_some()));
    }
}
