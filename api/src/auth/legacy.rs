//! Legacy email/password authentication
//!
//! Carries the authentication scheme of the system this API replaced:
//! users are looked up by email among active accounts and the password is
//! compared as an unsalted MD5 hex digest. The error messages are part of
//! the contract with existing clients and must not be reworded.

use md5::{Digest, Md5};
use serde::Serialize;

use crate::app::rows::{int, text};
use crate::domain::ports::ReportGateway;
use crate::error::AuthError;

/// The signed-in user, shaped for the legacy login response.
#[derive(Debug, Clone, Serialize)]
pub struct UserIdentity {
    pub userid: i64,
    pub loccode: String,
    pub username: String,
    pub roleid: i64,
}

/// Unsalted MD5 hex digest of a password.
pub fn legacy_digest(password: &str) -> String {
    hex::encode(Md5::digest(password.as_bytes()))
}

/// Verify an email/password pair against the `users` table.
pub async fn authenticate<G: ReportGateway + ?Sized>(
    gateway: &G,
    email: &str,
    password: &str,
) -> Result<UserIdentity, AuthError> {
    let sql = "\
        SELECT u.id AS userid, u.password, u.loccode, u.username, \
               u.type AS roleid \
        FROM users u \
        WHERE u.email = ? AND u.active = '1'";
    let user = gateway
        .fetch_one(sql, vec![email.into()])
        .await?
        .ok_or(AuthError::InvalidEmail)?;

    if password.len() < 4 {
        return Err(AuthError::PasswordTooShort);
    }
    if legacy_digest(password) != text(&user, "password") {
        return Err(AuthError::InvalidPassword);
    }

    Ok(UserIdentity {
        userid: int(&user, "userid"),
        loccode: text(&user, "loccode"),
        username: text(&user, "username"),
        roleid: int(&user, "roleid"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::BindValue;
    use crate::test_utils::{user_row, InMemoryGateway};

    #[test]
    fn digest_matches_known_md5_vector() {
        assert_eq!(legacy_digest("password"), "5f4dcc3b5aa765d61d8327deb882cf99");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_before_password_checks() {
        let gateway = InMemoryGateway::new();

        let err = authenticate(&gateway, "nobody@example.com", "password")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidEmail));
        let (sql, binds) = gateway.calls().remove(0);
        assert!(sql.contains("u.active = '1'"));
        assert_eq!(binds, vec![BindValue::from("nobody@example.com")]);
    }

    #[tokio::test]
    async fn short_password_gets_the_legacy_message() {
        let gateway = InMemoryGateway::new()
            .with_rows(vec![user_row("clerk@example.com", &legacy_digest("abc"))]);

        let err = authenticate(&gateway, "clerk@example.com", "abc")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::PasswordTooShort));
        assert_eq!(
            err.to_string(),
            "Your password must be at least 4 characters long!"
        );
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_password() {
        let gateway = InMemoryGateway::new().with_rows(vec![user_row(
            "clerk@example.com",
            &legacy_digest("correct-horse"),
        )]);

        let err = authenticate(&gateway, "clerk@example.com", "wrong-horse")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidPassword));
    }

    #[tokio::test]
    async fn matching_digest_yields_the_user_identity() {
        let gateway = InMemoryGateway::new().with_rows(vec![user_row(
            "clerk@example.com",
            &legacy_digest("correct-horse"),
        )]);

        let user = authenticate(&gateway, "clerk@example.com", "correct-horse")
            .await
            .unwrap();

        assert_eq!(user.userid, 7);
        assert_eq!(user.loccode, "HQ");
        assert_eq!(user.username, "clerk");
        assert_eq!(user.roleid, 3);
    }
}
