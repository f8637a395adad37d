// crates/laptop-rpc/src/handlers/auth.rs
//
// Login handler: exchange a username and password for an access token.

use tonic::Status;

use laptop_auth::TokenManager;
use laptop_core::traits::UserStore;

use crate::proto::{LoginRequest, LoginResponse};
use crate::status::{log_status, status_from_error};

/// Handle a Login request.
///
/// Unknown users and wrong passwords get the same `NOT_FOUND` answer, so the
/// response does not reveal which usernames exist.
pub fn handle_login(
    users: &dyn UserStore,
    tokens: &TokenManager,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    let user = users
        .find(&request.username)
        .map_err(|e| status_from_error("cannot find user", &e))?;

    let user = match user {
        Some(user) if user.is_correct_password(&request.password) => user,
        _ => {
            return Err(log_status(Status::not_found(
                "incorrect username/password",
            )))
        }
    };

    let access_token = tokens
        .generate(&user)
        .map_err(|e| log_status(Status::internal(format!("cannot generate access token: {}", e))))?;

    tracing::info!(username = %user.username, role = %user.role, "User logged in");

    Ok(LoginResponse { access_token })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use laptop_core::User;
    use laptop_store::InMemoryUserStore;
    use tonic::Code;

    use super::*;

    fn setup() -> (InMemoryUserStore, TokenManager) {
        let users = InMemoryUserStore::new();
        users.save(&User::new("jay", "secret-jay", "admin")).unwrap();
        (users, TokenManager::new("secret", Duration::from_secs(60)))
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let (users, tokens) = setup();

        let response = handle_login(&users, &tokens, login("jay", "secret-jay")).unwrap();
        let claims = tokens.verify(&response.access_token).unwrap();

        assert_eq!(claims.username, "jay");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_login_wrong_password() {
        let (users, tokens) = setup();
        let status = handle_login(&users, &tokens, login("jay", "nope")).unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[test]
    fn test_login_unknown_user() {
        let (users, tokens) = setup();
        let status = handle_login(&users, &tokens, login("ghost", "secret-jay")).unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "incorrect username/password");
    }
}
