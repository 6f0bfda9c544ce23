//! Local sign-up and sign-in
//!
//! There is exactly one account per browser, stored under the session's
//! user key. Failures are returned as values whose `Display` text is shown
//! inline under the form.

use thiserror::Error;

use crate::nav::Route;
use crate::session::{Session, USER_KEY, User, load_user};
use crate::storage::KeyValueStore;

pub const USERNAME_MAX_CHARS: usize = 20;
pub const PASSWORD_MIN_CHARS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please fill all fields.")]
    MissingFields,
    #[error("Username must be at most 20 characters.")]
    UsernameTooLong,
    #[error("Password must be at least 4 characters.")]
    PasswordTooShort,
    #[error("No account found. Please sign up first.")]
    NoAccount,
    #[error("Email or password is incorrect.")]
    InvalidCredentials,
    #[error("Could not save your account. Please try again.")]
    StorageFailed,
}

/// Sign-up form fields
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Where to go after a successful sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRedirect {
    pub to: Route,
    /// Email to prefill on the sign-in form
    pub prefill_email: String,
    /// Page the user originally wanted, carried through sign-in
    pub from: Option<Route>,
}

/// Create (or replace) the local account
pub fn sign_up<S: KeyValueStore + ?Sized>(
    store: &mut S,
    form: &SignUpForm,
    from: Option<Route>,
) -> Result<SignUpRedirect, AuthError> {
    if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if form.username.chars().count() > USERNAME_MAX_CHARS {
        return Err(AuthError::UsernameTooLong);
    }
    if form.password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(AuthError::PasswordTooShort);
    }

    let user = User {
        username: form.username.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
    };
    let json = serde_json::to_string(&user).map_err(|e| {
        log::warn!("Failed to encode account: {}", e);
        AuthError::StorageFailed
    })?;
    store.set(USER_KEY, &json).map_err(|e| {
        log::warn!("Failed to store account: {}", e);
        AuthError::StorageFailed
    })?;

    log::info!("Account created for {}", user.username);
    Ok(SignUpRedirect {
        to: Route::SignIn,
        prefill_email: user.email,
        from,
    })
}

/// Check credentials against the stored account and log the user in.
/// Returns the page to land on.
pub fn sign_in<S: KeyValueStore>(
    session: &mut Session<S>,
    email: &str,
    password: &str,
    from: Option<Route>,
) -> Result<Route, AuthError> {
    let stored = load_user(session.store()).ok_or(AuthError::NoAccount)?;

    if stored.email != email || stored.password != password {
        return Err(AuthError::InvalidCredentials);
    }

    log::info!("Signed in as {}", stored.username);
    session.set_nickname(stored.username.clone());
    session.set_user(Some(stored));
    Ok(from.unwrap_or(Route::Home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn form() -> SignUpForm {
        SignUpForm {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_sign_in_without_account() {
        let mut session = Session::load(MemoryStore::new());
        let err = sign_in(&mut session, "ada@example.com", "hunter2", None).unwrap_err();
        assert_eq!(err, AuthError::NoAccount);
        assert_eq!(err.to_string(), "No account found. Please sign up first.");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let mut store = MemoryStore::new();
        let redirect = sign_up(&mut store, &form(), Some(Route::Memory)).expect("sign up");
        assert_eq!(redirect.to, Route::SignIn);
        assert_eq!(redirect.prefill_email, "ada@example.com");

        let mut session = Session::load(store);
        session.logout();
        sign_up(session.store_mut(), &form(), None).expect("sign up again");

        let landing =
            sign_in(&mut session, "ada@example.com", "hunter2", redirect.from).expect("sign in");
        assert_eq!(landing, Route::Memory);
        assert!(session.is_authenticated());
        assert_eq!(session.display_name(), "ada");
    }

    #[test]
    fn test_wrong_password() {
        let mut store = MemoryStore::new();
        sign_up(&mut store, &form(), None).expect("sign up");
        let mut session = Session::load(store);
        session.logout();
        sign_up(session.store_mut(), &form(), None).expect("sign up");

        let err = sign_in(&mut session, "ada@example.com", "nope", None).unwrap_err();
        assert_eq!(err.to_string(), "Email or password is incorrect.");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_sign_up_validation() {
        let mut store = MemoryStore::new();

        let mut missing = form();
        missing.email.clear();
        assert_eq!(
            sign_up(&mut store, &missing, None),
            Err(AuthError::MissingFields)
        );

        let mut long = form();
        long.username = "x".repeat(21);
        assert_eq!(sign_up(&mut store, &long, None), Err(AuthError::UsernameTooLong));

        let mut short = form();
        short.password = "abc".to_string();
        assert_eq!(
            sign_up(&mut store, &short, None),
            Err(AuthError::PasswordTooShort)
        );
        assert!(store.is_empty());
    }
}
