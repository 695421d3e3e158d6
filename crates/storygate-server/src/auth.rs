//! Admin capability check: the admin cookie must equal the configured secret.

use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::cookies::ADMIN_COOKIE;
use crate::errors::ApiError;
use crate::state::AppState;

/// Whether `jar` holds the admin secret.
pub fn is_admin(jar: &CookieJar, password: &str) -> bool {
    jar.get(ADMIN_COOKIE)
        .is_some_and(|cookie| cookie.value() == password)
}

/// Reject the request with 401 unless the caller is admin.
pub fn require_admin(state: &AppState, jar: &CookieJar) -> Result<(), ApiError> {
    if is_admin(jar, &state.settings.admin.password) {
        Ok(())
    } else {
        warn!("rejected admin request");
        Err(ApiError::Unauthorized("Unauthorized".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Cookie;

    use super::*;

    #[test]
    fn missing_cookie_is_not_admin() {
        assert!(!is_admin(&CookieJar::new(), "changeme"));
    }

    #[test]
    fn matching_cookie_is_admin() {
        let jar = CookieJar::new().add(Cookie::new(ADMIN_COOKIE, "changeme"));
        assert!(is_admin(&jar, "changeme"));
    }

    #[test]
    fn wrong_value_is_not_admin() {
        let jar = CookieJar::new().add(Cookie::new(ADMIN_COOKIE, "guess"));
        assert!(!is_admin(&jar, "changeme"));
    }
}
