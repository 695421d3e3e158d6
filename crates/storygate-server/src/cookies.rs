//! Visitor and admin cookies.

use axum_extra::extract::cookie::{Cookie, SameSite};
use storygate_core::SessionToken;
use storygate_settings::CookieSettings;
use time::Duration;

/// Carries the visitor's session token.
pub const VISITOR_COOKIE: &str = "story_session";

/// Carries the admin shared secret.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Path the admin cookie is scoped to.
pub fn admin_cookie_path(base_path: &str) -> String {
    format!("{base_path}/api/admin")
}

/// Long-lived, site-wide visitor identity cookie.
pub fn visitor_cookie(token: &SessionToken, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build((VISITOR_COOKIE, token.as_str().to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .path("/")
        .max_age(Duration::seconds(settings.visitor_max_age_secs))
        .build()
}

/// Admin capability cookie holding the shared secret itself.
pub fn admin_cookie(password: &str, base_path: &str, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, password.to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .path(admin_cookie_path(base_path))
        .max_age(Duration::seconds(settings.admin_max_age_secs))
        .build()
}

/// Expired admin cookie that clears the browser's copy.
pub fn admin_removal_cookie(base_path: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build((ADMIN_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(admin_cookie_path(base_path))
        .build();
    cookie.make_removal();
    cookie
}
