//! Visitor identity resolution.

use axum_extra::extract::cookie::CookieJar;
use storygate_core::SessionToken;
use storygate_store::{SessionRow, StoreError};
use tracing::info;

use crate::cookies::{VISITOR_COOKIE, visitor_cookie};
use crate::state::AppState;

/// Find the caller's session, issuing a token and cookie on first contact.
///
/// The returned jar carries the new cookie when one was issued.
pub async fn resolve_session(
    state: &AppState,
    jar: CookieJar,
) -> Result<(CookieJar, SessionRow), StoreError> {
    let presented = jar
        .get(VISITOR_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty());
    let issued = presented.is_none();
    let token = presented.map_or_else(SessionToken::new, SessionToken::from_string);

    let lookup = token.clone();
    let session = state
        .with_store(move |store| store.get_or_create_session(&lookup))
        .await?;

    if issued {
        info!(session_id = %session.id, "issued visitor session");
        let cookie = visitor_cookie(&token, &state.settings.cookies);
        return Ok((jar.add(cookie), session));
    }
    Ok((jar, session))
}
