//! The session cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use journal_auth::{IssuedSession, SESSION_COOKIE};

/// The session token presented with a request, if any.
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(Cookie::value)
}

/// Add the cookie for a freshly issued session.
pub fn set_session(jar: CookieJar, session: &IssuedSession, secure: bool) -> CookieJar {
    let max_age = time::Duration::seconds(session.max_age.num_seconds());
    let cookie = Cookie::build((SESSION_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age);
    jar.add(cookie)
}

/// Replace the session cookie with an expired removal cookie.
pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
