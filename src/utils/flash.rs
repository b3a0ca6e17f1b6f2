//! One-shot message carried across the post/redirect/get cycle in a cookie.
//!
//! The text is hex-encoded so names with `;`, `,` or `%` survive any cookie
//! encoding layer unchanged.

use actix_web::HttpRequest;
use actix_web::cookie::Cookie;

pub const FLASH_COOKIE: &str = "flash";

pub fn set(message: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, encode(message));
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie
}

/// Pending message, if the request carries a readable one.
pub fn take(req: &HttpRequest) -> Option<String> {
    req.cookie(FLASH_COOKIE).and_then(|c| decode(c.value()))
}

pub fn clear() -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

fn encode(message: &str) -> String {
    hex::encode(message)
}

fn decode(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    hex::decode(raw).ok().and_then(|bytes| String::from_utf8(bytes).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_cookie_hostile_text() {
        let msg = "O'Neil; 100% \"clocked\", in.";
        let cookie = set(msg);
        assert!(cookie.value().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(decode(cookie.value()).as_deref(), Some(msg));
    }

    #[test]
    fn garbage_is_ignored() {
        assert_eq!(decode("zz"), None);
        assert_eq!(decode("abc"), None);
        assert_eq!(decode(""), None);
        // valid hex, invalid UTF-8
        assert_eq!(decode("ff"), None);
    }
}
