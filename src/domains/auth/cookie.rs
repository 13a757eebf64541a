// Refresh Token cookie 처리
// Building, clearing and reading the HttpOnly refresh cookie
use axum::http::{header::COOKIE, HeaderMap};

/// Refresh Token cookie 이름
pub const REFRESH_COOKIE_NAME: &str = "jwt";

/// Refresh Token을 담는 Set-Cookie 값
/// HttpOnly, SameSite=Strict, 운영 환경에서는 Secure
pub fn refresh_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{REFRESH_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// cookie 삭제용 Set-Cookie 값 (같은 속성 + Max-Age=0)
pub fn clear_refresh_cookie(secure: bool) -> String {
    refresh_cookie("", 0, secure)
}

/// 요청의 Cookie 헤더에서 값 추출 (빈 값은 없는 것으로 처리)
pub fn extract_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim() == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
