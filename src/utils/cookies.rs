//! Lectura y escritura de cookies de sesión
//!
//! Parsing mínimo del header `Cookie` y construcción de `Set-Cookie`
//! para las cookies HTTP-only de sesión.

use http::{header, HeaderMap, HeaderValue};

/// Obtener el valor de una cookie por nombre
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// Construir un `Set-Cookie` de sesión
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    // nombre y valor son ASCII (nombres fijos y JWT base64url)
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Construir un `Set-Cookie` que expira la cookie
pub fn expired_cookie(name: &str, secure: bool) -> HeaderValue {
    session_cookie(name, "", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie_among_many() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; petran_staff=abc.def.ghi; other=1"),
        );
        assert_eq!(get_cookie(&headers, "petran_staff"), Some("abc.def.ghi"));
        assert_eq!(get_cookie(&headers, "petran_cliente"), None);
    }

    #[test]
    fn test_get_cookie_across_headers_and_empty_values() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("petran_cliente="));
        headers.append(header::COOKIE, HeaderValue::from_static("petran_admin=tok"));
        assert_eq!(get_cookie(&headers, "petran_cliente"), None);
        assert_eq!(get_cookie(&headers, "petran_admin"), Some("tok"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("petran_staff", "tok", 3600, true);
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("petran_staff=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_expired_cookie() {
        let cookie = expired_cookie("petran_cliente", false);
        assert_eq!(
            cookie.to_str().unwrap(),
            "petran_cliente=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }
}
