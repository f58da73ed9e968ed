//! Middleware de Rate Limiting
//!
//! Limita los intentos de login dentro de una ventana fija para frenar la
//! fuerza bruta sobre PINs y contraseñas. Cada intento cuenta en dos claves:
//! la dirección del cliente y la cuenta (RUT o email) que se intenta usar.

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Tope del body de login que se lee para obtener la cuenta
const MAX_LOGIN_BODY: usize = 16 * 1024;

/// Intentos de una clave en la ventana actual
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado compartido del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
    trust_proxy: bool,
}

impl RateLimitState {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let mut state =
            Self::with_limits(config.rate_limit_requests, Duration::from_secs(config.rate_limit_window));
        state.trust_proxy = config.trust_proxy;
        state
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
            trust_proxy: false,
        }
    }

    /// Registrar un intento y verificar si la clave excedió el límite
    pub async fn check_rate_limit(&self, key: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(key.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

/// IP del cliente
///
/// `x-forwarded-for` lo controla el cliente, así que solo se usa con
/// `TRUST_PROXY`; si no, vale la dirección del socket.
fn client_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "sin-direccion".to_string())
}

/// Cuenta del intento de login (RUT o email), normalizada
fn cuenta_login(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let raw = value
        .get("rut")
        .or_else(|| value.get("email"))?
        .as_str()?;

    // "76.086.428-5" y "760864285" son la misma cuenta
    let cuenta: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .collect::<String>()
        .to_lowercase();

    Some(cuenta).filter(|c| !c.is_empty())
}

/// Middleware de rate limiting para endpoints de login
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();
    let ip = client_ip(&request, state.rate_limit.trust_proxy);

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_LOGIN_BODY)
        .await
        .map_err(|_| AppError::PayloadTooLarge("El body de login es demasiado grande".to_string()))?;

    let mut claves = vec![format!("ip:{}:{}", ip, path)];
    if let Some(cuenta) = cuenta_login(&bytes) {
        claves.push(format!("cuenta:{}:{}", cuenta, path));
    }

    for clave in &claves {
        if let Err(e) = state.rate_limit.check_rate_limit(clave).await {
            tracing::warn!(key = %clave, "🚫 rate limit de login excedido");
            return Err(e);
        }
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_desde(addr: [u8; 4], forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/staff/login");
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((addr, 40000))));
        request
    }

    #[tokio::test]
    async fn test_bloquea_despues_del_maximo() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(matches!(
            state.check_rate_limit("1.2.3.4").await,
            Err(AppError::RateLimitExceeded)
        ));
    }

    #[tokio::test]
    async fn test_claves_independientes() {
        let state = RateLimitState::with_limits(1, Duration::from_secs(60));
        assert!(state.check_rate_limit("a").await.is_ok());
        assert!(state.check_rate_limit("b").await.is_ok());
        assert!(state.check_rate_limit("a").await.is_err());
    }

    #[tokio::test]
    async fn test_ventana_expirada_reinicia() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));
        assert!(state.check_rate_limit("a").await.is_ok());
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(state.check_rate_limit("a").await.is_ok());
    }

    #[test]
    fn test_forwarded_ignorado_sin_proxy_confiable() {
        let request = request_desde([192, 168, 1, 20], Some("10.9.9.9"));
        assert_eq!(client_ip(&request, false), "192.168.1.20");
        assert_eq!(client_ip(&request, true), "10.9.9.9");
    }

    #[test]
    fn test_proxy_confiable_sin_header_usa_socket() {
        let request = request_desde([192, 168, 1, 20], None);
        assert_eq!(client_ip(&request, true), "192.168.1.20");
    }

    #[test]
    fn test_cuenta_login_normaliza_rut_y_email() {
        assert_eq!(
            cuenta_login(br#"{"rut": "76.086.428-5", "pin": "1234"}"#).as_deref(),
            Some("760864285")
        );
        assert_eq!(
            cuenta_login(br#"{"rut": "760864285", "pin": "12"}"#).as_deref(),
            Some("760864285")
        );
        assert_eq!(
            cuenta_login(br#"{"email": " Admin@Petran.CL ", "password": "x"}"#).as_deref(),
            Some("admin@petrancl")
        );
        assert_eq!(cuenta_login(b"no es json"), None);
        assert_eq!(cuenta_login(br#"{"rut": " "}"#), None);
    }
}
