use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use tessera_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        ensure_same_origin(request.headers(), &state.frontend_url)?;
    }

    Ok(next.run(request).await)
}

fn ensure_same_origin(headers: &HeaderMap, allowed_origin: &str) -> Result<(), AppError> {
    if headers.get("sec-fetch-site") == Some(&HeaderValue::from_static("cross-site")) {
        return Err(AppError::Unauthorized("cross-site request blocked".to_owned()));
    }

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if origin != allowed_origin && !referer.starts_with(allowed_origin) {
        return Err(AppError::Unauthorized("origin validation failed".to_owned()));
    }

    Ok(())
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, Method, header};
    use tessera_core::AppError;

    use super::{ensure_same_origin, is_state_changing_method};

    const FRONTEND: &str = "http://localhost:3000";

    #[test]
    fn only_mutating_methods_are_checked() {
        assert!(is_state_changing_method(&Method::DELETE));
        assert!(is_state_changing_method(&Method::PUT));
        assert!(!is_state_changing_method(&Method::GET));
        assert!(!is_state_changing_method(&Method::OPTIONS));
    }

    #[test]
    fn matching_origin_or_referer_is_accepted() {
        let mut by_origin = HeaderMap::new();
        by_origin.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        let mut by_referer = HeaderMap::new();
        by_referer.insert(
            header::REFERER,
            HeaderValue::from_static("http://localhost:3000/admin/permissions"),
        );

        assert!(ensure_same_origin(&by_origin, FRONTEND).is_ok());
        assert!(ensure_same_origin(&by_referer, FRONTEND).is_ok());
    }

    #[test]
    fn cross_site_and_foreign_origins_are_rejected() {
        let mut cross_site = HeaderMap::new();
        cross_site.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        cross_site.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));
        let mut foreign = HeaderMap::new();
        foreign.insert(header::ORIGIN, HeaderValue::from_static("https://evil.test"));

        assert!(matches!(
            ensure_same_origin(&cross_site, FRONTEND),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            ensure_same_origin(&foreign, FRONTEND),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            ensure_same_origin(&HeaderMap::new(), FRONTEND),
            Err(AppError::Unauthorized(_))
        ));
    }
}
