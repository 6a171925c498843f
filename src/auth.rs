//! Token gate for the admin scope. The token arrives once as a `?token=`
//! query parameter and is then carried by the `admin_session` cookie, the
//! same scheme the public site links use.

use actix_web::{
    body::BoxBody,
    cookie::{time::Duration, Cookie, SameSite},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpResponse,
};
use serde_json::json;

use crate::state::AppState;

const SESSION_COOKIE: &str = "admin_session";

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(30))
        .finish()
}

fn query_token(req: &ServiceRequest) -> Option<String> {
    req.query_string().split('&').find_map(|pair| {
        pair.strip_prefix("token=")
            .map(|value| value.to_string())
    })
}

fn unauthorized(req: ServiceRequest) -> ServiceResponse<BoxBody> {
    let response = HttpResponse::Unauthorized().json(json!({
        "success": false,
        "error": "Unauthorized",
    }));
    req.into_response(response)
}

pub async fn admin_gate<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: actix_web::body::MessageBody + 'static,
{
    let token = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.admin_token.clone())
        .unwrap_or_default();
    if token.trim().is_empty() {
        return Ok(unauthorized(req));
    }

    if query_token(&req).as_deref() == Some(token.as_str()) {
        let mut res = next.call(req).await?.map_into_boxed_body();
        res.response_mut().add_cookie(&session_cookie(&token))?;
        return Ok(res);
    }

    let cookie_matches = req
        .request()
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value() == token)
        .unwrap_or(false);
    if cookie_matches {
        return Ok(next.call(req).await?.map_into_boxed_body());
    }

    Ok(unauthorized(req))
}
