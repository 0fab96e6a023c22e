//! Page handlers, rendered server-side with Leptos.

pub mod home;
pub mod protected;

use axum::{extract::OriginalUri, response::Html};
use chrono::Utc;
use gatehouse_identity::{AuditEvent, SessionData};
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::auth::{CurrentSession, RequireUser};
use crate::error::PageError;
use home::HomePage;
use protected::ProtectedPage;

/// Public home page showing the current session, if any.
pub async fn home(CurrentSession(session): CurrentSession) -> Result<Html<String>, PageError> {
    let pretty = session.pretty_user().map_err(PageError::Session)?;

    Ok(render_document("Home", move || view! { <HomePage session=session pretty=pretty/> }))
}

/// Protected page showing the full token bag of the logged-in user.
///
/// Mounted behind [`require_auth`](crate::auth::require_auth).
pub async fn protected(
    RequireUser(user): RequireUser,
    OriginalUri(uri): OriginalUri,
) -> Result<Html<String>, PageError> {
    AuditEvent::AccessProtected {
        user_id: user.user_id(),
        timestamp: Utc::now(),
        path: uri.path(),
    }
    .emit();

    let pretty = SessionData::authenticated(user.clone())
        .pretty_user()
        .map_err(PageError::Session)?;

    Ok(render_document("Protected", move || {
        view! { <ProtectedPage user=user pretty=pretty/> }
    }))
}

/// Renders a page body into a complete HTML document.
fn render_document<F, V>(title: &str, page: F) -> Html<String>
where
    F: FnOnce() -> V,
    V: RenderHtml,
{
    let owner = Owner::new();
    let body = owner.with(|| page().to_html());

    Html(format!(
        "<!DOCTYPE html>\
         <html lang=\"en\">\
         <head>\
         <meta charset=\"utf-8\"/>\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\
         <title>{title} | gatehouse</title>\
         </head>\
         <body>{body}</body>\
         </html>"
    ))
}
