//! Home page component.

use gatehouse_identity::SessionData;
use leptos::prelude::*;

/// The home page component.
///
/// `pretty` is the session's token bag as indented JSON, or `null` when
/// nobody is logged in.
#[component]
pub fn HomePage(session: SessionData, pretty: String) -> impl IntoView {
    let content = match session.into_user() {
        Some(user) => {
            let greeting = user
                .display_name()
                .map(|name| format!("Welcome, {name}!"))
                .unwrap_or_else(|| "Welcome!".to_string());
            let signed_in_as = format!("Signed in as {}", user.user_id());

            view! {
                <div>
                    <h1>{greeting}</h1>
                    <p class="session-status">{signed_in_as}</p>
                    <nav>
                        <a href="/protected">"Protected page"</a>
                        " | "
                        <a href="/logout">"Log out"</a>
                    </nav>
                </div>
            }
            .into_any()
        }
        None => view! {
            <div>
                <h1>"gatehouse"</h1>
                <p class="session-status">"Session: none"</p>
                <a href="/login" class="cta-button">"Log in"</a>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="home-page">
            {content}
            <h2>"Session"</h2>
            <pre>{pretty}</pre>
        </div>
    }
}
