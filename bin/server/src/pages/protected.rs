//! Protected page component.

use gatehouse_identity::TokenBag;
use leptos::prelude::*;

/// Page only reachable with a logged-in session.
#[component]
pub fn ProtectedPage(user: TokenBag, pretty: String) -> impl IntoView {
    let user_id = user.user_id().to_string();
    let email = user.email().to_string();

    view! {
        <div class="protected-page">
            <h1>"Protected"</h1>
            <dl>
                <dt>"User ID"</dt>
                <dd>{user_id}</dd>
                <dt>"Email"</dt>
                <dd>{email}</dd>
            </dl>
            <h2>"Token bag"</h2>
            <pre>{pretty}</pre>
            <nav>
                <a href="/">"Home"</a>
                " | "
                <a href="/logout">"Log out"</a>
            </nav>
        </div>
    }
}
