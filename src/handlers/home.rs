use axum::{
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};

use crate::middleware::session::SessionContext;

/// GET / - home view, gated by session state. Anonymous visitors are
/// redirected into the login flow.
pub async fn home(Extension(session): Extension<SessionContext>) -> Response {
    match session.user {
        Some(user) => Html(render(&user.name)).into_response(),
        None => Redirect::temporary("/auth/login").into_response(),
    }
}

fn render(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Library Catalog</title>
</head>
<body>
  <h1>Library Catalog</h1>
  <p>Signed in as {}</p>
  <ul>
    <li><a href="/books">Books API</a></li>
    <li><a href="/authors">Authors API</a></li>
    <li><a href="/api-docs">API documentation</a></li>
    <li><a href="/auth/logout">Sign out</a></li>
  </ul>
</body>
</html>
"#,
        escape(name)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
