use askama::Template;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub next: String,
}

/// Body of the redirect sent to signed-out visitors, shown if the redirect is not followed.
#[derive(Template)]
#[template(path = "login_prompt.html")]
pub struct LoginPromptTemplate {
    pub app_name: String,
    pub login_path: String,
}

/// Shown while the session is unresolved: neither the form nor a redirect.
#[derive(Template)]
#[template(path = "pending.html")]
pub struct PendingTemplate {
    pub app_name: String,
}
