//! Plain HTML pages: a landing page, the analytics trigger and the campaign form.

use crate::app::pipelines::CampaignRequest;
use crate::app::runner::{run_analytics, run_campaign};
use crate::core::RenderedChart;
use crate::utils::error::Result;
use crate::web::state::SharedState;
use axum::{extract::State, response::Html, Form};
use serde::Deserialize;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

#[derive(Debug, Default, Deserialize)]
pub struct CampaignForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub campaign_url: String,
}

impl From<CampaignForm> for CampaignRequest {
    fn from(form: CampaignForm) -> Self {
        CampaignRequest {
            email: form.email.trim().to_string(),
            password: form.password,
            campaign_url: form.campaign_url.trim().to_string(),
        }
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <script src="{cdn}"></script>
</head>
<body>
    <p><a href="/">Home</a></p>
    <h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape_html(title),
        cdn = PLOTLY_CDN,
        body = body,
    ))
}

/// The chart div on success, the error text in its place otherwise.
fn outcome(result: Result<RenderedChart>) -> String {
    match result {
        Ok(chart) => format!(r#"<div id="output">{}</div>"#, chart.inline_html),
        Err(e) => {
            tracing::error!("❌ Dashboard run failed: {}", e);
            format!(
                r#"<div id="output"><pre>{}</pre></div>"#,
                escape_html(&e.user_friendly_message())
            )
        }
    }
}

fn analytics_form() -> &'static str {
    r#"    <form method="post" action="/analytics">
        <button type="submit">Load Data</button>
    </form>"#
}

fn campaign_form(email: &str, campaign_url: &str) -> String {
    format!(
        r#"    <form method="post" action="/campaign">
        <p><label>Email <input type="email" name="email" value="{}"></label></p>
        <p><label>Password <input type="password" name="password"></label></p>
        <p><label>Campaign URL <input type="url" name="campaign_url" value="{}" size="80"></label></p>
        <button type="submit">Submit</button>
    </form>"#,
        escape_html(email),
        escape_html(campaign_url)
    )
}

pub async fn index() -> Html<String> {
    page(
        "Dashboard",
        r#"    <p><a href="/analytics"><button type="button">Google Analytics</button></a></p>
    <p><a href="/campaign"><button type="button">Campaign Report</button></a></p>"#,
    )
}

pub async fn analytics_page() -> Html<String> {
    page("Google Analytics Data", analytics_form())
}

pub async fn analytics_submit(State(state): State<SharedState>) -> Html<String> {
    let result = run_analytics(&state.config, state.monitor).await;
    page(
        "Google Analytics Data",
        &format!("{}\n{}", analytics_form(), outcome(result)),
    )
}

pub async fn campaign_page(State(state): State<SharedState>) -> Html<String> {
    let email = state.config.campaign.email.as_deref().unwrap_or_default();
    page("Campaign Data", &campaign_form(email, ""))
}

pub async fn campaign_submit(
    State(state): State<SharedState>,
    Form(form): Form<CampaignForm>,
) -> Html<String> {
    let request = CampaignRequest::from(form);
    let form_html = campaign_form(&request.email, &request.campaign_url);

    let result = {
        let _walk = state.scrape_lock.lock().await;
        run_campaign(&state.config, request, state.monitor).await
    };

    page("Campaign Data", &format!("{}\n{}", form_html, outcome(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_form_values_are_trimmed() {
        let request = CampaignRequest::from(CampaignForm {
            email: " ops@example.com ".to_string(),
            password: " pw ".to_string(),
            campaign_url: " https://example.com/c/1 ".to_string(),
        });

        assert_eq!(request.email, "ops@example.com");
        assert_eq!(request.password, " pw ");
        assert_eq!(request.campaign_url, "https://example.com/c/1");
    }

    #[test]
    fn test_campaign_form_escapes_echoed_values() {
        let html = campaign_form("a\"b", "https://x/?q=<y>");
        assert!(html.contains("a&quot;b"));
        assert!(html.contains("q=&lt;y&gt;"));
    }
}
