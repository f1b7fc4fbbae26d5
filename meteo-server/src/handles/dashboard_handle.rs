use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::configs::{Dashboard, LedControl};

const PAGE: &str = include_str!("../../assets/dashboard.html");

#[derive(Clone)]
pub struct PageState {
    pub page: Arc<String>,
}

impl PageState {
    pub fn new(settings: &Dashboard) -> Self {
        Self {
            page: Arc::new(render_page(settings)),
        }
    }
}

pub async fn get_dashboard(State(state): State<PageState>) -> Html<String> {
    Html(state.page.as_ref().clone())
}

/// Fills the presentation parameters into the page template.
pub fn render_page(settings: &Dashboard) -> String {
    let control = match settings.led_control {
        LedControl::Toggle => "toggle",
        LedControl::Checkbox => "checkbox",
    };

    PAGE.replace("{{title}}", &html_escape(&settings.title))
        .replace("{{led_control}}", control)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
