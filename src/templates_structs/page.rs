use askama::Template;

use super::PageContext;

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub ctx: PageContext,
    pub title: String,
    /// CSS class of the page container.
    pub layout: String,
    pub body_html: String,
    pub denied: bool,
}
