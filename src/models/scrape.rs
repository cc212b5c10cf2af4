use serde::{Deserialize, Serialize};

pub const MAX_LINKS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub title: String,
    pub url: String,
    pub text_content: String,
    pub screenshot: Option<String>,
    #[serde(default)]
    pub links: Vec<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}
