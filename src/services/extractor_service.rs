use regex::Regex;
use std::sync::OnceLock;

use crate::models::scrape::{PageLink, ScrapedPage, MAX_LINKS};
use crate::utils::text::collapse_whitespace;

struct Patterns {
    script: Regex,
    style: Regex,
    anchor: Regex,
    tag: Regex,
    comment: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        script: Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script regex"),
        style: Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style regex"),
        anchor: Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))[^>]*>(.*?)</a\s*>"#)
            .expect("anchor regex"),
        tag: Regex::new(r"(?s)<[^>]*>").expect("tag regex"),
        comment: Regex::new(r"(?s)<!--.*?-->").expect("comment regex"),
    })
}

/// Turns raw page HTML into the text and links the planner works from.
#[derive(Clone, Debug, Default)]
pub struct ContentExtractor;

impl ContentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(
        &self,
        title: &str,
        url: &str,
        html: &str,
        screenshot: Option<String>,
    ) -> ScrapedPage {
        let p = patterns();
        let without_comments = p.comment.replace_all(html, " ");
        let without_scripts = p.script.replace_all(&without_comments, " ");
        let cleaned = p.style.replace_all(&without_scripts, " ");

        let links = p
            .anchor
            .captures_iter(&cleaned)
            .filter_map(|cap| {
                let href = cap
                    .get(1)
                    .or_else(|| cap.get(2))
                    .or_else(|| cap.get(3))?
                    .as_str();
                let text = cap.get(4).map(|m| m.as_str()).unwrap_or_default();
                Some(PageLink {
                    text: strip_tags(text),
                    href: decode_entities(href),
                })
            })
            .take(MAX_LINKS)
            .collect();

        ScrapedPage {
            title: collapse_whitespace(title),
            url: url.to_string(),
            text_content: strip_tags(&cleaned),
            screenshot,
            links,
        }
    }
}

fn strip_tags(html: &str) -> String {
    let text = patterns().tag.replace_all(html, " ");
    collapse_whitespace(&decode_entities(&text))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_styles_and_tags() {
        let html = r#"<html><head><style>p { color: red }</style>
            <script type="text/javascript">var x = "<b>hidden</b>";</script></head>
            <body><h1>Hello</h1><p>Fish &amp; chips&nbsp;today</p><!-- note --></body></html>"#;
        let page = ContentExtractor::new().extract(" Home ", "https://x.io", html, None);
        assert_eq!(page.text_content, "Hello Fish & chips today");
        assert_eq!(page.title, "Home");
    }

    #[test]
    fn collects_links_with_any_quoting() {
        let html = r#"<a href="/a">First <b>link</b></a>
            <a class="x" href='/b'>Second</a>
            <a href=/c>Third</a>
            <a name="anchor">No href</a>"#;
        let page = ContentExtractor::new().extract("t", "u", html, None);
        let hrefs: Vec<_> = page.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/a", "/b", "/c"]);
        assert_eq!(page.links[0].text, "First link");
    }

    #[test]
    fn caps_link_count() {
        let html: String = (0..80)
            .map(|i| format!(r#"<a href="/p{i}">p{i}</a>"#))
            .collect();
        let page = ContentExtractor::new().extract("t", "u", &html, None);
        assert_eq!(page.links.len(), MAX_LINKS);
        assert_eq!(page.links[49].href, "/p49");
    }
}
