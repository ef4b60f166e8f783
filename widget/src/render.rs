use crate::config::NO_RESULTS_TEXT;
use crate::template::{escape_html, ResultTemplate};
use blogsearch_core::Post;
use scraper::Html;

/// One child of the results container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultNode {
    /// A post rendered through the result template.
    Fragment(String),
    /// The notice shown when nothing matched.
    Note(String),
}

impl ResultNode {
    pub fn to_html(&self) -> String {
        match self {
            ResultNode::Fragment(inner) => format!("<div>{inner}</div>"),
            ResultNode::Note(text) => format!(r#"<p class="note">{}</p>"#, escape_html(text)),
        }
    }

    /// Text content with markup stripped.
    pub fn text(&self) -> String {
        match self {
            ResultNode::Fragment(inner) => Html::parse_fragment(inner).root_element().text().collect(),
            ResultNode::Note(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultRenderer {
    template: ResultTemplate,
    no_results_text: String,
}

impl ResultRenderer {
    pub fn new(template: ResultTemplate) -> Self {
        Self { template, no_results_text: NO_RESULTS_TEXT.to_string() }
    }

    pub fn with_no_results_text(mut self, text: impl Into<String>) -> Self {
        self.no_results_text = text.into();
        self
    }

    pub fn render(&self, post: &Post) -> ResultNode {
        ResultNode::Fragment(self.template.render(post))
    }

    /// One node per post in order, or a single notice when `posts` is empty.
    pub fn render_results(&self, posts: &[&Post]) -> Vec<ResultNode> {
        if posts.is_empty() {
            return vec![ResultNode::Note(self.no_results_text.clone())];
        }
        posts.iter().map(|p| self.render(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsearch_core::RawPost;

    fn renderer() -> ResultRenderer {
        ResultRenderer::new(ResultTemplate::parse("<h3><%- title %></h3><p><%= excerpt %></p>").unwrap())
    }

    fn post(id: &str, title: &str) -> Post {
        let raw: RawPost = serde_json::from_value(serde_json::json!({
            "id": id, "title": title, "excerpt": "<b>x</b>"
        }))
        .unwrap();
        Post::from(raw)
    }

    #[test]
    fn empty_results_render_one_note() {
        let nodes = renderer().render_results(&[]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text(), "No results found...");
        assert_eq!(nodes[0].to_html(), r#"<p class="note">No results found...</p>"#);
    }

    #[test]
    fn one_fragment_per_post_in_order() {
        let a = post("a", "First");
        let b = post("b", "Second");
        let nodes = renderer().render_results(&[&a, &b]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text(), "Firstx");
        assert_eq!(nodes[1].to_html(), "<div><h3>Second</h3><p><b>x</b></p></div>");
    }

    #[test]
    fn render_is_pure() {
        let r = renderer();
        let p = post("a", "Same");
        assert_eq!(r.render(&p), r.render(&p));
    }

    #[test]
    fn custom_notice_text() {
        let nodes = renderer().with_no_results_text("Nothing here").render_results(&[]);
        assert_eq!(nodes, vec![ResultNode::Note("Nothing here".into())]);
    }
}
