use crate::config::Selectors;
use crate::error::WidgetError;
use crate::render::ResultNode;
use scraper::{ElementRef, Html, Selector};

/// Page used when the host does not supply its own markup.
pub const DEFAULT_PAGE: &str = r##"<!DOCTYPE html>
<html>
<body>
  <a href="#" class="show-search">Search</a>
  <div id="search-container">
    <a href="#" class="close-search">Close</a>
    <input type="text" class="site-search" placeholder="Search posts">
    <div class="results"></div>
  </div>
  <script type="text/template" id="search-result">
    <article class="search-result">
      <h2><a href="<%- url %>"><%- title %></a></h2>
      <p class="categories"><%- categories %></p>
      <p class="excerpt"><%= excerpt %></p>
    </article>
  </script>
</body>
</html>
"##;

/// What the widget needs out of the host page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Trimmed markup of the result template element.
    pub template: String,
}

impl PageLayout {
    pub fn parse(html: &str, selectors: &Selectors) -> Result<Self, WidgetError> {
        let doc = Html::parse_document(html);
        let mut template = None;
        for (name, sel) in selectors.required() {
            let selector = Selector::parse(sel).map_err(|_| WidgetError::InvalidSelector(sel.to_string()))?;
            let el = doc
                .select(&selector)
                .next()
                .ok_or_else(|| WidgetError::MissingElement(sel.to_string()))?;
            if name == "template" {
                template = Some(template_markup(el));
            }
        }
        // required() always names the template
        Ok(Self { template: template.unwrap_or_default() })
    }
}

fn template_markup(el: ElementRef<'_>) -> String {
    // script bodies are raw text; anything else is ordinary markup
    let markup = if el.value().name() == "script" {
        el.text().collect::<String>()
    } else {
        el.inner_html()
    };
    markup.trim().to_string()
}

/// Mutable state of the mounted page.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    input: String,
    results: Vec<ResultNode>,
    content: String,
}

impl SearchPage {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), ..Self::default() }
    }

    pub fn input_value(&self) -> &str { &self.input }

    pub fn set_input(&mut self, value: impl Into<String>) { self.input = value.into(); }

    pub fn clear_input(&mut self) { self.input.clear(); }

    pub fn results(&self) -> &[ResultNode] { &self.results }

    /// Empty the results container and append `nodes`.
    pub fn replace_results(&mut self, nodes: Vec<ResultNode>) { self.results = nodes; }

    pub fn results_html(&self) -> String {
        self.results.iter().map(ResultNode::to_html).collect()
    }

    pub fn content(&self) -> &str { &self.content }
}
