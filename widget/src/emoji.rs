use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashSet;

lazy_static! {
    static ref SHORTCODE: Regex = Regex::new(r":([a-z0-9_+\-]+):").expect("valid regex");
    // Markup that is never text: comments, raw-text and literal elements, and
    // tag interiors (quoted attribute values may contain `>`).
    static ref VERBATIM: Regex = Regex::new(concat!(
        r"(?is)<!--.*?-->",
        r"|<script\b.*?</script\s*>",
        r"|<style\b.*?</style\s*>",
        r"|<textarea\b.*?</textarea\s*>",
        r"|<pre\b.*?</pre\s*>",
        r"|<code\b.*?</code\s*>",
        r#"|<(?:[^>"']|"[^"]*"|'[^']*')*>"#,
    ))
    .expect("valid regex");
    static ref KNOWN: HashSet<&'static str> = {
        let names: &[&str] = &[
            "+1","-1","100","bangbang","beer","bell","blush","bomb","book","boom","bug","bulb",
            "clap","coffee","computer","confused","cool","cry","disappointed","dizzy_face",
            "fire","flushed","gem","grin","grinning","heart","heart_eyes","hourglass","joy",
            "key","kissing_heart","laughing","lock","mag","memo","metal","moneybag","muscle",
            "neutral_face","ok_hand","pencil","pray","question","rage","rainbow","relaxed",
            "relieved","rocket","scream","see_no_evil","shipit","simple_smile","skull","sleeping",
            "smile","smiley","smirk","sob","sparkles","star","stuck_out_tongue","sunglasses",
            "sweat_smile","tada","thumbsdown","thumbsup","trophy","unamused","v","warning",
            "wave","wink","worried","wrench","x","zap"
        ];
        names.iter().copied().collect()
    };
}

/// Replaces `:shortcode:` with emoji images served from `img_dir`.
#[derive(Debug, Clone)]
pub struct Emojifier {
    img_dir: String,
}

impl Emojifier {
    pub fn new(img_dir: impl Into<String>) -> Self {
        let mut img_dir = img_dir.into();
        if !img_dir.ends_with('/') {
            img_dir.push('/');
        }
        Self { img_dir }
    }

    pub fn img_dir(&self) -> &str { &self.img_dir }

    /// Only text nodes are rewritten. Unknown names, attribute values, and the
    /// bodies of `script`, `style`, `textarea`, `pre` and `code` are left untouched.
    pub fn run(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        for m in VERBATIM.find_iter(html) {
            out.push_str(&self.replace(&html[last..m.start()]));
            out.push_str(m.as_str());
            last = m.end();
        }
        out.push_str(&self.replace(&html[last..]));
        out
    }

    fn replace(&self, text: &str) -> String {
        SHORTCODE
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                if KNOWN.contains(name) {
                    format!(
                        r#"<img class="emoji" title=":{name}:" alt=":{name}:" src="{}{name}.png" align="absmiddle" />"#,
                        self.img_dir
                    )
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }
}
