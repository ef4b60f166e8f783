use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    // English stop words used by browser-side blog search indexes.
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","able","about","across","after","all","almost","also","am","among","an","and","any","are","as","at",
            "be","because","been","but","by",
            "can","cannot","could",
            "dear","did","do","does",
            "either","else","ever","every",
            "for","from",
            "get","got",
            "had","has","have","he","her","hers","him","his","how","however",
            "i","if","in","into","is","it","its",
            "just",
            "least","let","like","likely",
            "may","me","might","most","must","my",
            "neither","no","nor","not",
            "of","off","often","on","only","or","other","our","own",
            "rather",
            "said","say","says","she","should","since","so","some",
            "than","that","the","their","them","then","there","these","they","this","tis","to","too","twas",
            "us",
            "wants","was","we","were","what","when","where","which","while","who","whom","why","will","with","would",
            "yet","you","your"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize text into stemmed terms using NFKC normalization, lowercase and stopword removal.
///
/// Index and query text go through the same pipeline. Order and duplicates are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized)
        .map(|mat| mat.as_str().trim_end_matches('\''))
        .filter(|token| !token.is_empty() && !is_stopword(token))
        .map(|token| STEMMER.stem(token).into_owned())
        .collect()
}
