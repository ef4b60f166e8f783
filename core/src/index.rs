use crate::tokenizer;
use crate::{DocId, DocMeta, Posting, TermId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

/// Anything the index can ingest: a ref plus named text fields.
pub trait Document {
    fn doc_ref(&self) -> &str;
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_ref: String,
    pub score: f32,
}

/// Build-once full text index. There is no update or delete.
pub trait SearchIndex {
    /// Ingest one document. Returns false (and ignores it) if the ref is already indexed.
    fn add<D: Document>(&mut self, doc: &D) -> bool;
    /// Hits ordered by descending relevance.
    fn search(&self, term: &str) -> Vec<SearchHit>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool { self.len() == 0 }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub boost: f32,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, boost: f32) -> Self {
        Self { name: name.into(), boost }
    }
}

/// Field-weighted TF-IDF index with prefix expansion of query terms.
#[derive(Debug, Default)]
pub struct FieldIndex {
    pub fields: Vec<FieldSpec>,
    pub dictionary: BTreeMap<String, TermId>,
    pub postings: HashMap<TermId, Vec<Posting>>, // postings sorted by doc_id
    pub docs: HashMap<DocId, DocMeta>,
    pub num_docs: u32,
    refs: HashMap<String, DocId>,
}

impl FieldIndex {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields, ..Self::default() }
    }

    pub fn contains(&self, doc_ref: &str) -> bool { self.refs.contains_key(doc_ref) }

    fn intern(&mut self, term: &str) -> TermId {
        if let Some(&tid) = self.dictionary.get(term) {
            return tid;
        }
        let tid = self.dictionary.len() as TermId;
        self.dictionary.insert(term.to_string(), tid);
        tid
    }

    fn df(&self, tid: TermId) -> u32 {
        self.postings.get(&tid).map_or(0, |p| p.len() as u32)
    }

    fn idf(&self, tid: TermId) -> f32 {
        let n = self.num_docs as f32;
        1.0 + (n / (1.0 + self.df(tid) as f32)).ln()
    }

    /// Indexed terms starting with `prefix`, in lexical order.
    fn expand<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, TermId)> + 'a {
        self.dictionary
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(term, _)| term.starts_with(prefix))
            .map(|(term, &tid)| (term.as_str(), tid))
    }

    /// Stored weight of `tid` in `doc_id`, or 0 when the document lacks the term.
    pub fn weight(&self, tid: TermId, doc_id: DocId) -> f32 {
        let Some(plist) = self.postings.get(&tid) else { return 0.0 };
        match plist.binary_search_by_key(&doc_id, |p| p.doc_id) {
            Ok(i) => plist[i].weight,
            Err(_) => 0.0,
        }
    }

    fn cosine(&self, query: &HashMap<TermId, f32>, query_norm: f32, doc_id: DocId) -> f32 {
        let Some(meta) = self.docs.get(&doc_id) else { return 0.0 };
        let mut dot = 0.0f32;
        let mut doc_norm = 0.0f32;
        for &tid in &meta.terms {
            let w = self.weight(tid, doc_id) * self.idf(tid);
            doc_norm += w * w;
            if let Some(q) = query.get(&tid) {
                dot += q * w;
            }
        }
        let denom = doc_norm.sqrt() * query_norm;
        if denom == 0.0 { 0.0 } else { dot / denom }
    }
}

impl SearchIndex for FieldIndex {
    fn add<D: Document>(&mut self, doc: &D) -> bool {
        if self.contains(doc.doc_ref()) {
            return false;
        }
        let doc_id = self.num_docs;

        let mut tf: BTreeMap<TermId, f32> = BTreeMap::new();
        for i in 0..self.fields.len() {
            let boost = self.fields[i].boost;
            let terms = doc.field(&self.fields[i].name).map(tokenizer::tokenize).unwrap_or_default();
            if terms.is_empty() { continue; }

            let len = terms.len() as f32;
            let mut counts: HashMap<&str, u32> = HashMap::new();
            for t in &terms {
                *counts.entry(t.as_str()).or_insert(0) += 1;
            }
            for (term, count) in counts {
                let tid = self.intern(term);
                *tf.entry(tid).or_insert(0.0) += count as f32 / len * boost;
            }
        }

        // doc ids only grow, so each posting list stays sorted
        for (&tid, &weight) in &tf {
            self.postings.entry(tid).or_default().push(Posting { doc_id, weight });
        }
        let terms = tf.into_keys().collect();
        self.docs.insert(doc_id, DocMeta { external_id: doc.doc_ref().to_string(), terms });
        self.refs.insert(doc.doc_ref().to_string(), doc_id);
        self.num_docs += 1;
        true
    }

    fn search(&self, term: &str) -> Vec<SearchHit> {
        let query = tokenizer::tokenize(term);
        if query.is_empty() || self.num_docs == 0 {
            return vec![];
        }

        let boost_sum: f32 = self.fields.iter().map(|f| f.boost).sum();
        let query_tf = boost_sum / query.len() as f32;

        // Every query token must match; expansions of one token are alternatives.
        let mut query_vec: HashMap<TermId, f32> = HashMap::new();
        let mut matched: Option<HashSet<DocId>> = None;
        for token in &query {
            let mut token_docs: HashSet<DocId> = HashSet::new();
            for (key, tid) in self.expand(token) {
                let similarity = if key == token.as_str() {
                    1.0
                } else {
                    1.0 / ((key.len() - token.len()).max(3) as f32).ln()
                };
                *query_vec.entry(tid).or_insert(0.0) += query_tf * self.idf(tid) * similarity;
                if let Some(plist) = self.postings.get(&tid) {
                    token_docs.extend(plist.iter().map(|p| p.doc_id));
                }
            }
            matched = Some(match matched {
                None => token_docs,
                Some(prev) => prev.intersection(&token_docs).copied().collect(),
            });
        }
        let matched = matched.unwrap_or_default();
        if matched.is_empty() {
            return vec![];
        }

        let query_norm = query_vec.values().map(|w| w * w).sum::<f32>().sqrt();
        let mut scored: Vec<(DocId, f32)> = matched
            .into_iter()
            .map(|doc_id| (doc_id, self.cosine(&query_vec, query_norm, doc_id)))
            .collect();
        // ties keep ingestion order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.docs.get(&doc_id).map(|meta| SearchHit { doc_ref: meta.external_id.clone(), score })
            })
            .collect()
    }

    fn len(&self) -> usize { self.num_docs as usize }
}
