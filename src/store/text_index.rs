use std::collections::{BTreeMap, HashMap};

/// Splits text into lowercase alphanumeric terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Inverted index from term to the documents containing it.
///
/// Documents are identified by their insertion position. A query matches a
/// document when any query term is a prefix of one of its terms; hits are
/// ranked by the number of distinct query terms matched, then by how often
/// they occur, then by position.
#[derive(Debug, Default)]
pub struct TextIndex {
    postings: BTreeMap<String, HashMap<usize, u32>>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Hit {
    terms_matched: u32,
    occurrences: u32,
}

impl TextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<'a>(&mut self, doc: usize, fields: impl IntoIterator<Item = &'a str>) {
        for field in fields {
            for token in tokenize(field) {
                *self.postings.entry(token).or_default().entry(doc).or_insert(0) += 1;
            }
        }
    }

    pub fn search(&self, query: &str) -> Vec<usize> {
        let mut terms = tokenize(query);
        terms.sort();
        terms.dedup();

        let mut hits: HashMap<usize, Hit> = HashMap::new();
        for term in &terms {
            let mut seen_for_term: HashMap<usize, u32> = HashMap::new();
            let matching = self
                .postings
                .range(term.clone()..)
                .take_while(|(token, _)| token.starts_with(term.as_str()));
            for (_, docs) in matching {
                for (&doc, &count) in docs {
                    *seen_for_term.entry(doc).or_insert(0) += count;
                }
            }
            for (doc, count) in seen_for_term {
                let hit = hits.entry(doc).or_default();
                hit.terms_matched += 1;
                hit.occurrences += count;
            }
        }

        let mut ranked: Vec<(usize, Hit)> = hits.into_iter().collect();
        ranked.sort_by(|(doc_a, a), (doc_b, b)| {
            b.terms_matched
                .cmp(&a.terms_matched)
                .then(b.occurrences.cmp(&a.occurrences))
                .then(doc_a.cmp(doc_b))
        });
        ranked.into_iter().map(|(doc, _)| doc).collect()
    }
}
