//! Sequence-labeling fixtures over categorical domains.
//!
//! A `TaggedSentence` pairs each word (observed, categorical) with a tag
//! variable (hidden, categorical, with the gold tag as target).

use std::sync::Arc;

use factorforge_core::{CategoricalDomain, Variable};

/// Words and tags of one sentence.
#[derive(Debug, Clone)]
pub struct TaggedSentence {
    pub words: Vec<Variable>,
    pub tags: Vec<Variable>,
}

impl TaggedSentence {
    /// Builds a sentence from `(word, gold tag)` pairs.
    ///
    /// Words and tags are interned into the given domains. Tag variables
    /// start at `initial_tag` with the gold tag as target.
    ///
    /// # Panics
    ///
    /// Panics if a domain is frozen and a label is unknown.
    pub fn new(
        words: &Arc<CategoricalDomain>,
        tags: &Arc<CategoricalDomain>,
        initial_tag: &str,
        pairs: &[(&str, &str)],
    ) -> Self {
        let initial = tags.intern_value(initial_tag).expect("initial tag interned");
        let mut word_vars = Vec::with_capacity(pairs.len());
        let mut tag_vars = Vec::with_capacity(pairs.len());
        for (word, tag) in pairs {
            let word_value = words.intern_value(word).expect("word interned");
            let gold = tags.intern_value(tag).expect("tag interned");
            word_vars.push(
                Variable::builder(words.clone())
                    .name(format!("w:{word}"))
                    .value(word_value)
                    .build()
                    .expect("word within domain"),
            );
            tag_vars.push(
                Variable::builder(tags.clone())
                    .name(format!("t:{word}"))
                    .value(initial.clone())
                    .target(gold)
                    .build()
                    .expect("tag within domain"),
            );
        }
        Self {
            words: word_vars,
            tags: tag_vars,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
