//! Surrounding-character contexts and the context × operation count matrix.

use crate::config::ContextConfig;
use crate::error::{LatticeError, Result};
use crate::kernel::{ContextMatrix, LabelIndex};
use crate::morphology::operation::CombinedWord;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

/// Characters before the first edit with `token`, as `L(..)`.
///
/// Returns `None` when the token is absent, when nothing precedes it, or
/// when `exact_count` is set and fewer than `count` characters precede it.
pub fn left_context(
    word: &CombinedWord,
    token: &str,
    count: usize,
    exact_count: bool,
) -> Option<String> {
    let (start, _) = word.find_edit(token)?;
    let surface = word.surface();
    let before = &surface[..start];
    let taken = &before[before.len().saturating_sub(count)..];
    wrap('L', taken, count, exact_count)
}

/// Characters after the first edit with `token`, as `R(..)`.
///
/// For a delete the context starts after the deleted letters.
pub fn right_context(
    word: &CombinedWord,
    token: &str,
    count: usize,
    exact_count: bool,
) -> Option<String> {
    let (_, end) = word.find_edit(token)?;
    let surface = word.surface();
    let after = &surface[end..];
    let taken = &after[..count.min(after.len())];
    wrap('R', taken, count, exact_count)
}

fn wrap(side: char, taken: &[char], count: usize, exact_count: bool) -> Option<String> {
    if taken.is_empty() || (exact_count && taken.len() != count) {
        return None;
    }
    let mut out = String::with_capacity(taken.len() + 3);
    out.push(side);
    out.push('(');
    out.extend(taken);
    out.push(')');
    Some(out)
}

/// Accumulates context occurrences per operation token.
///
/// Objects that never produce a context are left out of the built matrix.
#[derive(Debug, Clone)]
pub struct ContextMatrixBuilder {
    config: ContextConfig,
    counts: BTreeMap<String, BTreeMap<String, f64>>,
    objects: BTreeSet<String>,
}

impl ContextMatrixBuilder {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            counts: BTreeMap::new(),
            objects: BTreeSet::new(),
        }
    }

    /// Contexts of `token` in `word` under the configured widths and sides.
    pub fn contexts_for(&self, word: &CombinedWord, token: &str) -> Vec<String> {
        let mut contexts = Vec::new();
        for &count in &self.config.char_counts {
            if self.config.left {
                contexts.extend(left_context(word, token, count, self.config.exact_count));
            }
            if self.config.right {
                contexts.extend(right_context(word, token, count, self.config.exact_count));
            }
        }
        contexts
    }

    /// Count the contexts of the operation `object` inside `combined`.
    ///
    /// Returns the number of context occurrences recorded.
    pub fn add(&mut self, object: &str, combined: &str) -> Result<usize> {
        let word = CombinedWord::parse(combined)?;
        if word.find_edit(object).is_none() {
            return Err(LatticeError::MalformedEdit(format!(
                "{} does not occur in {:?}",
                object, combined
            )));
        }
        Ok(self.record(&word, object))
    }

    /// Count the contexts of every edit in `combined`.
    pub fn add_word(&mut self, combined: &str) -> Result<usize> {
        let word = CombinedWord::parse(combined)?;
        let tokens: Vec<String> = word.edits().iter().map(|e| e.token()).collect();
        Ok(tokens.iter().map(|token| self.record(&word, token)).sum())
    }

    fn record(&mut self, word: &CombinedWord, object: &str) -> usize {
        let contexts = self.contexts_for(word, object);
        trace!("{} -> {:?}", object, contexts);
        for context in &contexts {
            *self
                .counts
                .entry(context.clone())
                .or_default()
                .entry(object.to_string())
                .or_insert(0.0) += 1.0;
        }
        if !contexts.is_empty() {
            self.objects.insert(object.to_string());
        }
        contexts.len()
    }

    /// Build the count matrix with lexicographically sorted labels.
    pub fn build(self) -> Result<ContextMatrix> {
        let objects: Vec<String> = self.objects.into_iter().collect();
        let contexts: Vec<String> = self.counts.keys().cloned().collect();
        let mut cells = Vec::with_capacity(contexts.len() * objects.len());
        for row in self.counts.values() {
            cells.extend(
                objects
                    .iter()
                    .map(|object| row.get(object).copied().unwrap_or(0.0)),
            );
        }
        debug!(
            "Context matrix: {} contexts x {} objects",
            contexts.len(),
            objects.len()
        );
        ContextMatrix::new(LabelIndex::new(contexts)?, LabelIndex::new(objects)?, cells)
    }
}
