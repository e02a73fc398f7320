//! Transformations, edit operations and aligned "combined" words.
//!
//! An aligned lemma/inflection pair is rendered as one combined string in
//! which edits appear inline: `abDEL(c)dINS(xy)` turns `abcd` into `abdxy`.
//! The lemma side of a combined word is its *surface*; edit positions are
//! surface positions.

use crate::error::{LatticeError, Result};
use std::collections::HashMap;
use std::fmt;

const INSERT_PREFIX: &str = "INS(";
const DELETE_PREFIX: &str = "DEL(";

// =============================================================================
// Transformation
// =============================================================================

/// One lemma → inflection example with its grammatical tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transformation {
    pub lemma: String,
    pub inflection: String,
    pub rules: Vec<String>,
}

impl Transformation {
    /// Parse `lemma<TAB>inflection<TAB>TAG;TAG;...`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split('\t');
        let lemma = fields.next()?;
        let inflection = fields.next()?;
        let rules = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            lemma: lemma.to_string(),
            inflection: inflection.to_string(),
            rules: rules.trim().split(';').map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(lemma: {}, inflection: {}, rules: {:?})",
            self.lemma, self.inflection, self.rules
        )
    }
}

/// Parse every non-empty line of a tab-separated dataset.
pub fn read_transformations(text: &str) -> Result<Vec<Transformation>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            Transformation::parse_line(line).ok_or_else(|| LatticeError::MalformedLine {
                line: i + 1,
                reason: "expected lemma, inflection and rules separated by tabs".to_string(),
            })
        })
        .collect()
}

// =============================================================================
// Operations
// =============================================================================

/// One contiguous span of letters at a surface position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation {
    pub index: usize,
    pub letters: String,
}

impl Operation {
    pub fn new(index: usize, letters: impl Into<String>) -> Self {
        Self {
            index,
            letters: letters.into(),
        }
    }
}

/// Whether an operation inserts or deletes its letters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditKind {
    Insert,
    Delete,
}

/// An insert or delete operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edit {
    pub kind: EditKind,
    pub operation: Operation,
}

impl Edit {
    pub fn insert(index: usize, letters: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            operation: Operation::new(index, letters),
        }
    }

    pub fn delete(index: usize, letters: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            operation: Operation::new(index, letters),
        }
    }

    /// Parse an object token such as `INS(x)` for the given position.
    pub fn from_token(token: &str, index: usize) -> Result<Self> {
        let (kind, rest) = if let Some(rest) = token.strip_prefix(INSERT_PREFIX) {
            (EditKind::Insert, rest)
        } else if let Some(rest) = token.strip_prefix(DELETE_PREFIX) {
            (EditKind::Delete, rest)
        } else {
            return Err(LatticeError::MalformedEdit(token.to_string()));
        };
        let letters = rest
            .strip_suffix(')')
            .ok_or_else(|| LatticeError::MalformedEdit(token.to_string()))?;
        Ok(Self {
            kind,
            operation: Operation::new(index, letters),
        })
    }

    /// The object label of this edit, independent of position.
    pub fn token(&self) -> String {
        match self.kind {
            EditKind::Insert => format!("{}{})", INSERT_PREFIX, self.operation.letters),
            EditKind::Delete => format!("{}{})", DELETE_PREFIX, self.operation.letters),
        }
    }

    /// Surface positions consumed by this edit.
    fn surface_len(&self) -> usize {
        match self.kind {
            EditKind::Insert => 0,
            EditKind::Delete => self.operation.letters.chars().count(),
        }
    }
}

/// Frequency of each operation.
pub fn count_operations<'a, I>(operations: I) -> HashMap<Operation, usize>
where
    I: IntoIterator<Item = &'a Operation>,
{
    let mut counts = HashMap::new();
    for op in operations {
        *counts.entry(op.clone()).or_insert(0) += 1;
    }
    counts
}

/// Apply edits to a lemma.
///
/// Edit indexes are positions in `lemma`. At one position inserts apply
/// before a delete; a delete must match the letters it removes.
pub fn apply_edits(lemma: &str, edits: &[Edit]) -> Result<String> {
    let chars: Vec<char> = lemma.chars().collect();
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.operation.index, e.kind));

    let mut out = String::with_capacity(lemma.len());
    let mut pos = 0;
    for edit in ordered {
        let index = edit.operation.index;
        if index < pos || index > chars.len() {
            return Err(LatticeError::MalformedEdit(format!(
                "{} at {} does not fit {:?}",
                edit.token(),
                index,
                lemma
            )));
        }
        out.extend(&chars[pos..index]);
        pos = index;
        match edit.kind {
            EditKind::Insert => out.push_str(&edit.operation.letters),
            EditKind::Delete => {
                let end = pos + edit.surface_len();
                let removed: String = chars.get(pos..end).unwrap_or_default().iter().collect();
                if removed != edit.operation.letters {
                    return Err(LatticeError::MalformedEdit(format!(
                        "{} at {} does not match {:?}",
                        edit.token(),
                        index,
                        lemma
                    )));
                }
                pos = end;
            }
        }
    }
    out.extend(&chars[pos..]);
    Ok(out)
}

// =============================================================================
// CombinedWord
// =============================================================================

/// One piece of a combined word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Char(char),
    Insert(String),
    Delete(String),
}

/// A parsed combined string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedWord {
    segments: Vec<Segment>,
}

impl CombinedWord {
    /// Tokenise a combined string such as `abDEL(c)dINS(xy)`.
    pub fn parse(combined: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = combined;
        while let Some(c) = rest.chars().next() {
            let (prefix_kind, body) = if let Some(body) = rest.strip_prefix(INSERT_PREFIX) {
                (Some(EditKind::Insert), body)
            } else if let Some(body) = rest.strip_prefix(DELETE_PREFIX) {
                (Some(EditKind::Delete), body)
            } else {
                (None, rest)
            };

            match prefix_kind {
                Some(kind) => {
                    let close = body.find(')').ok_or_else(|| {
                        LatticeError::MalformedEdit(format!("unclosed edit in {:?}", combined))
                    })?;
                    let letters = body[..close].to_string();
                    segments.push(match kind {
                        EditKind::Insert => Segment::Insert(letters),
                        EditKind::Delete => Segment::Delete(letters),
                    });
                    rest = &body[close + 1..];
                }
                None => {
                    segments.push(Segment::Char(c));
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The lemma side: plain and deleted characters.
    pub fn surface(&self) -> Vec<char> {
        let mut out = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Char(c) => out.push(*c),
                Segment::Delete(letters) => out.extend(letters.chars()),
                Segment::Insert(_) => {}
            }
        }
        out
    }

    /// The inflection side: plain and inserted characters.
    pub fn inflection(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Char(c) => out.push(*c),
                Segment::Insert(letters) => out.push_str(letters),
                Segment::Delete(_) => {}
            }
        }
        out
    }

    /// Edits in order, indexed by surface position.
    pub fn edits(&self) -> Vec<Edit> {
        let mut edits = Vec::new();
        let mut pos = 0;
        for segment in &self.segments {
            match segment {
                Segment::Char(_) => pos += 1,
                Segment::Insert(letters) => edits.push(Edit::insert(pos, letters.clone())),
                Segment::Delete(letters) => {
                    edits.push(Edit::delete(pos, letters.clone()));
                    pos += letters.chars().count();
                }
            }
        }
        edits
    }

    /// Surface span `[start, end)` of the first edit with the given token.
    pub fn find_edit(&self, token: &str) -> Option<(usize, usize)> {
        self.edits()
            .into_iter()
            .find(|e| e.token() == token)
            .map(|e| {
                let start = e.operation.index;
                (start, start + e.surface_len())
            })
    }
}
