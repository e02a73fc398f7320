//! Workbook: multi-sheet persistence for concept matrices.
//!
//! Each [`Sheet`] stores one concept's restricted matrix, trimmed to the
//! contexts and objects that carry at least one 1. Loading expands a sheet
//! back into the full label space of a lattice; objects, contexts and
//! confidence are re-derived there, never stored.
//!
//! ```json
//! {"sheets": [{"name": "sheet0",
//!              "contexts": ["L(a)", "R(b)"],
//!              "objects": ["INS(x)", "DEL(y)"],
//!              "rows": ["11", "10"]}]}
//! ```

use super::concept::Concept;
use crate::error::{LatticeError, Result};
use crate::kernel::BinaryMatrix;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One rows(contexts) × columns(objects) 0/1 table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    /// Row labels
    pub contexts: Vec<String>,
    /// Column labels
    pub objects: Vec<String>,
    /// One string of `'0'`/`'1'` per context, one character per object
    pub rows: Vec<String>,
}

impl Sheet {
    /// Capture a concept's trimmed matrix.
    pub fn from_concept(name: impl Into<String>, concept: &Concept) -> Self {
        let matrix = concept.matrix();
        let (rows, columns) = concept.trimmed_axes();
        Self {
            name: name.into(),
            contexts: rows
                .iter()
                .map(|&r| matrix.contexts().label(r).to_string())
                .collect(),
            objects: columns
                .iter()
                .map(|&o| matrix.objects().label(o).to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|&r| {
                    columns
                        .iter()
                        .map(|&o| if matrix.get(r, o) { '1' } else { '0' })
                        .collect()
                })
                .collect(),
        }
    }

    /// Expand the sheet into the label space of `template`.
    ///
    /// Labels missing from the sheet are zero.
    pub fn to_binary_matrix(&self, template: &BinaryMatrix) -> Result<BinaryMatrix> {
        if self.rows.len() != self.contexts.len() {
            return Err(self.malformed(format!(
                "{} rows for {} contexts",
                self.rows.len(),
                self.contexts.len()
            )));
        }

        let context_positions = self
            .contexts
            .iter()
            .map(|label| {
                template
                    .contexts()
                    .position(label)
                    .ok_or_else(|| LatticeError::UnknownLabel {
                        kind: "context",
                        label: label.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let object_positions = self
            .objects
            .iter()
            .map(|label| {
                template
                    .objects()
                    .position(label)
                    .ok_or_else(|| LatticeError::UnknownLabel {
                        kind: "object",
                        label: label.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut matrix = BinaryMatrix::zeros(
            template.contexts().clone(),
            template.objects().clone(),
        );
        for (row, &c) in self.rows.iter().zip(context_positions.iter()) {
            let cells: Vec<char> = row.chars().collect();
            if cells.len() != object_positions.len() {
                return Err(self.malformed(format!(
                    "row {:?} has {} cells for {} objects",
                    row,
                    cells.len(),
                    object_positions.len()
                )));
            }
            for (cell, &o) in cells.iter().zip(object_positions.iter()) {
                match cell {
                    '1' => matrix.set(c, o, true),
                    '0' => {}
                    other => return Err(self.malformed(format!("unexpected cell {:?}", other))),
                }
            }
        }
        Ok(matrix)
    }

    fn malformed(&self, reason: String) -> LatticeError {
        LatticeError::MalformedSheet {
            sheet: self.name.clone(),
            reason,
        }
    }
}

/// An ordered collection of sheets, persisted as one JSON document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// One sheet per concept, named `sheet0`, `sheet1`, ...
    pub fn from_concepts<'a, I>(concepts: I) -> Self
    where
        I: IntoIterator<Item = &'a Concept>,
    {
        let sheets = concepts
            .into_iter()
            .enumerate()
            .map(|(i, concept)| Sheet::from_concept(format!("sheet{}", i), concept))
            .collect();
        Self { sheets }
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Persist to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ContextMatrix;
    use crate::lattice::Lattice;

    fn lattice() -> Lattice {
        let m = ContextMatrix::from_rows(
            ["p", "q", "r"],
            ["x", "y", "z"],
            vec![
                vec![2.0, 1.0, 0.0],
                vec![1.0, 1.0, 0.0],
                vec![0.0, 0.0, 3.0],
            ],
        )
        .unwrap();
        Lattice::new(m, 1.0)
    }

    #[test]
    fn test_sheet_is_trimmed() {
        let lattice = lattice();
        let concept = lattice.find_concept_for_object("x").unwrap();
        let sheet = Sheet::from_concept("sheet0", &concept);
        assert_eq!(sheet.contexts, vec!["p", "q"]);
        assert_eq!(sheet.objects, vec!["x", "y"]);
        assert_eq!(sheet.rows, vec!["11", "11"]);
    }

    #[test]
    fn test_sheet_expands_back() {
        let lattice = lattice();
        let concept = lattice.find_concept_for_object("z").unwrap();
        let sheet = Sheet::from_concept("sheet0", &concept);
        let matrix = sheet.to_binary_matrix(lattice.binary_matrix()).unwrap();
        assert_eq!(&matrix, concept.matrix());
    }

    #[test]
    fn test_unknown_label() {
        let lattice = lattice();
        let sheet = Sheet {
            name: "sheet0".to_string(),
            contexts: vec!["p".to_string()],
            objects: vec!["w".to_string()],
            rows: vec!["1".to_string()],
        };
        let err = sheet.to_binary_matrix(lattice.binary_matrix()).unwrap_err();
        assert!(matches!(err, LatticeError::UnknownLabel { kind: "object", .. }));
    }

    #[test]
    fn test_malformed_rows() {
        let lattice = lattice();
        let mut sheet = Sheet {
            name: "sheet3".to_string(),
            contexts: vec!["p".to_string()],
            objects: vec!["x".to_string(), "y".to_string()],
            rows: vec!["1".to_string()],
        };
        let err = sheet.to_binary_matrix(lattice.binary_matrix()).unwrap_err();
        assert!(matches!(err, LatticeError::MalformedSheet { ref sheet, .. } if sheet == "sheet3"));

        sheet.rows = vec!["1x".to_string()];
        assert!(sheet.to_binary_matrix(lattice.binary_matrix()).is_err());
    }

    #[test]
    fn test_workbook_file_round_trip() {
        let lattice = lattice();
        let concepts = vec![
            lattice.find_concept_for_object("x").unwrap(),
            lattice.find_concept_for_object("z").unwrap(),
        ];
        let workbook = Workbook::from_concepts(&concepts);
        assert_eq!(workbook.sheets()[1].name, "sheet1");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concepts.json");
        workbook.save(&path).unwrap();
        let loaded = Workbook::load(&path).unwrap();
        assert_eq!(loaded, workbook);
    }
}
