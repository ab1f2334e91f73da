use serde::Deserialize;

use super::shape::{NoteShape, SHAPE_COUNT};
use crate::error::{Error, Result};

/// Ergonomic compatibility tables between note shapes. Rows are indexed by a
/// previously placed shape, columns by the candidate shape.
#[derive(Clone, Debug)]
pub struct WeightConfiguration {
    same_color: Vec<f64>,
    diff_color: Vec<f64>,
    same_color_2: Vec<f64>,
    diff_color_2: Vec<f64>,
    allowed: Vec<f64>,
}

/// On-disk layout of the weight tables.
#[derive(Debug, Deserialize)]
pub struct WeightTables {
    pub same_color: Vec<Vec<f64>>,
    pub diff_color: Vec<Vec<f64>>,
    pub same_color_2: Vec<Vec<f64>>,
    pub diff_color_2: Vec<Vec<f64>>,
    pub allowed: Vec<f64>,
}

impl WeightConfiguration {
    pub fn new(tables: WeightTables) -> Result<Self> {
        Ok(Self {
            same_color: flatten_matrix("same_color", tables.same_color)?,
            diff_color: flatten_matrix("diff_color", tables.diff_color)?,
            same_color_2: flatten_matrix("same_color_2", tables.same_color_2)?,
            diff_color_2: flatten_matrix("diff_color_2", tables.diff_color_2)?,
            allowed: check_vector("allowed", tables.allowed)?,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let tables: WeightTables = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("malformed weight tables: {}", e)))?;
        Self::new(tables)
    }

    pub fn same_color(&self, prev: NoteShape) -> &[f64] {
        row(&self.same_color, prev)
    }

    pub fn diff_color(&self, prev: NoteShape) -> &[f64] {
        row(&self.diff_color, prev)
    }

    pub fn same_color_2(&self, prev: NoteShape) -> &[f64] {
        row(&self.same_color_2, prev)
    }

    pub fn diff_color_2(&self, prev: NoteShape) -> &[f64] {
        row(&self.diff_color_2, prev)
    }

    pub fn allowed(&self) -> &[f64] {
        &self.allowed
    }
}

fn row(table: &[f64], prev: NoteShape) -> &[f64] {
    let start = prev.offset() * SHAPE_COUNT;
    &table[start..start + SHAPE_COUNT]
}

fn flatten_matrix(name: &str, matrix: Vec<Vec<f64>>) -> Result<Vec<f64>> {
    if matrix.len() != SHAPE_COUNT {
        return Err(Error::Configuration(format!(
            "{} has {} rows, expected {}",
            name,
            matrix.len(),
            SHAPE_COUNT
        )));
    }
    let mut flat = Vec::with_capacity(SHAPE_COUNT * SHAPE_COUNT);
    for (i, row) in matrix.into_iter().enumerate() {
        let row = check_vector(&format!("{} row {}", name, i + 1), row)?;
        flat.extend(row);
    }
    Ok(flat)
}

fn check_vector(name: &str, values: Vec<f64>) -> Result<Vec<f64>> {
    if values.len() != SHAPE_COUNT {
        return Err(Error::Configuration(format!(
            "{} has {} entries, expected {}",
            name,
            values.len(),
            SHAPE_COUNT
        )));
    }
    if let Some(pos) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        return Err(Error::Configuration(format!(
            "{} entry {} is {}, expected a finite non-negative value",
            name,
            pos + 1,
            values[pos]
        )));
    }
    Ok(values)
}
