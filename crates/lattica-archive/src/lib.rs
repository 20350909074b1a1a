//! Time-major dataset staging and attribute queueing.
//!
//! This crate pins down the *shape contract* of persisted simulation
//! state without committing to a storage backend:
//!
//! - per-cell datasets are 2-D `[T, num_cells]` with time on axis 0,
//!   tagged `is_vertex_property: true` and a `cell_idx` dimension;
//! - density datasets are 2-D `[T, num_kinds]` with a `kind` dimension
//!   whose coordinates are the kind names;
//! - attributes may be queued against a dataset *before* it exists and
//!   flush onto it at creation, an explicit two-phase contract.
//!
//! The in-memory [`Archive`] implements [`StepSink`] and backs the
//! test suites; an HDF5 writer is a collaborator implementing the same
//! trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use indexmap::IndexMap;
use lattica_core::CoreError;

/// An attribute value attachable to a dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A string.
    Str(String),
    /// A list of strings (dimension coordinates).
    StrList(Vec<String>),
}

/// A growable time-major 2-D dataset: one row per step.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    width: usize,
    rows: Vec<Vec<f64>>,
    attrs: IndexMap<String, AttrValue>,
}

impl Dataset {
    fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            attrs: IndexMap::new(),
        }
    }

    /// Row width (the size of the second axis).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows written so far (the size of the time axis).
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The rows, oldest first.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// The attributes, in attachment order.
    pub fn attrs(&self) -> &IndexMap<String, AttrValue> {
        &self.attrs
    }

    /// Look up an attribute by key.
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }
}

/// A sink accepting one row per dataset per step.
///
/// The seam between the core and a storage collaborator: the shipped
/// in-memory [`Archive`] implements it, and so does a real HDF5
/// writer.
pub trait StepSink {
    /// Append a row to the named dataset.
    fn write_step(&mut self, dataset: &str, row: &[f64]) -> Result<(), CoreError>;
}

/// An in-memory archive of time-major datasets with two-phase
/// attribute queueing.
#[derive(Clone, Debug, Default)]
pub struct Archive {
    datasets: IndexMap<String, Dataset>,
    /// Attributes staged for datasets that do not exist yet.
    pending_attrs: IndexMap<String, Vec<(String, AttrValue)>>,
}

impl Archive {
    /// An empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an attribute to a dataset, existing or not.
    ///
    /// If the dataset exists the attribute lands immediately;
    /// otherwise it is queued and flushed when
    /// [`create_dataset`](Self::create_dataset) runs. Re-attaching a
    /// key overwrites the previous value.
    pub fn set_attr(&mut self, dataset: &str, key: &str, value: AttrValue) {
        if let Some(ds) = self.datasets.get_mut(dataset) {
            ds.attrs.insert(key.to_string(), value);
        } else {
            self.pending_attrs
                .entry(dataset.to_string())
                .or_default()
                .push((key.to_string(), value));
        }
    }

    /// Create an empty dataset of the given row width, flushing any
    /// queued attributes onto it.
    ///
    /// Fails with [`CoreError::InvalidConfig`] if the name is taken or
    /// the width is zero.
    pub fn create_dataset(&mut self, name: &str, width: usize) -> Result<(), CoreError> {
        if width == 0 {
            return Err(CoreError::InvalidConfig {
                key: format!("archive.{name}"),
                reason: "dataset width must be positive".into(),
            });
        }
        if self.datasets.contains_key(name) {
            return Err(CoreError::InvalidConfig {
                key: format!("archive.{name}"),
                reason: "dataset already exists".into(),
            });
        }
        let mut ds = Dataset::new(width);
        if let Some(queued) = self.pending_attrs.shift_remove(name) {
            for (key, value) in queued {
                ds.attrs.insert(key, value);
            }
        }
        self.datasets.insert(name.to_string(), ds);
        Ok(())
    }

    /// Create a per-cell dataset: width `num_cells`, tagged
    /// `is_vertex_property: true` with dimension name `cell_idx`.
    pub fn create_cell_dataset(&mut self, name: &str, num_cells: usize) -> Result<(), CoreError> {
        self.create_dataset(name, num_cells)?;
        self.set_attr(name, "is_vertex_property", AttrValue::Bool(true));
        self.set_attr(name, "dim_name__1", AttrValue::Str("cell_idx".into()));
        Ok(())
    }

    /// Create a density dataset: one column per kind, with the kind
    /// names as the coordinates of the `kind` dimension.
    pub fn create_density_dataset(
        &mut self,
        name: &str,
        kinds: &[&str],
    ) -> Result<(), CoreError> {
        self.create_dataset(name, kinds.len())?;
        self.set_attr(name, "dim_name__1", AttrValue::Str("kind".into()));
        self.set_attr(
            name,
            "coords__kind",
            AttrValue::StrList(kinds.iter().map(|s| s.to_string()).collect()),
        );
        Ok(())
    }

    /// The named dataset, if created.
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// All datasets in creation order.
    pub fn datasets(&self) -> &IndexMap<String, Dataset> {
        &self.datasets
    }
}

impl StepSink for Archive {
    fn write_step(&mut self, dataset: &str, row: &[f64]) -> Result<(), CoreError> {
        let ds = self
            .datasets
            .get_mut(dataset)
            .ok_or_else(|| CoreError::InvalidConfig {
                key: format!("archive.{dataset}"),
                reason: "dataset does not exist".into(),
            })?;
        if row.len() != ds.width {
            return Err(CoreError::LengthMismatch {
                expected: ds.width,
                got: row.len(),
            });
        }
        ds.rows.push(row.to_vec());
        Ok(())
    }
}
