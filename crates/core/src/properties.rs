//! Property indirection between models and the simulator's element data
//!
//! A model never sees named properties during evaluation. At construction it
//! asks a [`PropertyBroker`] for the index of every property it needs; the
//! simulator then hands it one dense [`PropertyVector`] per element, addressed
//! by those indices.
//!
//! ```
//! use fire_spread_models::properties::{PropertyBroker, PropertyTable};
//!
//! let mut table = PropertyTable::new();
//! let load = table.resolve("fuel.Sigmad").unwrap();
//! let moisture = table.resolve("moisture").unwrap();
//! assert_eq!(table.resolve("fuel.Sigmad").unwrap(), load);
//!
//! let mut values = table.new_vector();
//! values[load] = 0.5;
//! values[moisture] = 0.1;
//! assert_eq!(values[load], 0.5);
//! ```

use std::ops::{Deref, Index, IndexMut};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Stable handle of a named property inside every [`PropertyVector`] of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PropertyIndex(usize);

impl PropertyIndex {
    /// Raw position in the property vector
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Source of property indices, queried while a model binds
pub trait PropertyBroker {
    /// Index of the property called `name`
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownProperty`] when the broker cannot supply `name`.
    fn resolve(&mut self, name: &str) -> Result<PropertyIndex, ModelError>;
}

/// Dense name-to-index table
///
/// Open tables assign the next free index on first request. Once sealed, the
/// table only resolves names it already holds, so a model asking for a
/// property the simulator does not provide fails at construction.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    indices: FxHashMap<String, PropertyIndex>,
    names: Vec<String>,
    sealed: bool,
}

impl PropertyTable {
    /// Empty, open table
    pub fn new() -> Self {
        Self::default()
    }

    /// Sealed table holding exactly `names`, indexed in order (duplicates collapse)
    pub fn with_properties<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::new();
        for name in names {
            table.insert(name);
        }
        table.seal();
        table
    }

    /// Refuse names that are not already known
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether unknown names are refused
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of distinct properties, which is the length of every vector
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no property has been requested yet
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of `name` without assigning one
    pub fn index_of(&self, name: &str) -> Option<PropertyIndex> {
        self.indices.get(name).copied()
    }

    /// Name behind `index`
    pub fn name_of(&self, index: PropertyIndex) -> Option<&str> {
        self.names.get(index.get()).map(String::as_str)
    }

    /// Property names in index order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Zeroed vector sized for this table
    pub fn new_vector(&self) -> PropertyVector {
        PropertyVector::zeros(self.len())
    }

    /// Vector sized for this table with the given named values set, others zero
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownProperty`] for a name the table does not hold.
    pub fn values_from(&self, values: &[(&str, f64)]) -> Result<PropertyVector, ModelError> {
        let mut vector = self.new_vector();
        for &(name, value) in values {
            let index = self
                .index_of(name)
                .ok_or_else(|| ModelError::UnknownProperty(name.to_string()))?;
            vector[index] = value;
        }
        Ok(vector)
    }

    fn insert(&mut self, name: &str) -> PropertyIndex {
        if let Some(index) = self.index_of(name) {
            return index;
        }
        let index = PropertyIndex(self.names.len());
        self.names.push(name.to_string());
        self.indices.insert(name.to_string(), index);
        index
    }
}

impl PropertyBroker for PropertyTable {
    fn resolve(&mut self, name: &str) -> Result<PropertyIndex, ModelError> {
        if let Some(index) = self.index_of(name) {
            return Ok(index);
        }
        if self.sealed {
            return Err(ModelError::UnknownProperty(name.to_string()));
        }
        Ok(self.insert(name))
    }
}

/// Per-element property values addressed by [`PropertyIndex`]
///
/// Owned by the caller and read-only to models. Indexing past the end panics:
/// the vector must be at least as long as the table that issued the indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyVector(Vec<f64>);

impl PropertyVector {
    /// Vector of `len` zeros
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Overwrite the value at `index`
    #[inline]
    pub fn set(&mut self, index: PropertyIndex, value: f64) {
        self.0[index.get()] = value;
    }

    /// Value at `index`, or `None` past the end
    #[inline]
    pub fn get(&self, index: PropertyIndex) -> Option<f64> {
        self.0.get(index.get()).copied()
    }

    /// Release the underlying buffer
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for PropertyVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Deref for PropertyVector {
    type Target = [f64];
    #[inline]
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl Index<PropertyIndex> for PropertyVector {
    type Output = f64;
    #[inline]
    fn index(&self, index: PropertyIndex) -> &f64 {
        &self.0[index.get()]
    }
}

impl IndexMut<PropertyIndex> for PropertyVector {
    #[inline]
    fn index_mut(&mut self, index: PropertyIndex) -> &mut f64 {
        &mut self.0[index.get()]
    }
}
