//! Input data model: a variables x observations matrix and observation labels.

use std::collections::BTreeSet;
use std::fmt::Display;

use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, Ix2};
use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Immutable numeric table; rows are variables, columns are observations.
///
/// Names default to 1-based indices when not supplied.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Array2<f64>,
    variable_names: Vec<String>,
    observation_names: Vec<String>,
}

impl Matrix {
    /// Wrap a 2D array; empty dimensions are rejected
    pub fn new(data: Array2<f64>) -> PlotResult<Self> {
        let (n_vars, n_obs) = data.dim();
        if n_vars == 0 || n_obs == 0 {
            return Err(PlotError::Shape(format!(
                "matrix must have at least one variable and one observation, got {}x{}",
                n_vars, n_obs
            )));
        }
        Ok(Self {
            data,
            variable_names: default_names(n_vars),
            observation_names: default_names(n_obs),
        })
    }

    /// Accept an array of any dimensionality; only 2D is valid
    pub fn from_dyn(data: ArrayD<f64>) -> PlotResult<Self> {
        let ndim = data.ndim();
        let data = data.into_dimensionality::<Ix2>().map_err(|_| {
            PlotError::Shape(format!(
                "input must be 2-dimensional (variables x observations), got {} dimensions",
                ndim
            ))
        })?;
        Self::new(data)
    }

    /// Build from one `Vec` per variable; rows must all have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> PlotResult<Self> {
        let n_vars = rows.len();
        let n_obs = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_obs) {
            return Err(PlotError::Shape(format!(
                "row {} has {} observations, expected {}",
                i,
                row.len(),
                n_obs
            )));
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((n_vars, n_obs), flat)
            .map_err(|e| PlotError::Shape(e.to_string()))?;
        Self::new(data)
    }

    pub fn with_variable_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> PlotResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        check_names("variable", names.len(), self.n_variables())?;
        self.variable_names = names;
        Ok(self)
    }

    pub fn with_observation_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> PlotResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        check_names("observation", names.len(), self.n_observations())?;
        self.observation_names = names;
        Ok(self)
    }

    /// Number of variables (rows)
    pub fn n_variables(&self) -> usize {
        self.data.nrows()
    }

    /// Number of observations (columns)
    pub fn n_observations(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Observations of one variable
    pub fn variable(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    pub fn variable_name(&self, index: usize) -> &str {
        &self.variable_names[index]
    }

    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn observation_names(&self) -> &[String] {
        &self.observation_names
    }
}

fn default_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}

fn check_names(kind: &str, actual: usize, expected: usize) -> PlotResult<()> {
    if actual != expected {
        return Err(PlotError::Shape(format!(
            "got {} {} names for {} {}s",
            actual, kind, expected, kind
        )));
    }
    Ok(())
}

/// Categorical label per observation.
///
/// Distinct values are ordered by the natural order of the original label
/// type, so integer labels sort numerically and strings lexicographically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    groups: Vec<String>,
    codes: Vec<usize>,
}

impl Labels {
    pub fn new<T: Ord + Display>(values: &[T]) -> Self {
        let distinct: Vec<&T> = values.iter().collect::<BTreeSet<_>>().into_iter().collect();
        let codes = values
            .iter()
            .map(|v| distinct.binary_search(&v).unwrap_or_default())
            .collect();
        let groups = distinct.iter().map(|v| v.to_string()).collect();
        Self { groups, codes }
    }

    /// Number of labelled observations
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Distinct label values in group order
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Group index of every observation
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn test_default_names() {
        let m = Matrix::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.n_variables(), 2);
        assert_eq!(m.n_observations(), 3);
        assert_eq!(m.variable_names(), &["1", "2"]);
        assert_eq!(m.observation_names(), &["1", "2", "3"]);
    }

    #[test]
    fn test_named_matrix() {
        let m = Matrix::new(array![[1.0, 2.0], [3.0, 4.0]])
            .unwrap()
            .with_variable_names(["geneA", "geneB"])
            .unwrap();
        assert_eq!(m.variable_name(1), "geneB");

        let err = m.with_observation_names(["only-one"]).unwrap_err();
        assert!(matches!(err, PlotError::Shape(_)));
    }

    #[test]
    fn test_from_dyn_rejects_3d() {
        let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 3, 4]));
        let err = Matrix::from_dyn(cube).unwrap_err();
        assert!(matches!(err, PlotError::Shape(_)));

        let vector = ArrayD::<f64>::zeros(IxDyn(&[5]));
        assert!(Matrix::from_dyn(vector).is_err());

        let flat = ArrayD::<f64>::ones(IxDyn(&[2, 3]));
        assert_eq!(Matrix::from_dyn(flat).unwrap().n_observations(), 3);
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, PlotError::Shape(_)));
    }

    #[test]
    fn test_empty_matrix_rejected() {
        assert!(Matrix::from_rows(vec![]).is_err());
        assert!(Matrix::from_rows(vec![vec![], vec![]]).is_err());
    }

    #[test]
    fn test_variable_row() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.variable(1).to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_labels_natural_order() {
        let labels = Labels::new(&[10, 2, 10, 2, 7]);
        assert_eq!(labels.groups(), &["2", "7", "10"]);
        assert_eq!(labels.codes(), &[2, 0, 2, 0, 1]);
    }

    #[test]
    fn test_string_labels() {
        let labels = Labels::new(&["tumor", "normal", "tumor"]);
        assert_eq!(labels.groups(), &["normal", "tumor"]);
        assert_eq!(labels.n_groups(), 2);
        assert_eq!(labels.len(), 3);
    }
}
