use crate::error::{Error, Result};
use arbor_dataframe::Value;
use ndarray::prelude::*;
use std::collections::BTreeMap;

/// The function used to measure how mixed the labels of a dataset are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Impurity {
	Gini,
	Entropy,
}

impl Impurity {
	/// Compute this impurity for `data`, whose last column holds the labels.
	pub fn compute(self, data: ArrayView2<Value>) -> Result<f64> {
		match self {
			Impurity::Gini => gini(data),
			Impurity::Entropy => entropy(data),
		}
	}
}

impl std::fmt::Display for Impurity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			Impurity::Gini => "gini",
			Impurity::Entropy => "entropy",
		};
		write!(f, "{}", s)
	}
}

/// Count how many rows of `data` have each label. The labels are the values in the last column.
pub fn class_counts<'a>(data: ArrayView2<'a, Value>) -> Result<BTreeMap<&'a Value, usize>> {
	let n_columns = data.ncols();
	if n_columns == 0 {
		return Err(Error::MissingLabelColumn { n_columns });
	}
	let labels = data.index_axis_move(Axis(1), n_columns - 1);
	let mut counts = BTreeMap::new();
	for label in labels.into_iter() {
		*counts.entry(label).or_insert(0) += 1;
	}
	Ok(counts)
}

/**
Compute the Gini impurity of `data`.

```text
G = 1 − Σ_c p_c²
```

`G` is 0 when every row has the same label and at most `1 − 1/k` for `k` classes.
*/
pub fn gini(data: ArrayView2<Value>) -> Result<f64> {
	let n = data.nrows();
	if n == 0 {
		return Err(Error::EmptyDataset);
	}
	let n = n as f64;
	let sum_sq: f64 = class_counts(data)?
		.values()
		.map(|count| {
			let p = *count as f64 / n;
			p * p
		})
		.sum();
	Ok(1.0 - sum_sq)
}

/**
Compute the Shannon entropy of the labels of `data` in bits.

```text
H = −Σ_c p_c·log2(p_c)
```

Only classes present in `data` contribute, so `log2(0)` never occurs.
*/
pub fn entropy(data: ArrayView2<Value>) -> Result<f64> {
	let n = data.nrows();
	if n == 0 {
		return Err(Error::EmptyDataset);
	}
	let n = n as f64;
	let sum: f64 = class_counts(data)?
		.values()
		.filter(|count| **count > 0)
		.map(|count| {
			let p = *count as f64 / n;
			p * p.log2()
		})
		.sum();
	Ok(-sum)
}

#[cfg(test)]
fn labels(labels: &[&str]) -> Array2<Value> {
	let values = labels
		.iter()
		.flat_map(|label| vec![Value::text("f"), Value::text(*label)])
		.collect();
	Array2::from_shape_vec((labels.len(), 2), values).unwrap()
}

#[test]
fn test_pure() {
	let data = labels(&["yes", "yes", "yes"]);
	assert_eq!(gini(data.view()).unwrap(), 0.0);
	assert_eq!(entropy(data.view()).unwrap(), 0.0);
}

#[test]
fn test_gini() {
	let data = labels(&["yes", "no", "no", "no"]);
	assert!((gini(data.view()).unwrap() - 0.375).abs() < 1e-12);
	let data = labels(&["a", "b", "c"]);
	assert!((gini(data.view()).unwrap() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_entropy() {
	let data = labels(&["a", "b", "c", "d"]);
	assert!((entropy(data.view()).unwrap() - 2.0).abs() < 1e-12);
	let data = labels(&["yes", "no", "no", "no"]);
	let expected = -(0.25f64 * 0.25f64.log2() + 0.75 * 0.75f64.log2());
	assert!((entropy(data.view()).unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_bounds() {
	let data = labels(&["a", "b", "b", "c", "c", "c", "a", "b"]);
	let k = 3.0f64;
	let g = gini(data.view()).unwrap();
	let h = entropy(data.view()).unwrap();
	assert!(g >= 0.0 && g <= 1.0 - 1.0 / k);
	assert!(h >= 0.0 && h <= k.log2());
}

#[test]
fn test_empty() {
	let data = Array2::<Value>::from_shape_vec((0, 2), vec![]).unwrap();
	assert_eq!(gini(data.view()), Err(Error::EmptyDataset));
	assert_eq!(Impurity::Entropy.compute(data.view()), Err(Error::EmptyDataset));
}
