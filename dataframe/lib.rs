/*!
This crate provides the two dimensional tables that `arbor` trains and evaluates decision trees on. A `DataFrame` is a list of column names plus an `ndarray::Array2<Value>` holding one example per row. By convention, the last column holds the label.
*/

#![allow(clippy::tabs_in_doc_comments)]

use anyhow::{bail, format_err, Result};
use itertools::Itertools;
use ndarray::prelude::*;

pub mod load;
mod value;

pub use self::value::{NotFiniteError, Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
	pub column_names: Vec<String>,
	pub rows: Array2<Value>,
}

impl DataFrame {
	pub fn new(column_names: Vec<String>, rows: Array2<Value>) -> Result<Self> {
		if column_names.len() != rows.ncols() {
			bail!(
				"expected {} columns but the rows have {}",
				column_names.len(),
				rows.ncols()
			);
		}
		Ok(Self { column_names, rows })
	}

	/// Create a `DataFrame` from a `Vec` of rows. Every row must have one value per column name.
	pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
		let n_columns = column_names.len();
		let n_rows = rows.len();
		if let Some((index, row)) = rows
			.iter()
			.enumerate()
			.find(|(_, row)| row.len() != n_columns)
		{
			bail!(
				"row {} has {} values but there are {} columns",
				index,
				row.len(),
				n_columns
			);
		}
		let values = rows.into_iter().flatten().collect();
		let rows = Array2::from_shape_vec((n_rows, n_columns), values)?;
		Self::new(column_names, rows)
	}

	pub fn ncols(&self) -> usize {
		self.rows.ncols()
	}

	pub fn nrows(&self) -> usize {
		self.rows.nrows()
	}

	pub fn view(&self) -> ArrayView2<Value> {
		self.rows.view()
	}

	/// The names of every column except the label column.
	pub fn feature_names(&self) -> &[String] {
		let n = self.column_names.len().saturating_sub(1);
		&self.column_names[..n]
	}

	pub fn label_name(&self) -> Option<&str> {
		self.column_names.last().map(|name| name.as_str())
	}

	/// Move the column named `target` to the end so it becomes the label column.
	pub fn with_target(self, target: &str) -> Result<Self> {
		let target_index = self
			.column_names
			.iter()
			.position(|name| name == target)
			.ok_or_else(|| format_err!("did not find target column \"{}\"", target))?;
		let order = (0..self.ncols())
			.filter(|index| *index != target_index)
			.chain(std::iter::once(target_index))
			.collect_vec();
		let column_names = order
			.iter()
			.map(|index| self.column_names[*index].clone())
			.collect();
		let rows = self.rows.select(Axis(1), &order);
		Ok(Self { column_names, rows })
	}

	/// Split the rows into the first `index` rows and the rest.
	pub fn split_at_row(&self, index: usize) -> (Self, Self) {
		let index = index.min(self.nrows());
		let head = self.rows.select(Axis(0), &(0..index).collect_vec());
		let tail = self.rows.select(Axis(0), &(index..self.nrows()).collect_vec());
		(
			Self {
				column_names: self.column_names.clone(),
				rows: head,
			},
			Self {
				column_names: self.column_names.clone(),
				rows: tail,
			},
		)
	}
}

#[cfg(test)]
fn names(names: &[&str]) -> Vec<String> {
	names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_from_rows_ragged() {
	let result = DataFrame::from_rows(
		names(&["a", "label"]),
		vec![
			vec![Value::text("x"), Value::text("yes")],
			vec![Value::text("y")],
		],
	);
	assert!(result.is_err());
}

#[test]
fn test_with_target() {
	let df = DataFrame::from_rows(
		names(&["label", "a", "b"]),
		vec![
			vec![Value::text("yes"), Value::from(1), Value::text("x")],
			vec![Value::text("no"), Value::from(2), Value::text("y")],
		],
	)
	.unwrap()
	.with_target("label")
	.unwrap();
	assert_eq!(df.column_names, names(&["a", "b", "label"]));
	assert_eq!(df.feature_names(), &names(&["a", "b"])[..]);
	assert_eq!(df.label_name(), Some("label"));
	assert_eq!(
		df.rows.row(1).to_vec(),
		vec![Value::from(2), Value::text("y"), Value::text("no")]
	);
	assert!(df.with_target("missing").is_err());
}

#[test]
fn test_split_at_row() {
	let df = DataFrame::from_rows(
		names(&["a", "label"]),
		(0..5)
			.map(|i| vec![Value::from(i), Value::text("yes")])
			.collect(),
	)
	.unwrap();
	let (train, test) = df.split_at_row(4);
	assert_eq!(train.nrows(), 4);
	assert_eq!(test.nrows(), 1);
	assert_eq!(test.rows[[0, 0]], Value::from(4));
	let (all, none) = df.split_at_row(10);
	assert_eq!(all.nrows(), 5);
	assert_eq!(none.nrows(), 0);
	assert_eq!(none.ncols(), 2);
	let (none, all) = df.split_at_row(0);
	assert_eq!(none.nrows(), 0);
	assert_eq!(none.ncols(), 2);
	assert_eq!(all.rows, df.rows);
}
