/*!
This crate grows categorical decision trees. Every feature is split on its exact values, one child per value seen in the node's rows. A node stops splitting when no feature reduces impurity, when it reaches the maximum depth, or when a chi-square test judges its best split insignificant.

```
use arbor_dataframe::Value;
use arbor_tree::{DecisionTree, TrainOptions};
use ndarray::prelude::*;

let values = vec!["A", "yes", "A", "yes", "B", "no"]
	.into_iter()
	.map(|value| Value::text(value))
	.collect();
let data = Array2::from_shape_vec((3, 2), values).unwrap();
let mut tree = DecisionTree::new(data, TrainOptions::default());
tree.build_tree().unwrap();
assert_eq!(tree.calc_accuracy(tree.data()).unwrap(), 100.0);
```
*/

#![allow(clippy::tabs_in_doc_comments)]

pub mod chi_square;
mod decision_tree;
mod error;
mod feature_importances;
mod impurity;
mod node;
mod render;
mod traverse;

pub use self::decision_tree::DecisionTree;
pub use self::error::{Error, Result};
pub use self::feature_importances::compute_feature_importances;
pub use self::impurity::{class_counts, entropy, gini, Impurity};
pub use self::node::{DecisionNode, Groups};
pub use self::render::render;
pub use self::traverse::{count_nodes, max_depth, BreadthFirst};

/// These are the options passed to `DecisionTree::new`. Every node of the tree is created with a copy of them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct TrainOptions {
	/// The impurity function used to score splits.
	pub impurity: Impurity,
	/// If true, each split's goodness is divided by its split information.
	pub gain_ratio: bool,
	/// Nodes at this depth are never split. If it is `None`, depth is unbounded.
	pub max_depth: Option<usize>,
	/// The p-value cutoff for chi-square pruning. Values of 1 or more disable pruning. Smaller values must be one of `chi_square::P_VALUES`.
	pub chi: f64,
}

impl Default for TrainOptions {
	fn default() -> Self {
		Self {
			impurity: Impurity::Gini,
			gain_ratio: false,
			max_depth: None,
			chi: 1.0,
		}
	}
}
