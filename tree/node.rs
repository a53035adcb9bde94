use crate::{
	chi_square,
	error::{Error, Result},
	impurity::class_counts,
	TrainOptions,
};
use arbor_dataframe::Value;
use arbor_metrics::{Metric, Mode};
use ndarray::prelude::*;
use std::collections::BTreeMap;

/// The rows of a node grouped by their value for one feature.
pub type Groups = BTreeMap<Value, Array2<Value>>;

/**
A `DecisionNode` owns the rows that reach it during training. It starts out undecided, and `split` turns it either into a terminal node or into an internal node with one child per value of the feature it splits on. That decision is made exactly once.
*/
#[derive(Clone, Debug)]
pub struct DecisionNode {
	pub(crate) data: Array2<Value>,
	pub(crate) terminal: bool,
	pub(crate) feature: Option<usize>,
	pub(crate) pred: Value,
	pub(crate) depth: usize,
	pub(crate) children: Vec<DecisionNode>,
	pub(crate) children_values: Vec<Value>,
	pub(crate) options: TrainOptions,
	pub(crate) feature_importance: f64,
}

impl DecisionNode {
	/// Create a node over `data`, whose last column holds the labels, and compute its prediction.
	pub fn new(data: Array2<Value>, options: TrainOptions, depth: usize) -> Result<Self> {
		let pred = majority_label(data.view())?;
		Ok(Self {
			data,
			terminal: false,
			feature: None,
			pred,
			depth,
			children: Vec::new(),
			children_values: Vec::new(),
			options,
			feature_importance: 0.0,
		})
	}

	pub fn data(&self) -> ArrayView2<Value> {
		self.data.view()
	}

	pub fn is_terminal(&self) -> bool {
		self.terminal
	}

	/// The column this node splits on. `None` until the node has split.
	pub fn feature(&self) -> Option<usize> {
		self.feature
	}

	/// The majority label of this node's rows.
	pub fn pred(&self) -> &Value {
		&self.pred
	}

	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn children(&self) -> &[DecisionNode] {
		&self.children
	}

	/// `children_values()[i]` is the feature value that routes an instance to `children()[i]`.
	pub fn children_values(&self) -> &[Value] {
		&self.children_values
	}

	pub fn feature_importance(&self) -> f64 {
		self.feature_importance
	}

	pub fn options(&self) -> &TrainOptions {
		&self.options
	}

	fn n_features(&self) -> usize {
		self.data.ncols() - 1
	}

	/// The majority label of this node's rows.
	pub fn calc_node_pred(&self) -> Result<Value> {
		majority_label(self.data.view())
	}

	pub fn add_child(&mut self, node: DecisionNode, value: Value) {
		self.children.push(node);
		self.children_values.push(value);
	}

	/**
	Compute how much a split on `feature` would reduce impurity, and the rows grouped by their value for `feature`.

	```text
	goodness = φ(S) − Σ_v (|S_v| / |S|)·φ(S_v)
	```

	If gain ratio is enabled, the goodness is divided by the split information, the entropy of the group sizes. A feature with a single value on this node has no split information and scores 0.
	*/
	pub fn goodness_of_split(&self, feature: usize) -> Result<(f64, Groups)> {
		let n_features = self.n_features();
		if feature >= n_features {
			return Err(Error::InvalidFeature {
				feature,
				n_features,
			});
		}
		let impurity = self.options.impurity;
		let phi = impurity.compute(self.data.view())?;
		let groups = group_by_feature(self.data.view(), feature);
		let n_rows = self.data.nrows() as f64;
		let mut weighted_impurity = 0.0;
		for subset in groups.values() {
			weighted_impurity += (subset.nrows() as f64 / n_rows) * impurity.compute(subset.view())?;
		}
		let goodness = phi - weighted_impurity;
		if !self.options.gain_ratio {
			return Ok((goodness, groups));
		}
		let mut split_information = 0.0;
		for subset in groups.values() {
			let p = subset.nrows() as f64 / n_rows;
			if p > 0.0 {
				split_information -= p * p.log2();
			}
		}
		let gain_ratio = if split_information > 0.0 {
			goodness / split_information
		} else {
			0.0
		};
		Ok((gain_ratio, groups))
	}

	/// Record the share of the total impurity reduction contributed by this node's split. `n_total_sample` is the number of rows in the full training set. Terminal nodes keep an importance of 0.
	pub fn calc_feature_importance(&mut self, n_total_sample: usize) -> Result<()> {
		let feature = match self.feature {
			Some(feature) if !self.terminal => feature,
			_ => return Ok(()),
		};
		let (goodness, _) = self.goodness_of_split(feature)?;
		self.feature_importance = (self.data.nrows() as f64 / n_total_sample as f64) * goodness;
		Ok(())
	}

	/**
	The chi-square statistic comparing the label distribution of each group with the label distribution of this node.

	For every group and every label present in this node, the expected count is the label's fraction in this node times the size of the group.
	*/
	pub fn compute_chi_square(&self, groups: &Groups) -> Result<f64> {
		let parent_counts = class_counts(self.data.view())?;
		let n_parent = self.data.nrows() as f64;
		let mut chi_square = 0.0;
		for subset in groups.values() {
			let subset_counts = class_counts(subset.view())?;
			let n_subset = subset.nrows() as f64;
			for (label, count) in parent_counts.iter() {
				let expected = (*count as f64 / n_parent) * n_subset;
				let observed = subset_counts.get(label).copied().unwrap_or(0) as f64;
				if expected > 0.0 {
					chi_square += (observed - expected).powi(2) / expected;
				}
			}
		}
		Ok(chi_square)
	}

	/**
	Decide whether this node is terminal, and if not, create its children.

	The feature with the highest score is chosen, with ties going to the lowest column index. The node becomes terminal if that score is not positive, if the node is at the maximum depth, or if chi-square pruning is enabled and the split on the best feature is not significant. Other features are not tried when the best one is pruned.
	*/
	pub fn split(&mut self) -> Result<()> {
		if self.terminal || !self.children.is_empty() {
			return Ok(());
		}
		let mut best: Option<(usize, f64, Groups)> = None;
		for feature in 0..self.n_features() {
			let (goodness, groups) = self.goodness_of_split(feature)?;
			let is_better = match &best {
				Some((_, best_goodness, _)) => goodness > *best_goodness,
				None => true,
			};
			if is_better {
				best = Some((feature, goodness, groups));
			}
		}
		let (feature, goodness, groups) = match best {
			Some(best) => best,
			None => {
				self.terminal = true;
				return Ok(());
			}
		};

		if goodness <= 0.0 || self.max_depth_reached() {
			self.terminal = true;
			return Ok(());
		}

		if !chi_square::pruning_disabled(self.options.chi) {
			let n_classes = class_counts(self.data.view())?.len();
			let degrees_of_freedom = (groups.len() - 1) * (n_classes - 1);
			let chi_square = self.compute_chi_square(&groups)?;
			if let Some(threshold) = chi_square::critical_value(degrees_of_freedom, self.options.chi)? {
				if chi_square < threshold {
					log::debug!(
						"pruned split on feature {} at depth {}: chi-square {:.4} < {}",
						feature,
						self.depth,
						chi_square,
						threshold,
					);
					self.terminal = true;
					return Ok(());
				}
			}
		}

		self.feature = Some(feature);
		for (value, subset) in groups.into_iter() {
			let child = DecisionNode::new(subset, self.options, self.depth + 1)?;
			self.add_child(child, value);
		}
		if self.children.is_empty() {
			self.terminal = true;
		}
		log::debug!(
			"split on feature {} at depth {} with score {:.6} into {} children",
			feature,
			self.depth,
			goodness,
			self.children.len(),
		);
		Ok(())
	}

	fn max_depth_reached(&self) -> bool {
		match self.options.max_depth {
			Some(max_depth) => self.depth >= max_depth,
			None => false,
		}
	}
}

/// The most frequent label in `data`. Ties go to the smallest label.
fn majority_label(data: ArrayView2<Value>) -> Result<Value> {
	let n_columns = data.ncols();
	if n_columns < 2 {
		return Err(Error::MissingLabelColumn { n_columns });
	}
	let labels = data.column(n_columns - 1).to_vec();
	Mode::<Value>::compute(labels.as_slice()).ok_or(Error::EmptyDataset)
}

/// Group the rows of `data` by their exact value in column `feature`.
fn group_by_feature(data: ArrayView2<Value>, feature: usize) -> Groups {
	let mut indexes: BTreeMap<&Value, Vec<usize>> = BTreeMap::new();
	for (index, value) in data.column(feature).into_iter().enumerate() {
		indexes.entry(value).or_insert_with(Vec::new).push(index);
	}
	indexes
		.into_iter()
		.map(|(value, indexes)| (value.clone(), data.select(Axis(0), &indexes)))
		.collect()
}

#[cfg(test)]
pub(crate) mod test {
	use super::*;
	use crate::Impurity;
	use maplit::btreemap;

	pub fn dataset(rows: &[[&str; 3]]) -> Array2<Value> {
		let values = rows.iter().flatten().map(|value| Value::text(*value)).collect();
		Array2::from_shape_vec((rows.len(), 3), values).unwrap()
	}

	pub fn example() -> Array2<Value> {
		dataset(&[
			["A", "1", "yes"],
			["A", "2", "no"],
			["B", "1", "no"],
			["B", "2", "no"],
		])
	}

	fn options(impurity: Impurity) -> TrainOptions {
		TrainOptions {
			impurity,
			..Default::default()
		}
	}

	#[test]
	fn test_goodness_of_split_gini() {
		let node = DecisionNode::new(example(), options(Impurity::Gini), 0).unwrap();
		let (goodness, groups) = node.goodness_of_split(0).unwrap();
		assert!((goodness - 0.125).abs() < 1e-12);
		let expected = btreemap! {
			Value::text("A") => dataset(&[["A", "1", "yes"], ["A", "2", "no"]]),
			Value::text("B") => dataset(&[["B", "1", "no"], ["B", "2", "no"]]),
		};
		assert_eq!(groups, expected);
	}

	#[test]
	fn test_goodness_of_split_entropy() {
		let node = DecisionNode::new(example(), options(Impurity::Entropy), 0).unwrap();
		let (goodness, _) = node.goodness_of_split(0).unwrap();
		let parent = -(0.25f64 * 0.25f64.log2() + 0.75 * 0.75f64.log2());
		assert!((goodness - (parent - 0.5)).abs() < 1e-12);
	}

	#[test]
	fn test_gain_ratio() {
		let options = TrainOptions {
			gain_ratio: true,
			..Default::default()
		};
		// Two groups of equal size have one bit of split information.
		let node = DecisionNode::new(example(), options, 0).unwrap();
		let (ratio, groups) = node.goodness_of_split(0).unwrap();
		assert!((ratio - 0.125).abs() < 1e-12);
		assert_eq!(groups.len(), 2);
		// A constant feature has no split information.
		let data = dataset(&[["A", "1", "yes"], ["A", "2", "no"]]);
		let node = DecisionNode::new(data, options, 0).unwrap();
		let (ratio, groups) = node.goodness_of_split(0).unwrap();
		assert_eq!(ratio, 0.0);
		assert_eq!(groups.len(), 1);
	}

	#[test]
	fn test_constant_feature_has_no_goodness() {
		let data = dataset(&[["A", "1", "yes"], ["A", "2", "no"], ["A", "2", "no"]]);
		let node = DecisionNode::new(data, options(Impurity::Entropy), 0).unwrap();
		let (goodness, _) = node.goodness_of_split(0).unwrap();
		assert_eq!(goodness, 0.0);
		let (goodness, _) = node.goodness_of_split(1).unwrap();
		assert!(goodness > 0.0);
	}

	#[test]
	fn test_invalid_feature() {
		let node = DecisionNode::new(example(), Default::default(), 0).unwrap();
		assert_eq!(
			node.goodness_of_split(2).unwrap_err(),
			Error::InvalidFeature {
				feature: 2,
				n_features: 2
			}
		);
	}

	#[test]
	fn test_pred_ties_go_to_smallest_label() {
		let data = dataset(&[["A", "1", "yes"], ["A", "2", "no"]]);
		let node = DecisionNode::new(data, Default::default(), 0).unwrap();
		assert_eq!(node.pred(), &Value::text("no"));
		assert_eq!(node.calc_node_pred().unwrap(), Value::text("no"));
	}

	#[test]
	fn test_empty_node() {
		let data = Array2::<Value>::from_shape_vec((0, 3), vec![]).unwrap();
		assert_eq!(
			DecisionNode::new(data, Default::default(), 0).unwrap_err(),
			Error::EmptyDataset
		);
		let data = Array2::<Value>::from_shape_vec((1, 1), vec![Value::text("yes")]).unwrap();
		assert_eq!(
			DecisionNode::new(data, Default::default(), 0).unwrap_err(),
			Error::MissingLabelColumn { n_columns: 1 }
		);
	}

	#[test]
	fn test_split() {
		let mut node = DecisionNode::new(example(), Default::default(), 0).unwrap();
		node.split().unwrap();
		assert!(!node.is_terminal());
		// Both features score 0.125, so the first one wins.
		assert_eq!(node.feature(), Some(0));
		assert_eq!(
			node.children_values(),
			&[Value::text("A"), Value::text("B")][..]
		);
		assert_eq!(node.children().len(), node.children_values().len());
		for child in node.children() {
			assert_eq!(child.depth(), 1);
			assert_eq!(child.options(), node.options());
		}
		assert_eq!(node.children()[1].data().nrows(), 2);
		// The decision is made once.
		node.split().unwrap();
		assert_eq!(node.children().len(), 2);
	}

	#[test]
	fn test_pure_node_is_terminal() {
		let data = dataset(&[["A", "1", "no"], ["B", "2", "no"]]);
		let mut node = DecisionNode::new(data, Default::default(), 0).unwrap();
		node.split().unwrap();
		assert!(node.is_terminal());
		assert!(node.children().is_empty());
		assert_eq!(node.feature(), None);
	}

	#[test]
	fn test_max_depth() {
		let options = TrainOptions {
			max_depth: Some(2),
			..Default::default()
		};
		let mut node = DecisionNode::new(example(), options, 2).unwrap();
		node.split().unwrap();
		assert!(node.is_terminal());
		let mut node = DecisionNode::new(example(), options, 1).unwrap();
		node.split().unwrap();
		assert!(!node.is_terminal());
	}

	#[test]
	fn test_compute_chi_square() {
		let node = DecisionNode::new(example(), Default::default(), 0).unwrap();
		let (_, groups) = node.goodness_of_split(0).unwrap();
		let chi_square = node.compute_chi_square(&groups).unwrap();
		assert!((chi_square - 4.0 / 3.0).abs() < 1e-12);
	}

	#[test]
	fn test_chi_pruning() {
		// The root split has a chi-square statistic of 4/3 with one degree of freedom.
		let split_with = |chi: f64| {
			let options = TrainOptions {
				chi,
				..Default::default()
			};
			let mut node = DecisionNode::new(example(), options, 0).unwrap();
			node.split().unwrap();
			node.is_terminal()
		};
		assert!(!split_with(0.5));
		assert!(!split_with(0.25));
		assert!(split_with(0.1));
		assert!(split_with(0.05));
		assert!(!split_with(chi_square::NEVER_PRUNE_P_VALUE));
		assert!(!split_with(1.0));
	}

	#[test]
	fn test_degrees_of_freedom_out_of_range() {
		// Thirteen distinct values and two classes give twelve degrees of freedom.
		let rows: Vec<[String; 3]> = (0..13)
			.map(|i| {
				let label = if i % 2 == 0 { "yes" } else { "no" };
				[i.to_string(), "x".to_owned(), label.to_owned()]
			})
			.collect();
		let values = rows.iter().flatten().map(|value| Value::text(value.as_str())).collect();
		let data = Array2::from_shape_vec((13, 3), values).unwrap();
		let options = TrainOptions {
			chi: 0.5,
			..Default::default()
		};
		let mut node = DecisionNode::new(data.clone(), options, 0).unwrap();
		assert_eq!(
			node.split().unwrap_err(),
			Error::DegreesOfFreedomOutOfRange {
				degrees_of_freedom: 12
			}
		);
		// Without pruning the same node splits.
		let mut node = DecisionNode::new(data, Default::default(), 0).unwrap();
		node.split().unwrap();
		assert_eq!(node.children().len(), 13);
	}

	#[test]
	fn test_feature_importance() {
		let mut node = DecisionNode::new(example(), Default::default(), 0).unwrap();
		node.calc_feature_importance(8).unwrap();
		assert_eq!(node.feature_importance(), 0.0);
		node.split().unwrap();
		node.calc_feature_importance(8).unwrap();
		assert!((node.feature_importance() - 0.5 * 0.125).abs() < 1e-12);
	}
}
