use crate::{
	chi_square,
	error::{Error, Result},
	feature_importances::compute_feature_importances,
	node::DecisionNode,
	traverse::{count_nodes, max_depth},
	TrainOptions,
};
use arbor_dataframe::Value;
use arbor_metrics::{Accuracy, StreamingMetric};
use ndarray::prelude::*;
use std::collections::VecDeque;

/// Construction logs its progress every time this many nodes have been processed.
const PROGRESS_INTERVAL: usize = 500;

/**
A `DecisionTree` owns its training data and its configuration. The root is created by `build_tree`, and the tree can be queried with `predict` and `calc_accuracy` afterward.
*/
#[derive(Clone, Debug)]
pub struct DecisionTree {
	data: Array2<Value>,
	root: Option<DecisionNode>,
	options: TrainOptions,
}

impl DecisionTree {
	/// `data` holds one example per row, with the label in the last column.
	pub fn new(data: Array2<Value>, options: TrainOptions) -> Self {
		Self {
			data,
			root: None,
			options,
		}
	}

	pub fn data(&self) -> ArrayView2<Value> {
		self.data.view()
	}

	pub fn options(&self) -> &TrainOptions {
		&self.options
	}

	pub fn root(&self) -> Result<&DecisionNode> {
		self.root.as_ref().ok_or(Error::NotBuilt)
	}

	/**
	Grow the tree. Nodes are split in breadth-first order starting from a root over the full training set, until every node is terminal. Each split node also records its feature importance.

	Calling `build_tree` again replaces the previous tree with an identical one.
	*/
	pub fn build_tree(&mut self) -> Result<()> {
		self.root = None;
		chi_square::validate_chi(self.options.chi)?;
		let n_total_sample = self.data.nrows();
		let mut root = DecisionNode::new(self.data.clone(), self.options, 0)?;
		let mut n_processed = 0;
		{
			let mut queue = VecDeque::new();
			queue.push_back(&mut root);
			while let Some(node) = queue.pop_front() {
				node.split()?;
				node.calc_feature_importance(n_total_sample)?;
				n_processed += 1;
				if n_processed % PROGRESS_INTERVAL == 0 {
					log::info!(
						"processed {} nodes; queue size = {}",
						n_processed,
						queue.len() + node.children.len()
					);
				}
				queue.extend(node.children.iter_mut());
			}
		}
		log::info!(
			"built a tree with {} nodes and depth {} using {}{}",
			n_processed,
			max_depth(&root),
			self.options.impurity,
			if self.options.gain_ratio {
				" gain ratio"
			} else {
				""
			},
		);
		self.root = Some(root);
		Ok(())
	}

	/**
	Predict the label of `instance`. The last value of `instance` is its label, which is ignored here.

	If the instance has a value for a node's split feature that none of the node's children saw during training, traversal stops and that node's own prediction is returned.
	*/
	pub fn predict(&self, instance: ArrayView1<Value>) -> Result<&Value> {
		let mut node = self.root()?;
		while !node.terminal {
			let feature = match node.feature {
				Some(feature) => feature,
				None => break,
			};
			let value = instance.get(feature).ok_or(Error::InstanceTooShort {
				len: instance.len(),
				feature,
			})?;
			match node
				.children_values
				.iter()
				.position(|child_value| child_value == value)
			{
				Some(index) => node = &node.children[index],
				None => break,
			}
		}
		Ok(&node.pred)
	}

	/// The percentage of rows in `dataset` whose predicted label equals the label in their last column.
	pub fn calc_accuracy(&self, dataset: ArrayView2<Value>) -> Result<f64> {
		if dataset.nrows() == 0 {
			return Err(Error::EmptyDataset);
		}
		let n_columns = dataset.ncols();
		if n_columns == 0 {
			return Err(Error::MissingLabelColumn { n_columns });
		}
		let mut accuracy = Accuracy::new();
		for row in dataset.outer_iter() {
			let prediction = self.predict(row.view())?;
			accuracy.update((prediction, &row[n_columns - 1]));
		}
		let accuracy = accuracy.finalize().ok_or(Error::EmptyDataset)?;
		Ok(100.0 * accuracy)
	}

	/// The depth of the deepest node.
	pub fn depth(&self) -> Result<usize> {
		Ok(max_depth(self.root()?))
	}

	pub fn n_nodes(&self) -> Result<usize> {
		Ok(count_nodes(self.root()?))
	}

	/// The sum of the importances recorded by the nodes that split on each feature, one entry per feature column.
	pub fn feature_importances(&self) -> Result<Vec<f64>> {
		let n_features = self.data.ncols().saturating_sub(1);
		Ok(compute_feature_importances(self.root()?, n_features))
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{node::test::example, Impurity};

	fn build(options: TrainOptions) -> DecisionTree {
		let mut tree = DecisionTree::new(example(), options);
		tree.build_tree().unwrap();
		tree
	}

	fn instance(values: &[&str]) -> Array1<Value> {
		values.iter().map(|value| Value::text(*value)).collect()
	}

	#[test]
	fn test_build_tree() {
		let tree = build(Default::default());
		assert_eq!(tree.n_nodes().unwrap(), 5);
		assert_eq!(tree.depth().unwrap(), 2);
		assert_eq!(tree.calc_accuracy(tree.data()).unwrap(), 100.0);
		let root = tree.root().unwrap();
		assert_eq!(root.feature(), Some(0));
		assert!(root.children()[1].is_terminal());
		assert_eq!(root.children()[0].feature(), Some(1));
	}

	#[test]
	fn test_predict() {
		let tree = build(Default::default());
		assert_eq!(
			tree.predict(instance(&["A", "1", "?"]).view()).unwrap(),
			&Value::text("yes")
		);
		assert_eq!(
			tree.predict(instance(&["B", "1", "?"]).view()).unwrap(),
			&Value::text("no")
		);
	}

	#[test]
	fn test_predict_unseen_value() {
		let tree = build(Default::default());
		// The root has no child for "C", so its own majority label is returned.
		assert_eq!(
			tree.predict(instance(&["C", "1", "yes"]).view()).unwrap(),
			&Value::text("no")
		);
		// The "A" node has no child for "3". Its rows are one "yes" and one "no", and the tie goes to "no".
		assert_eq!(
			tree.predict(instance(&["A", "3", "yes"]).view()).unwrap(),
			&Value::text("no")
		);
	}

	#[test]
	fn test_predict_before_build() {
		let tree = DecisionTree::new(example(), Default::default());
		assert_eq!(
			tree.predict(instance(&["A", "1", "yes"]).view()),
			Err(Error::NotBuilt)
		);
		assert_eq!(tree.n_nodes(), Err(Error::NotBuilt));
	}

	#[test]
	fn test_instance_too_short() {
		let tree = build(Default::default());
		assert_eq!(
			tree.predict(instance(&[]).view()),
			Err(Error::InstanceTooShort { len: 0, feature: 0 })
		);
	}

	#[test]
	fn test_max_depth_zero() {
		let tree = build(TrainOptions {
			max_depth: Some(0),
			..Default::default()
		});
		assert_eq!(tree.n_nodes().unwrap(), 1);
		assert!(tree.root().unwrap().is_terminal());
		assert_eq!(tree.calc_accuracy(tree.data()).unwrap(), 75.0);
	}

	#[test]
	fn test_max_depth_one() {
		let tree = build(TrainOptions {
			max_depth: Some(1),
			..Default::default()
		});
		let root = tree.root().unwrap();
		assert!(!root.is_terminal());
		assert!(root.children().iter().all(|child| child.is_terminal()));
		assert_eq!(tree.depth().unwrap(), 1);
		assert_eq!(tree.n_nodes().unwrap(), 3);
	}

	#[test]
	fn test_chi_pruning() {
		let pruned = build(TrainOptions {
			chi: 0.1,
			..Default::default()
		});
		assert_eq!(pruned.n_nodes().unwrap(), 1);
		let kept = build(TrainOptions {
			chi: 0.25,
			..Default::default()
		});
		assert_eq!(kept.n_nodes().unwrap(), 5);
		let never_pruned = build(TrainOptions {
			chi: chi_square::NEVER_PRUNE_P_VALUE,
			..Default::default()
		});
		assert_eq!(never_pruned.n_nodes().unwrap(), 5);
	}

	#[test]
	fn test_unsupported_p_value() {
		let mut tree = DecisionTree::new(
			example(),
			TrainOptions {
				chi: 0.3,
				..Default::default()
			},
		);
		assert_eq!(tree.build_tree(), Err(Error::UnsupportedPValue(0.3)));
		assert!(tree.root().is_err());
	}

	#[test]
	fn test_build_twice() {
		let options = TrainOptions {
			impurity: Impurity::Entropy,
			gain_ratio: true,
			..Default::default()
		};
		let mut tree = DecisionTree::new(example(), options);
		tree.build_tree().unwrap();
		let first = (
			tree.n_nodes().unwrap(),
			tree.depth().unwrap(),
			tree.calc_accuracy(tree.data()).unwrap(),
			tree.feature_importances().unwrap(),
		);
		tree.build_tree().unwrap();
		let second = (
			tree.n_nodes().unwrap(),
			tree.depth().unwrap(),
			tree.calc_accuracy(tree.data()).unwrap(),
			tree.feature_importances().unwrap(),
		);
		assert_eq!(first, second);
	}

	#[test]
	fn test_feature_importances() {
		let tree = build(Default::default());
		let feature_importances = tree.feature_importances().unwrap();
		assert_eq!(feature_importances.len(), 2);
		// The root splits all four rows on feature 0 with a goodness of 0.125. The "A" node splits two of them on feature 1 with a goodness of 0.5.
		assert!((feature_importances[0] - 0.125).abs() < 1e-12);
		assert!((feature_importances[1] - 0.25).abs() < 1e-12);
	}

	#[test]
	fn test_calc_accuracy_empty() {
		let tree = build(Default::default());
		let empty = Array2::<Value>::from_shape_vec((0, 3), vec![]).unwrap();
		assert_eq!(tree.calc_accuracy(empty.view()), Err(Error::EmptyDataset));
	}

	#[test]
	fn test_calc_accuracy() {
		let tree = build(TrainOptions {
			max_depth: Some(1),
			..Default::default()
		});
		let test = crate::node::test::dataset(&[
			["A", "1", "yes"],
			["A", "2", "yes"],
			["B", "1", "no"],
			["C", "1", "yes"],
		]);
		// Predictions are "no", "no", "no" and the root's "no".
		assert_eq!(tree.calc_accuracy(test.view()).unwrap(), 25.0);
	}
}
