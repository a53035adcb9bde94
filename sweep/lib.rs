/*!
This crate runs `arbor_tree` repeatedly over a range of settings and collects the resulting accuracies. It is how the impurity function, the maximum depth, and the chi-square cutoff are chosen for a dataset.

Every setting trains its own tree, so the settings are evaluated in parallel with rayon. Results are always returned in the order the settings were given.
*/

#![allow(clippy::tabs_in_doc_comments)]

use arbor_dataframe::Value;
use arbor_tree::{chi_square, DecisionTree, Impurity, Result, TrainOptions};
use ndarray::prelude::*;
use rayon::prelude::*;

/// The maximum depths tried by `depth_pruning` when none are given.
pub const DEFAULT_DEPTHS: [usize; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// The chi-square cutoffs tried by `chi_pruning` when none are given, in ascending order.
pub const DEFAULT_P_VALUES: [f64; 5] = [0.0001, 0.05, 0.1, 0.25, 0.5];

/// An impurity function together with whether gain ratio is used to score splits.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ImpurityChoice {
	pub impurity: Impurity,
	pub gain_ratio: bool,
}

impl ImpurityChoice {
	/// Every choice, in the order they are compared. Ties go to the earlier choice.
	pub const ALL: [ImpurityChoice; 4] = [
		ImpurityChoice {
			impurity: Impurity::Gini,
			gain_ratio: false,
		},
		ImpurityChoice {
			impurity: Impurity::Entropy,
			gain_ratio: false,
		},
		ImpurityChoice {
			impurity: Impurity::Gini,
			gain_ratio: true,
		},
		ImpurityChoice {
			impurity: Impurity::Entropy,
			gain_ratio: true,
		},
	];

	pub fn train_options(self, max_depth: Option<usize>, chi: f64) -> TrainOptions {
		TrainOptions {
			impurity: self.impurity,
			gain_ratio: self.gain_ratio,
			max_depth,
			chi,
		}
	}
}

impl std::fmt::Display for ImpurityChoice {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.gain_ratio {
			write!(f, "{}_gain", self.impurity)
		} else {
			write!(f, "{}", self.impurity)
		}
	}
}

/// The result of training one tree and evaluating it on the training and validation sets.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Evaluation {
	pub options: TrainOptions,
	pub training_accuracy: f64,
	pub validation_accuracy: f64,
	pub depth: usize,
	pub n_nodes: usize,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BestImpurityOutput {
	pub best: ImpurityChoice,
	/// One evaluation per entry of `ImpurityChoice::ALL`, in the same order.
	pub evaluations: Vec<(ImpurityChoice, Evaluation)>,
}

/// Train a tree on `train` with `options` and measure its accuracy on `train` and `validation`.
pub fn evaluate(
	train: ArrayView2<Value>,
	validation: ArrayView2<Value>,
	options: TrainOptions,
) -> Result<Evaluation> {
	let mut tree = DecisionTree::new(train.to_owned(), options);
	tree.build_tree()?;
	let evaluation = Evaluation {
		options,
		training_accuracy: tree.calc_accuracy(train)?,
		validation_accuracy: tree.calc_accuracy(validation)?,
		depth: tree.depth()?,
		n_nodes: tree.n_nodes()?,
	};
	log::info!(
		"{:?}: training accuracy {:.2}%, validation accuracy {:.2}%, {} nodes",
		options,
		evaluation.training_accuracy,
		evaluation.validation_accuracy,
		evaluation.n_nodes,
	);
	Ok(evaluation)
}

/// Train an unpruned tree for every `ImpurityChoice` and pick the one with the highest validation accuracy.
pub fn best_impurity(
	train: ArrayView2<Value>,
	validation: ArrayView2<Value>,
) -> Result<BestImpurityOutput> {
	let evaluations = ImpurityChoice::ALL
		.par_iter()
		.map(|choice| -> Result<(ImpurityChoice, Evaluation)> {
			let evaluation = evaluate(train, validation, choice.train_options(None, 1.0))?;
			Ok((*choice, evaluation))
		})
		.collect::<Result<Vec<_>>>()?;
	let mut best: Option<&(ImpurityChoice, Evaluation)> = None;
	for entry in evaluations.iter() {
		let is_better = match best {
			Some((_, best_evaluation)) => {
				entry.1.validation_accuracy > best_evaluation.validation_accuracy
			}
			None => true,
		};
		if is_better {
			best = Some(entry);
		}
	}
	let best = best.map(|(choice, _)| *choice).unwrap_or(ImpurityChoice::ALL[0]);
	Ok(BestImpurityOutput { best, evaluations })
}

/// Train one tree per maximum depth in `depths`, without chi-square pruning.
pub fn depth_pruning(
	train: ArrayView2<Value>,
	validation: ArrayView2<Value>,
	choice: ImpurityChoice,
	depths: &[usize],
) -> Result<Vec<Evaluation>> {
	depths
		.par_iter()
		.map(|max_depth| evaluate(train, validation, choice.train_options(Some(*max_depth), 1.0)))
		.collect()
}

/// Train one tree per chi-square cutoff in `p_values`, with unbounded depth.
pub fn chi_pruning(
	train: ArrayView2<Value>,
	validation: ArrayView2<Value>,
	choice: ImpurityChoice,
	p_values: &[f64],
) -> Result<Vec<Evaluation>> {
	for p_value in p_values.iter() {
		chi_square::validate_chi(*p_value)?;
	}
	p_values
		.par_iter()
		.map(|chi| evaluate(train, validation, choice.train_options(None, *chi)))
		.collect()
}

#[cfg(test)]
fn example() -> Array2<Value> {
	let rows = [
		["A", "1", "yes"],
		["A", "2", "no"],
		["B", "1", "no"],
		["B", "2", "no"],
	];
	let values = rows.iter().flatten().map(|value| Value::text(*value)).collect();
	Array2::from_shape_vec((4, 3), values).unwrap()
}

#[test]
fn test_best_impurity() {
	let data = example();
	let output = best_impurity(data.view(), data.view()).unwrap();
	assert_eq!(output.evaluations.len(), 4);
	for ((choice, evaluation), expected) in output.evaluations.iter().zip(ImpurityChoice::ALL.iter()) {
		assert_eq!(choice, expected);
		assert_eq!(evaluation.validation_accuracy, 100.0);
	}
	// Every choice fits the data, so the first one wins.
	assert_eq!(output.best, ImpurityChoice::ALL[0]);
	assert_eq!(output.best.to_string(), "gini");
	assert_eq!(ImpurityChoice::ALL[3].to_string(), "entropy_gain");
}

#[test]
fn test_depth_pruning() {
	let data = example();
	let evaluations = depth_pruning(data.view(), data.view(), ImpurityChoice::ALL[0], &[0, 1, 2, 3]).unwrap();
	let training_accuracies: Vec<f64> = evaluations.iter().map(|e| e.training_accuracy).collect();
	assert_eq!(training_accuracies, vec![75.0, 75.0, 100.0, 100.0]);
	let depths: Vec<usize> = evaluations.iter().map(|e| e.depth).collect();
	assert_eq!(depths, vec![0, 1, 2, 2]);
	assert_eq!(evaluations[1].options.max_depth, Some(1));
}

#[test]
fn test_chi_pruning() {
	let data = example();
	let evaluations = chi_pruning(data.view(), data.view(), ImpurityChoice::ALL[0], &DEFAULT_P_VALUES).unwrap();
	let n_nodes: Vec<usize> = evaluations.iter().map(|e| e.n_nodes).collect();
	assert_eq!(n_nodes, vec![5, 1, 1, 5, 5]);
	let depths: Vec<usize> = evaluations.iter().map(|e| e.depth).collect();
	assert_eq!(depths, vec![2, 0, 0, 2, 2]);
	assert!(chi_pruning(data.view(), data.view(), ImpurityChoice::ALL[0], &[0.3]).is_err());
}
