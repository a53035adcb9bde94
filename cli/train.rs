use crate::{
	config::{load_config, Config},
	data::load_data,
	write_json, TrainArgs,
};
use anyhow::Result;
use arbor_tree::{render, DecisionTree, TrainOptions};
use std::collections::BTreeMap;

#[derive(Debug, serde::Serialize)]
struct TrainReport {
	options: TrainOptions,
	training_accuracy: f64,
	test_accuracy: f64,
	n_nodes: usize,
	depth: usize,
	feature_importances: BTreeMap<String, f64>,
}

/// Each option comes from its command line flag, then the config, then the default.
fn train_options(args: &TrainArgs, config: &Config) -> TrainOptions {
	let defaults = TrainOptions::default();
	TrainOptions {
		impurity: args
			.impurity
			.or(config.impurity)
			.unwrap_or(defaults.impurity),
		gain_ratio: args
			.gain_ratio
			.or(config.gain_ratio)
			.unwrap_or(defaults.gain_ratio),
		max_depth: args.max_depth.or(config.max_depth),
		chi: args.chi.or(config.chi).unwrap_or(defaults.chi),
	}
}

pub fn train(args: TrainArgs) -> Result<()> {
	let config = load_config(args.data.config.as_deref())?;
	let (train, test) = load_data(&args.data, &config)?;
	let options = train_options(&args, &config);

	let mut tree = DecisionTree::new(train.rows.clone(), options);
	tree.build_tree()?;

	let feature_importances = train
		.feature_names()
		.iter()
		.cloned()
		.zip(tree.feature_importances()?)
		.collect::<BTreeMap<_, _>>();
	let report = TrainReport {
		options,
		training_accuracy: tree.calc_accuracy(train.view())?,
		test_accuracy: tree.calc_accuracy(test.view())?,
		n_nodes: tree.n_nodes()?,
		depth: tree.depth()?,
		feature_importances,
	};

	if args.print_tree {
		println!("{}", render(tree.root()?, train.feature_names()));
	}
	println!("training accuracy: {:.2}%", report.training_accuracy);
	println!("test accuracy: {:.2}%", report.test_accuracy);
	println!("nodes: {}", report.n_nodes);
	println!("depth: {}", report.depth);
	println!("feature importances:");
	for (name, feature_importance) in train.feature_names().iter().zip(tree.feature_importances()?) {
		println!("  {}: {:.4}", name, feature_importance);
	}

	if let Some(output) = args.output.as_deref() {
		write_json(output, &report)?;
	}
	Ok(())
}

#[test]
fn test_train_options_flags_override_config() {
	let args = TrainArgs {
		data: crate::DataArgs {
			file: None,
			file_train: None,
			file_test: None,
			target: None,
			config: None,
		},
		impurity: None,
		gain_ratio: Some(false),
		max_depth: Some(2),
		chi: None,
		print_tree: false,
		output: None,
	};
	let config = Config {
		impurity: Some(arbor_tree::Impurity::Entropy),
		gain_ratio: Some(true),
		max_depth: Some(5),
		chi: Some(0.05),
		..Default::default()
	};
	let options = train_options(&args, &config);
	assert_eq!(
		options,
		TrainOptions {
			impurity: arbor_tree::Impurity::Entropy,
			gain_ratio: false,
			max_depth: Some(2),
			chi: 0.05,
		}
	);
	let args = TrainArgs {
		gain_ratio: None,
		..args
	};
	assert!(train_options(&args, &config).gain_ratio);
}
