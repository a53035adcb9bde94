use crate::{config::load_config, data::load_data, write_json, SweepArgs};
use anyhow::Result;
use arbor_dataframe::DataFrame;
use arbor_sweep::{
	best_impurity, chi_pruning, depth_pruning, Evaluation, ImpurityChoice, DEFAULT_DEPTHS,
	DEFAULT_P_VALUES,
};

pub fn impurity(args: SweepArgs) -> Result<()> {
	let config = load_config(args.data.config.as_deref())?;
	let (train, test) = load_data(&args.data, &config)?;
	let output = best_impurity(train.view(), test.view())?;
	println!("{:<14}{:>12}{:>12}", "impurity", "training", "validation");
	for (choice, evaluation) in output.evaluations.iter() {
		println!(
			"{:<14}{:>11.2}%{:>11.2}%",
			choice.to_string(),
			evaluation.training_accuracy,
			evaluation.validation_accuracy
		);
	}
	println!("best: {}", output.best);
	if let Some(path) = args.output.as_deref() {
		write_json(path, &output)?;
	}
	Ok(())
}

pub fn depth(args: SweepArgs) -> Result<()> {
	let config = load_config(args.data.config.as_deref())?;
	let (train, test) = load_data(&args.data, &config)?;
	let choice = choose_impurity(&args, &train, &test)?;
	let depths = config
		.depths
		.clone()
		.unwrap_or_else(|| DEFAULT_DEPTHS.to_vec());
	let evaluations = depth_pruning(train.view(), test.view(), choice, &depths)?;
	println!("{:<10}{:>12}{:>12}{:>8}", "max depth", "training", "validation", "nodes");
	for (max_depth, evaluation) in depths.iter().zip(evaluations.iter()) {
		println!(
			"{:<10}{:>11.2}%{:>11.2}%{:>8}",
			max_depth, evaluation.training_accuracy, evaluation.validation_accuracy, evaluation.n_nodes
		);
	}
	finish(&args, &evaluations)
}

pub fn chi(args: SweepArgs) -> Result<()> {
	let config = load_config(args.data.config.as_deref())?;
	let (train, test) = load_data(&args.data, &config)?;
	let choice = choose_impurity(&args, &train, &test)?;
	let p_values = config
		.p_values
		.clone()
		.unwrap_or_else(|| DEFAULT_P_VALUES.to_vec());
	let evaluations = chi_pruning(train.view(), test.view(), choice, &p_values)?;
	println!(
		"{:<10}{:>12}{:>12}{:>8}{:>8}",
		"chi", "training", "validation", "depth", "nodes"
	);
	for (chi, evaluation) in p_values.iter().zip(evaluations.iter()) {
		println!(
			"{:<10}{:>11.2}%{:>11.2}%{:>8}{:>8}",
			chi,
			evaluation.training_accuracy,
			evaluation.validation_accuracy,
			evaluation.depth,
			evaluation.n_nodes
		);
	}
	finish(&args, &evaluations)
}

/// Use the impurity given on the command line, or the one with the best validation accuracy.
fn choose_impurity(args: &SweepArgs, train: &DataFrame, test: &DataFrame) -> Result<ImpurityChoice> {
	let choice = match args.impurity {
		Some(impurity) => ImpurityChoice {
			impurity,
			gain_ratio: args.gain_ratio,
		},
		None => best_impurity(train.view(), test.view())?.best,
	};
	log::info!("using {}", choice);
	Ok(choice)
}

fn finish(args: &SweepArgs, evaluations: &[Evaluation]) -> Result<()> {
	if let Some(path) = args.output.as_deref() {
		write_json(path, &evaluations)?;
	}
	Ok(())
}
