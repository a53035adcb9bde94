//! This module contains the main entrypoint to the arbor cli.

use anyhow::Result;
use arbor_tree::Impurity;
use clap::{Args, Parser};
use colored::Colorize;
use std::path::PathBuf;

mod config;
mod data;
mod sweep;
mod train;

#[derive(Parser)]
#[command(
	name = "arbor",
	about = "Grow, prune, and evaluate categorical decision trees.",
	disable_help_subcommand = true
)]
enum Options {
	#[command(name = "train", about = "train a tree and report its accuracy")]
	Train(Box<TrainArgs>),
	#[command(
		name = "impurity",
		about = "compare gini and entropy, with and without gain ratio"
	)]
	Impurity(Box<SweepArgs>),
	#[command(name = "depth", about = "sweep the maximum depth")]
	Depth(Box<SweepArgs>),
	#[command(name = "chi", about = "sweep the chi-square pruning cutoff")]
	Chi(Box<SweepArgs>),
}

#[derive(Args, Debug)]
pub struct DataArgs {
	/// the path to a .csv file that is split into training and test sets
	#[arg(short, long, conflicts_with_all = ["file_train", "file_test"])]
	pub file: Option<PathBuf>,
	/// the path to the .csv file used for training
	#[arg(long, requires = "file_test")]
	pub file_train: Option<PathBuf>,
	/// the path to the .csv file used for testing
	#[arg(long, requires = "file_train")]
	pub file_test: Option<PathBuf>,
	/// the name of the label column, defaults to the last column
	#[arg(short, long)]
	pub target: Option<String>,
	/// the path to a yaml config file
	#[arg(short, long)]
	pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
	#[command(flatten)]
	pub data: DataArgs,
	/// gini or entropy
	#[arg(long, value_parser = parse_impurity)]
	pub impurity: Option<Impurity>,
	/// score splits by gain ratio, pass false to turn it off when the config turns it on
	#[arg(long, num_args = 0..=1, default_missing_value = "true")]
	pub gain_ratio: Option<bool>,
	/// the maximum depth of the tree
	#[arg(long)]
	pub max_depth: Option<usize>,
	/// the p-value cutoff for chi-square pruning, 1 disables pruning
	#[arg(long)]
	pub chi: Option<f64>,
	/// print the tree
	#[arg(long)]
	pub print_tree: bool,
	/// write a json report to this path
	#[arg(short, long)]
	pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SweepArgs {
	#[command(flatten)]
	pub data: DataArgs,
	/// use this impurity instead of the one with the best validation accuracy
	#[arg(long, value_parser = parse_impurity)]
	pub impurity: Option<Impurity>,
	/// with --impurity, score splits by gain ratio
	#[arg(long)]
	pub gain_ratio: bool,
	/// write the results as json to this path
	#[arg(short, long)]
	pub output: Option<PathBuf>,
}

fn parse_impurity(value: &str) -> Result<Impurity, String> {
	match value {
		"gini" => Ok(Impurity::Gini),
		"entropy" => Ok(Impurity::Entropy),
		_ => Err(format!("unknown impurity \"{}\", expected gini or entropy", value)),
	}
}

fn main() {
	let env = env_logger::Env::default().default_filter_or("arbor=info,arbor_tree=info,arbor_sweep=info");
	env_logger::Builder::from_env(env)
		.format_level(false)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
	let options = Options::parse();
	let result = match options {
		Options::Train(args) => train::train(*args),
		Options::Impurity(args) => sweep::impurity(*args),
		Options::Depth(args) => sweep::depth(*args),
		Options::Chi(args) => sweep::chi(*args),
	};
	if let Err(error) = result {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

/// Write `value` as pretty printed json to `path`.
pub fn write_json<T>(path: &std::path::Path, value: &T) -> Result<()>
where
	T: serde::Serialize,
{
	let file = std::fs::File::create(path)?;
	serde_json::to_writer_pretty(file, value)?;
	eprintln!("The results were written to {}.", path.display());
	Ok(())
}

#[test]
fn test_parse_options() {
	let options = Options::try_parse_from(&[
		"arbor",
		"train",
		"--file-train",
		"train.csv",
		"--file-test",
		"test.csv",
		"--impurity",
		"entropy",
		"--max-depth",
		"3",
	])
	.unwrap();
	match options {
		Options::Train(args) => {
			assert_eq!(args.impurity, Some(Impurity::Entropy));
			assert_eq!(args.max_depth, Some(3));
			assert_eq!(args.gain_ratio, None);
		}
		_ => panic!("expected the train subcommand"),
	}
	let gain_ratio = |flags: &[&str]| {
		let mut args = vec!["arbor", "train", "--file", "data.csv"];
		args.extend_from_slice(flags);
		match Options::try_parse_from(args).unwrap() {
			Options::Train(args) => args.gain_ratio,
			_ => panic!("expected the train subcommand"),
		}
	};
	assert_eq!(gain_ratio(&["--gain-ratio"]), Some(true));
	assert_eq!(gain_ratio(&["--gain-ratio", "false"]), Some(false));
	assert_eq!(gain_ratio(&["--gain-ratio=true"]), Some(true));
	assert!(Options::try_parse_from(&["arbor", "train", "--file-train", "train.csv"]).is_err());
	assert!(Options::try_parse_from(&["arbor", "depth", "--impurity", "variance"]).is_err());
}
