use crate::{config::Config, DataArgs};
use anyhow::{bail, Result};
use arbor_dataframe::DataFrame;
use std::path::Path;

const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Load the training and test sets described by the command line arguments and the config. The label column is moved to the end of both.
pub fn load_data(args: &DataArgs, config: &Config) -> Result<(DataFrame, DataFrame)> {
	let target = args.target.as_deref().or_else(|| config.target.as_deref());
	let (train, test) = match (&args.file, &args.file_train, &args.file_test) {
		(Some(file), _, _) => {
			let test_fraction = config.test_fraction.unwrap_or(DEFAULT_TEST_FRACTION);
			if !(test_fraction > 0.0 && test_fraction < 1.0) {
				bail!("test_fraction must be between 0 and 1, got {}", test_fraction);
			}
			let dataframe = load(file, target)?;
			let n_rows_train = (dataframe.nrows() as f64 * (1.0 - test_fraction)).round() as usize;
			dataframe.split_at_row(n_rows_train)
		}
		(None, Some(file_train), Some(file_test)) => {
			let (train, test) = DataFrame::from_path_pair(file_train, file_test)?;
			(with_target(train, target)?, with_target(test, target)?)
		}
		_ => bail!("pass either --file or both --file-train and --file-test"),
	};
	if train.nrows() == 0 {
		bail!("the training set has no rows");
	}
	if test.nrows() == 0 {
		bail!("the test set has no rows");
	}
	if train.ncols() < 2 {
		bail!("the data needs at least one feature column and a label column");
	}
	Ok((train, test))
}

fn load(path: &Path, target: Option<&str>) -> Result<DataFrame> {
	with_target(DataFrame::from_path(path)?, target)
}

fn with_target(dataframe: DataFrame, target: Option<&str>) -> Result<DataFrame> {
	match target {
		Some(target) => dataframe.with_target(target),
		None => Ok(dataframe),
	}
}

#[test]
fn test_load_data_split() {
	let mut csv = String::from("class,cap,odor\n");
	for i in 0..10 {
		let class = if i % 2 == 0 { "e" } else { "p" };
		csv.push_str(&format!("{},x,{}\n", class, i % 3));
	}
	let file = write_csv(&csv);
	let args = DataArgs {
		file: Some(file.path().to_owned()),
		file_train: None,
		file_test: None,
		target: Some("class".to_owned()),
		config: None,
	};
	let (train, test) = load_data(&args, &Config::default()).unwrap();
	assert_eq!(train.nrows(), 8);
	assert_eq!(test.nrows(), 2);
	assert_eq!(train.column_names, vec!["cap", "odor", "class"]);
}

#[test]
fn test_load_data_requires_files() {
	let args = DataArgs {
		file: None,
		file_train: None,
		file_test: None,
		target: None,
		config: None,
	};
	assert!(load_data(&args, &Config::default()).is_err());
}

#[cfg(test)]
fn write_csv(csv: &str) -> tempfile::NamedTempFile {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	std::io::Write::write_all(&mut file, csv.as_bytes()).unwrap();
	file
}

#[test]
fn test_load_data_small_test_fraction() {
	let mut csv = String::from("cap,class\n");
	for i in 0..10 {
		csv.push_str(&format!("x,{}\n", if i % 2 == 0 { "e" } else { "p" }));
	}
	let file = write_csv(&csv);
	let args = DataArgs {
		file: Some(file.path().to_owned()),
		file_train: None,
		file_test: None,
		target: None,
		config: None,
	};
	let config = Config {
		test_fraction: Some(0.01),
		..Default::default()
	};
	let error = load_data(&args, &config).unwrap_err();
	assert_eq!(error.to_string(), "the test set has no rows");
}

#[test]
fn test_load_data_train_and_test_share_column_types() {
	let train = write_csv("size,class\n1,yes\n2,no\n1,yes\n2,no\n");
	let test = write_csv("class,size\nyes,1\nno,2\nno,?\n");
	let args = DataArgs {
		file: None,
		file_train: Some(train.path().to_owned()),
		file_test: Some(test.path().to_owned()),
		target: Some("class".to_owned()),
		config: None,
	};
	assert!(load_data(&args, &Config::default()).is_err());

	let test = write_csv("size,class\n1,yes\n2,no\n?,no\n");
	let args = DataArgs {
		file_test: Some(test.path().to_owned()),
		..args
	};
	let (train, test) = load_data(&args, &Config::default()).unwrap();
	assert_eq!(train.rows[[0, 0]], test.rows[[0, 0]]);
	let mut tree = arbor_tree::DecisionTree::new(train.rows.clone(), Default::default());
	tree.build_tree().unwrap();
	assert_eq!(tree.calc_accuracy(test.view()).unwrap(), 100.0);
}
