/*!
This module defines the `Config` struct, which is read from the optional yaml file passed with `--config`. Every field is optional, and command line flags take precedence over the file.
*/

use anyhow::{Context, Result};
use arbor_tree::Impurity;
use std::path::Path;

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
	/// The name of the label column. Defaults to the last column.
	pub target: Option<String>,
	/// The fraction of rows held out for testing when a single file is given.
	pub test_fraction: Option<f64>,
	pub impurity: Option<Impurity>,
	pub gain_ratio: Option<bool>,
	pub max_depth: Option<usize>,
	pub chi: Option<f64>,
	/// The maximum depths tried by `arbor depth`.
	pub depths: Option<Vec<usize>>,
	/// The chi-square cutoffs tried by `arbor chi`.
	pub p_values: Option<Vec<f64>>,
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
	if let Some(config_path) = config_path {
		let config = std::fs::read_to_string(config_path)
			.with_context(|| format!("failed to read config file {}", config_path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", config_path.display()))?;
		Ok(config)
	} else {
		Ok(Config::default())
	}
}

#[test]
fn test_load_config() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	std::io::Write::write_all(
		&mut file,
		b"target: class\nimpurity: entropy\nmax_depth: 4\nchi: 0.05\ndepths: [1, 2]\n",
	)
	.unwrap();
	let config = load_config(Some(file.path())).unwrap();
	assert_eq!(config.target.as_deref(), Some("class"));
	assert_eq!(config.impurity, Some(Impurity::Entropy));
	assert_eq!(config.max_depth, Some(4));
	assert_eq!(config.chi, Some(0.05));
	assert_eq!(config.depths, Some(vec![1, 2]));
	assert_eq!(config.gain_ratio, None);
	assert!(load_config(None).unwrap().impurity.is_none());
}
