use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
	/// Impurity and accuracy are undefined for a dataset without rows.
	#[error("the dataset has no rows")]
	EmptyDataset,

	/// Every row needs at least one feature column followed by the label column.
	#[error("the dataset has {n_columns} columns but needs at least one feature column and a label column")]
	MissingLabelColumn { n_columns: usize },

	#[error("feature {feature} is out of range for a dataset with {n_features} features")]
	InvalidFeature { feature: usize, n_features: usize },

	#[error("the instance has {len} values but the tree reads column {feature}")]
	InstanceTooShort { len: usize, feature: usize },

	/// The tree was queried before `build_tree` was called.
	#[error("the tree has not been built")]
	NotBuilt,

	#[error("the chi cutoff must be a positive finite number, got {0}")]
	InvalidChi(f64),

	#[error("there is no column for p-value {0} in the chi-square table")]
	UnsupportedPValue(f64),

	#[error("there is no row for {degrees_of_freedom} degrees of freedom in the chi-square table")]
	DegreesOfFreedomOutOfRange { degrees_of_freedom: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
