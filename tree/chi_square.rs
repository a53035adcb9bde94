/*!
The chi-square critical values used to decide whether a split is statistically significant.
*/

use crate::error::{Error, Result};

/// The p-value cutoffs that have a column in the table, in column order.
pub const P_VALUES: [f64; 5] = [0.5, 0.25, 0.1, 0.05, 0.0001];

/// The p-value cutoff whose column is the "never prune" sentinel.
pub const NEVER_PRUNE_P_VALUE: f64 = 0.0001;

/// Row `i` holds the critical values for `i + 1` degrees of freedom. `None` marks the sentinel column.
static CHI_TABLE: [[Option<f64>; 5]; 11] = [
	[Some(0.45), Some(1.32), Some(2.71), Some(3.84), None],
	[Some(1.39), Some(2.77), Some(4.60), Some(5.99), None],
	[Some(2.37), Some(4.11), Some(6.25), Some(7.82), None],
	[Some(3.36), Some(5.38), Some(7.78), Some(9.49), None],
	[Some(4.35), Some(6.63), Some(9.24), Some(11.07), None],
	[Some(5.35), Some(7.84), Some(10.64), Some(12.59), None],
	[Some(6.35), Some(9.04), Some(12.01), Some(14.07), None],
	[Some(7.34), Some(10.22), Some(13.36), Some(15.51), None],
	[Some(8.34), Some(11.39), Some(14.68), Some(16.92), None],
	[Some(9.34), Some(12.55), Some(15.99), Some(18.31), None],
	[Some(10.34), Some(13.7), Some(17.27), Some(19.68), None],
];

/// Returns true if the cutoff disables chi-square pruning entirely.
pub fn pruning_disabled(chi: f64) -> bool {
	chi >= 1.0
}

/// Check that `chi` is either a cutoff that disables pruning or a p-value with a column in the table.
pub fn validate_chi(chi: f64) -> Result<()> {
	if !chi.is_finite() || chi <= 0.0 {
		return Err(Error::InvalidChi(chi));
	}
	if pruning_disabled(chi) || P_VALUES.contains(&chi) {
		Ok(())
	} else {
		Err(Error::UnsupportedPValue(chi))
	}
}

/**
Look up the critical value for `degrees_of_freedom` at the p-value cutoff `p_value`. A split whose chi-square statistic is below the critical value is pruned.

Returns `Ok(None)` for the sentinel cutoff, at which a split is never pruned.
*/
pub fn critical_value(degrees_of_freedom: usize, p_value: f64) -> Result<Option<f64>> {
	let column = P_VALUES
		.iter()
		.position(|p| *p == p_value)
		.ok_or(Error::UnsupportedPValue(p_value))?;
	let row = degrees_of_freedom
		.checked_sub(1)
		.and_then(|index| CHI_TABLE.get(index))
		.ok_or(Error::DegreesOfFreedomOutOfRange { degrees_of_freedom })?;
	Ok(row[column])
}

#[test]
fn test_critical_value() {
	assert_eq!(critical_value(1, 0.5), Ok(Some(0.45)));
	assert_eq!(critical_value(2, 0.1), Ok(Some(4.60)));
	assert_eq!(critical_value(11, 0.05), Ok(Some(19.68)));
	assert_eq!(critical_value(7, NEVER_PRUNE_P_VALUE), Ok(None));
}

#[test]
fn test_out_of_range() {
	assert_eq!(
		critical_value(0, 0.5),
		Err(Error::DegreesOfFreedomOutOfRange {
			degrees_of_freedom: 0
		})
	);
	assert_eq!(
		critical_value(12, 0.5),
		Err(Error::DegreesOfFreedomOutOfRange {
			degrees_of_freedom: 12
		})
	);
	assert_eq!(critical_value(3, 0.2), Err(Error::UnsupportedPValue(0.2)));
}

#[test]
fn test_validate_chi() {
	assert!(validate_chi(1.0).is_ok());
	assert!(validate_chi(2.5).is_ok());
	assert!(validate_chi(0.05).is_ok());
	assert_eq!(validate_chi(0.3), Err(Error::UnsupportedPValue(0.3)));
	assert_eq!(validate_chi(0.0), Err(Error::InvalidChi(0.0)));
	assert!(validate_chi(f64::NAN).is_err());
}
