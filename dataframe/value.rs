use num_traits::Float;
use std::{
	cmp::Ordering,
	hash::{Hash, Hasher},
};
use thiserror::Error;

/**
A `Value` is a single cell of a dataset. Every column of a dataset is treated as categorical, so the only operations a `Value` needs to support are exact equality, hashing, and a total order used to break ties deterministically.

Every `Number` orders before every `Text`. Numbers order numerically and text orders lexicographically.
*/
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
	Number(Number),
	Text(String),
}

/**
A `Number` is a finite `f64`. It is similar to the `Finite` type in spirit, but it also normalizes `-0.0` to `0.0`, so equality and hashing both reduce to comparing the bits of the stored value.
*/
#[derive(Clone, Copy, Debug)]
pub struct Number(f64);

/// An error type indicating that the number is `NaN` or infinite.
#[derive(Debug, Error)]
#[error("{0} is not a finite number")]
pub struct NotFiniteError(pub f64);

impl Number {
	pub fn new(value: f64) -> Result<Self, NotFiniteError> {
		if !value.is_finite() {
			return Err(NotFiniteError(value));
		}
		// Adding positive zero maps -0.0 to 0.0 and leaves every other value unchanged.
		Ok(Self(value + 0.0))
	}

	pub fn get(self) -> f64 {
		self.0
	}
}

impl PartialEq for Number {
	fn eq(&self, other: &Self) -> bool {
		self.0.to_bits() == other.0.to_bits()
	}
}

impl Eq for Number {}

impl PartialOrd for Number {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Number {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
	}
}

impl Hash for Number {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.to_bits().hash(state);
	}
}

impl std::fmt::Display for Number {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Value {
	/// Create a `Value::Number`, failing if `value` is `NaN` or infinite.
	pub fn number<T>(value: T) -> Result<Self, NotFiniteError>
	where
		T: Float,
	{
		let value = value.to_f64().unwrap_or(f64::NAN);
		Number::new(value).map(Value::Number)
	}

	pub fn text(value: impl Into<String>) -> Self {
		Value::Text(value.into())
	}

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(s) => Some(s.get()),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}
}

impl std::fmt::Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Number(number) => write!(f, "{}", number),
			Value::Text(text) => write!(f, "{}", text),
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Number(Number(value as f64))
	}
}

#[test]
fn test_negative_zero() {
	use std::collections::hash_map::DefaultHasher;
	let a = Value::number(0.0f64).unwrap();
	let b = Value::number(-0.0f64).unwrap();
	assert_eq!(a, b);
	let hash = |value: &Value| {
		let mut hasher = DefaultHasher::new();
		value.hash(&mut hasher);
		hasher.finish()
	};
	assert_eq!(hash(&a), hash(&b));
}

#[test]
fn test_not_finite() {
	assert!(Value::number(f64::NAN).is_err());
	assert!(Value::number(f32::INFINITY).is_err());
	assert!(Value::number(1.5f32).is_ok());
}

#[test]
fn test_exact_equality() {
	let a = Value::number(0.1f64 + 0.2f64).unwrap();
	let b = Value::number(0.3f64).unwrap();
	assert_ne!(a, b);
	assert_eq!(Value::from(2), Value::number(2.0f64).unwrap());
	assert_ne!(Value::from(2), Value::text("2"));
}

#[test]
fn test_order() {
	let mut values = vec![
		Value::text("b"),
		Value::from(10),
		Value::text("a"),
		Value::from(-1),
	];
	values.sort();
	assert_eq!(
		values,
		vec![
			Value::from(-1),
			Value::from(10),
			Value::text("a"),
			Value::text("b"),
		]
	);
}
