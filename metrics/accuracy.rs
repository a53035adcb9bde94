use super::{mean::Mean, StreamingMetric};
use std::marker::PhantomData;

/// The accuracy is the proportion of examples where prediction == label. It is `None` when no examples were seen.
pub struct Accuracy<T>(Mean, PhantomData<T>);

impl<T> Accuracy<T> {
	pub fn new() -> Self {
		Self(Mean::new(), PhantomData)
	}
}

impl<T> Default for Accuracy<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<'a, T> StreamingMetric<'a> for Accuracy<T>
where
	T: PartialEq + 'a,
{
	/// `(prediction, label)`
	type Input = (&'a T, &'a T);
	type Output = Option<f64>;

	fn update(&mut self, value: Self::Input) {
		self.0.update(if value.0 == value.1 { 1.0 } else { 0.0 })
	}

	fn merge(&mut self, other: Self) {
		self.0.merge(other.0)
	}

	fn finalize(self) -> Option<f64> {
		self.0.finalize()
	}
}

#[test]
fn test_accuracy() {
	let predictions = ["yes", "no", "no", "no"];
	let labels = ["yes", "no", "yes", "no"];
	let mut accuracy = Accuracy::new();
	for (prediction, label) in predictions.iter().zip(labels.iter()) {
		accuracy.update((prediction, label));
	}
	assert_eq!(accuracy.finalize(), Some(0.75));
	assert_eq!(Accuracy::<&str>::new().finalize(), None);
}
