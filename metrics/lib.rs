/*!
This crate defines the [`Metric`](trait.Metric.html) and [`StreamingMetric`](trait.StreamingMetric.html) traits and the concrete metrics `arbor` needs to train and evaluate decision trees: [`Mean`](struct.Mean.html), [`Accuracy`](struct.Accuracy.html), and [`Mode`](struct.Mode.html).
*/

#![allow(clippy::tabs_in_doc_comments)]

mod accuracy;
mod mean;
mod mode;

pub use self::accuracy::Accuracy;
pub use self::mean::Mean;
pub use self::mode::Mode;

/**
The `Metric` trait defines a common interface to metrics that can be computed when the entire input is available at once.

The generic lifetime `'a` allows `Input`s to borrow from their enclosing scope.
*/
pub trait Metric<'a> {
	type Input;
	type Output;
	fn compute(input: Self::Input) -> Self::Output;
}

/**
The `StreamingMetric` trait defines a common interface to metrics that can be computed in a streaming manner, where the input arrives one piece at a time, such as accuracy.

After being initialized, a value of type `T` implementing the `StreamingMetric` trait can have `update()` called on it with values of the associated type `Input`. Multiple values of `T` can be merged together by calling `merge()`, which is how a metric is combined across threads. When finished aggregating, call `finalize()` to produce the associated type `Output`.

# Examples

```
use arbor_metrics::StreamingMetric;

struct Min(f64);

impl StreamingMetric<'_> for Min {
	type Input = f64;
	type Output = f64;
	fn update(&mut self, input: Self::Input) {
		self.0 = self.0.min(input)
	}
	fn merge(&mut self, other: Self) { self.0 = self.0.min(other.0) }
	fn finalize(self) -> Self::Output { self.0 }
}
```
*/
pub trait StreamingMetric<'a> {
	/// `Input` is the type to aggregate in calls to `update()`.
	type Input;
	/// `Output` is the return type of `finalize()`.
	type Output;
	/// Update this streaming metric with the `Input` `input`.
	fn update(&mut self, input: Self::Input);
	/// Merge multiple independently computed streaming metrics.
	fn merge(&mut self, other: Self);
	/// When you are done aggregating `Input`s, call `finalize()` to produce an `Output`.
	fn finalize(self) -> Self::Output;
}
