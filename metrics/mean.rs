use super::StreamingMetric;
use num_traits::ToPrimitive;

/// The arithmetic mean of a stream of `f64`s.
#[derive(Debug, Clone, Default)]
pub struct Mean {
	n: u64,
	sum: f64,
}

impl Mean {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StreamingMetric<'_> for Mean {
	type Input = f64;
	type Output = Option<f64>;

	fn update(&mut self, value: f64) {
		self.n += 1;
		self.sum += value;
	}

	fn merge(&mut self, other: Self) {
		self.n += other.n;
		self.sum += other.sum;
	}

	/// Returns `None` if no values were seen.
	fn finalize(self) -> Option<f64> {
		if self.n == 0 {
			None
		} else {
			self.n.to_f64().map(|n| self.sum / n)
		}
	}
}

#[test]
fn test_mean() {
	let mut a = Mean::new();
	a.update(1.0);
	a.update(2.0);
	let mut b = Mean::new();
	b.update(6.0);
	a.merge(b);
	assert_eq!(a.finalize(), Some(3.0));
	assert_eq!(Mean::new().finalize(), None);
}
