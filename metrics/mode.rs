use super::Metric;
use std::{collections::BTreeMap, marker::PhantomData};

/// The most frequent value. Ties resolve to the smallest value.
#[derive(Debug, Clone, Default)]
pub struct Mode<T>(PhantomData<T>);

impl<'a, T> Metric<'a> for Mode<T>
where
	T: Ord + Clone + 'a,
{
	type Input = &'a [T];
	type Output = Option<T>;
	fn compute(input: Self::Input) -> Self::Output {
		let mut histogram = BTreeMap::new();
		for value in input.iter() {
			*histogram.entry(value).or_insert(0usize) += 1;
		}
		// `max_by` keeps the last of several equal maxima, so walk the histogram from the largest value down.
		histogram
			.into_iter()
			.rev()
			.max_by(|a, b| a.1.cmp(&b.1))
			.map(|(value, _)| value.clone())
	}
}

#[test]
fn test_mode() {
	assert_eq!(Mode::<i32>::compute(&[3, 1, 3, 2][..]), Some(3));
	assert_eq!(Mode::<&str>::compute(&["yes", "no"][..]), Some("no"));
	assert_eq!(Mode::<i32>::compute(&[2, 2, 1, 1, 5][..]), Some(1));
	assert_eq!(Mode::<usize>::compute(&[][..]), None);
}
