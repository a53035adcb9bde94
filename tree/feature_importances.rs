use crate::{node::DecisionNode, traverse::BreadthFirst};

/// This function sums the importance recorded by every node that splits on each feature. Terminal nodes contribute nothing.
pub fn compute_feature_importances(root: &DecisionNode, n_features: usize) -> Vec<f64> {
	let mut feature_importances = vec![0.0; n_features];
	for node in BreadthFirst::new(root) {
		if node.terminal {
			continue;
		}
		if let Some(feature) = node.feature {
			if let Some(feature_importance) = feature_importances.get_mut(feature) {
				*feature_importance += node.feature_importance;
			}
		}
	}
	feature_importances
}
