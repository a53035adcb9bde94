use crate::node::DecisionNode;
use std::collections::VecDeque;

/// An iterator over a node and all of its descendants in breadth-first order.
pub struct BreadthFirst<'a> {
	queue: VecDeque<&'a DecisionNode>,
}

impl<'a> BreadthFirst<'a> {
	pub fn new(node: &'a DecisionNode) -> Self {
		let mut queue = VecDeque::new();
		queue.push_back(node);
		Self { queue }
	}
}

impl<'a> Iterator for BreadthFirst<'a> {
	type Item = &'a DecisionNode;
	fn next(&mut self) -> Option<Self::Item> {
		let node = self.queue.pop_front()?;
		self.queue.extend(node.children.iter());
		Some(node)
	}
}

/// Count `node` and every node below it.
pub fn count_nodes(node: &DecisionNode) -> usize {
	BreadthFirst::new(node).count()
}

/// The largest `depth` of `node` and every node below it.
pub fn max_depth(node: &DecisionNode) -> usize {
	BreadthFirst::new(node)
		.map(|node| node.depth)
		.max()
		.unwrap_or(node.depth)
}

#[test]
fn test_traverse() {
	use crate::node::test::example;
	let mut root = DecisionNode::new(example(), Default::default(), 0).unwrap();
	assert_eq!(count_nodes(&root), 1);
	assert_eq!(max_depth(&root), 0);
	root.split().unwrap();
	for child in root.children.iter_mut() {
		child.split().unwrap();
	}
	assert_eq!(count_nodes(&root), 5);
	assert_eq!(max_depth(&root), 2);
	let depths: Vec<usize> = BreadthFirst::new(&root).map(|node| node.depth).collect();
	assert_eq!(depths, vec![0, 1, 1, 2, 2]);
	assert_eq!(count_nodes(&root.children[0]), 3);
}
