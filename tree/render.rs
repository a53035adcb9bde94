use crate::node::DecisionNode;
use std::fmt::Write;

/**
Render a node and its descendants as indented text, one line per node. `column_names` names the feature columns. Columns without a name are shown by index.

```text
split on cap (n = 4, pred = no)
  cap = A -> split on size (n = 2, pred = no)
    size = 1 -> leaf: yes (n = 1)
```
*/
pub fn render(root: &DecisionNode, column_names: &[String]) -> String {
	let mut output = String::new();
	writeln!(output, "{}", describe(root, column_names)).ok();
	render_children(root, column_names, 1, &mut output);
	output
}

fn render_children(node: &DecisionNode, column_names: &[String], indent: usize, output: &mut String) {
	let feature = match node.feature {
		Some(feature) => feature,
		None => return,
	};
	for (child, value) in node.children.iter().zip(node.children_values.iter()) {
		writeln!(
			output,
			"{}{} = {} -> {}",
			"  ".repeat(indent),
			column_name(column_names, feature),
			value,
			describe(child, column_names),
		)
		.ok();
		render_children(child, column_names, indent + 1, output);
	}
}

fn describe(node: &DecisionNode, column_names: &[String]) -> String {
	let n = node.data.nrows();
	match node.feature {
		Some(feature) if !node.terminal => format!(
			"split on {} (n = {}, pred = {})",
			column_name(column_names, feature),
			n,
			node.pred,
		),
		_ => format!("leaf: {} (n = {})", node.pred, n),
	}
}

fn column_name(column_names: &[String], feature: usize) -> String {
	column_names
		.get(feature)
		.cloned()
		.unwrap_or_else(|| format!("column {}", feature))
}

#[test]
fn test_render() {
	use crate::{node::test::example, DecisionTree};
	let mut tree = DecisionTree::new(example(), Default::default());
	tree.build_tree().unwrap();
	let column_names = vec!["cap".to_owned()];
	insta::assert_snapshot!(render(tree.root().unwrap(), &column_names).trim_end(), @r###"
 split on cap (n = 4, pred = no)
   cap = A -> split on column 1 (n = 2, pred = no)
     column 1 = 1 -> leaf: yes (n = 1)
     column 1 = 2 -> leaf: no (n = 1)
   cap = B -> leaf: no (n = 2)
 "###);
}
