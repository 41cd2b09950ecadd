use super::{Node, ELBOW, TEE, VERTICAL};

/// One display row of a forest, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// Raw node label.
    pub name: String,
    /// Nesting depth (0 = forest root).
    pub depth: usize,
    pub is_dir: bool,
    /// Whether this is the last sibling in its parent group.
    pub is_last: bool,
    /// Pre-computed box-drawing prefix, connector included.
    pub prefix: String,
}

/// Flatten a forest into pre-order rows with their branch prefixes.
pub fn layout(forest: &[Node]) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    // ancestor_is_last[d] = true means the ancestor at depth d was the last sibling
    let mut ancestor_is_last: Vec<bool> = Vec::new();
    push_siblings(forest, &mut ancestor_is_last, &mut lines);
    lines
}

fn push_siblings(nodes: &[Node], ancestor_is_last: &mut Vec<bool>, out: &mut Vec<TreeLine>) {
    let depth = ancestor_is_last.len();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();

        let mut prefix = String::new();
        for &last in ancestor_is_last.iter() {
            if last {
                prefix.push_str("    ");
            } else {
                prefix.push(VERTICAL);
                prefix.push_str("   ");
            }
        }
        prefix.push_str(if is_last { ELBOW } else { TEE });
        prefix.push(' ');

        out.push(TreeLine {
            name: node.name.clone(),
            depth,
            is_dir: node.is_dir(),
            is_last,
            prefix,
        });

        if !node.children().is_empty() {
            ancestor_is_last.push(is_last);
            push_siblings(node.children(), ancestor_is_last, out);
            ancestor_is_last.pop();
        }
    }
}
