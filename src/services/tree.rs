use std::collections::{HashMap, HashSet};

use crate::error::{AppError, AppResult};
use crate::models::Parameter;

/// Rebuild the nested forest of one partition from its flat rows.
///
/// The input is left untouched. Siblings at every depth come out sorted by
/// `order`, ties keeping input sequence. A row whose parent is missing from
/// the set, or a parent chain that loops, is an integrity error.
pub fn build_tree(rows: &[Parameter]) -> AppResult<Vec<Parameter>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let known: HashSet<i32> = rows.iter().map(|p| p.id).collect();

    let mut roots: Vec<Parameter> = Vec::new();
    let mut by_parent: HashMap<i32, Vec<Parameter>> = HashMap::new();

    for row in rows {
        let mut node = row.clone();
        node.children.clear();

        match node.parent_id {
            None => roots.push(node),
            Some(parent_id) => {
                if !known.contains(&parent_id) {
                    return Err(AppError::Integrity(format!(
                        "parameter {} references missing parent {}",
                        node.id, parent_id
                    )));
                }
                by_parent.entry(parent_id).or_default().push(node);
            }
        }
    }

    roots.sort_by_key(|p| p.order);
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|p| p.order);
    }

    let mut placed = 0;
    for root in roots.iter_mut() {
        placed += attach_children(root, &mut by_parent);
    }

    // Rows never reached from a root sit on a parent cycle
    if placed != rows.len() {
        return Err(AppError::Integrity(format!(
            "{} parameter(s) form a parent cycle",
            rows.len() - placed
        )));
    }

    Ok(roots)
}

fn attach_children(node: &mut Parameter, by_parent: &mut HashMap<i32, Vec<Parameter>>) -> usize {
    let mut placed = 1;
    if let Some(mut children) = by_parent.remove(&node.id) {
        for child in children.iter_mut() {
            placed += attach_children(child, by_parent);
        }
        node.children = children;
    }
    placed
}

/// Collect every node of a forest in pre-order, with `children` emptied.
pub fn flatten(forest: &[Parameter]) -> Vec<Parameter> {
    let mut out = Vec::new();
    let mut stack: Vec<&Parameter> = forest.iter().rev().collect();

    while let Some(node) = stack.pop() {
        let mut flat = node.clone();
        flat.children = Vec::new();
        out.push(flat);
        stack.extend(node.children.iter().rev());
    }

    out
}
