//! Tree and flattened-tree account rendering (`reporting/tree.go`,
//! `reporting/flattenedtree.go`), plus the 20-column right-aligned
//! amount field the external rendering contract (spec.md §6) calls
//! load-bearing and explicitly tells implementations not to generalize.

use gledger_journal::account::{Account, AccountRef};

/// `printf("%20s", ...)` followed by the two-space gap the contract
/// reserves before a tree line's indentation begins.
pub fn amount_prepender(account: &Account) -> String {
    format!("{:>20}  ", account.amount.displayable_quantity(true))
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * 2)
}

/// A chain of single-child account names accumulated while `collapse`
/// is on, waiting for a node with zero or more than one child to break
/// it and supply the line's final path segment. `start_depth` is the
/// depth the chain began at, used for the eventual line's indentation —
/// the original Go renderer tracked this but never actually wired it
/// into `calculateSpaces`, always indenting a collapsed line at depth
/// zero; this implementation uses the real start depth instead, which
/// reads as the intended behavior rather than the bug (see DESIGN.md).
struct PendingChain {
    start_depth: usize,
    names: Vec<String>,
}

/// Render `root`'s descendants (not `root` itself) as an indented tree,
/// depth-first, each child visited in [`Account::sorted_child_names`]
/// order for deterministic output.
pub fn render_tree(root: &AccountRef, prepender: &dyn Fn(&Account) -> String, collapse: bool) -> String {
    let mut lines = Vec::new();
    let mut pending: Option<PendingChain> = None;
    for name in root.borrow().sorted_child_names() {
        let child = root.borrow().child(&name).expect("name came from sorted_child_names");
        visit(&child, 0, collapse, prepender, &mut lines, &mut pending);
    }
    lines.join("\n")
}

fn visit(
    node: &AccountRef,
    depth: usize,
    collapse: bool,
    prepender: &dyn Fn(&Account) -> String,
    lines: &mut Vec<String>,
    pending: &mut Option<PendingChain>,
) {
    let child_names = node.borrow().sorted_child_names();

    if collapse && child_names.len() == 1 {
        let name = node.borrow().name.clone();
        match pending {
            Some(chain) => chain.names.push(name),
            None => *pending = Some(PendingChain { start_depth: depth, names: vec![name] }),
        }
        let only_child = node.borrow().child(&child_names[0]).expect("name came from sorted_child_names");
        visit(&only_child, depth + 1, collapse, prepender, lines, pending);
        return;
    }

    let own_name = node.borrow().name.clone();
    let line = match pending.take() {
        Some(mut chain) => {
            chain.names.push(own_name);
            format!("{}{}{}", prepender(&node.borrow()), indent(chain.start_depth), chain.names.join(":"))
        }
        None => format!("{}{}{}", prepender(&node.borrow()), indent(depth), own_name),
    };
    lines.push(line);

    for name in child_names {
        let child = node.borrow().child(&name).expect("name came from sorted_child_names");
        visit(&child, depth + 1, collapse, prepender, lines, pending);
    }
}

/// Render `root`'s leaves as a flat, colon-delimited path list with no
/// indentation — the `--flatten` counterpart to [`render_tree`].
pub fn render_flattened(root: &AccountRef, prepender: &dyn Fn(&Account) -> String) -> String {
    let mut lines = Vec::new();
    for name in root.borrow().sorted_child_names() {
        let child = root.borrow().child(&name).expect("name came from sorted_child_names");
        visit_flattened(&child, prepender, &mut lines);
    }
    lines.join("\n")
}

fn visit_flattened(node: &AccountRef, prepender: &dyn Fn(&Account) -> String, lines: &mut Vec<String>) {
    let child_names = node.borrow().sorted_child_names();
    if child_names.is_empty() {
        let line = {
            let account = node.borrow();
            format!("{}{}", prepender(&account), account.path())
        };
        lines.push(line);
        return;
    }
    for name in child_names {
        let child = node.borrow().child(&name).expect("name came from sorted_child_names");
        visit_flattened(&child, prepender, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gledger_journal::account::ROOT_NAME;
    use gledger_journal::Amount;

    fn set_amount(account: &AccountRef, quantity: i64, commodity: &str) {
        account.borrow_mut().amount = Amount { quantity, commodity: commodity.to_string() };
    }

    #[test]
    fn flattened_tree_lists_leaf_paths_only() {
        let root = Account::new_root(ROOT_NAME);
        let food = Account::find_or_create(&root, &["Expenses", "Food"]);
        let rent = Account::find_or_create(&root, &["Expenses", "Rent"]);
        set_amount(&food, 4281, "£");
        set_amount(&rent, 90000, "£");

        let rendered = render_flattened(&root, &amount_prepender);
        assert!(rendered.contains("Expenses:Food"));
        assert!(rendered.contains("Expenses:Rent"));
        assert!(!rendered.contains("Expenses\n") && !rendered.ends_with("Expenses"));
    }

    #[test]
    fn tree_indents_by_depth() {
        let root = Account::new_root(ROOT_NAME);
        let food = Account::find_or_create(&root, &["Expenses", "Food"]);
        set_amount(&food, 4281, "£");

        let rendered = render_tree(&root, &amount_prepender, false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("  Food"));
    }

    #[test]
    fn collapse_joins_a_single_child_chain_into_one_line() {
        let root = Account::new_root(ROOT_NAME);
        let groceries = Account::find_or_create(&root, &["Expenses", "Food", "Groceries"]);
        set_amount(&groceries, 4281, "£");

        let rendered = render_tree(&root, &amount_prepender, true);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Expenses:Food:Groceries"));
    }
}
