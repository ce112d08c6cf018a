use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::amount::Amount;
use crate::posting::PostingRef;
use crate::transaction::TransactionRef;

/// Two reserved node names that are elided when a `Path` is composed.
pub const ROOT_NAME: &str = "_root_";
pub const BUDGET_ROOT_NAME: &str = "_budget_root_";

/// A colon-delimited account path, e.g. `Expenses:Food:Groceries`.
pub type AccountPath = String;

pub type AccountRef = Rc<RefCell<Account>>;
pub type AccountWeak = Weak<RefCell<Account>>;

/// A node in the rooted account tree.
///
/// Every account but the root carries a weak back-reference to its
/// parent; the parent, in turn, owns its children through an
/// insertion-ordered map keyed by name. Postings and transactions are
/// linked into an account only after parsing, during the link phase
/// (see [`crate::journal::Journal::add_posting`]); until then a fresh
/// account only reflects calls to [`Account::find_or_create`].
pub struct Account {
    pub name: String,
    parent: Option<AccountWeak>,
    children: IndexMap<String, AccountRef>,
    path: String,
    path_components: Vec<String>,

    /// Sum of this account's own posting amounts plus the aggregated
    /// amounts of all of its children.
    pub amount: Amount,

    pub postings: Vec<PostingRef>,
    pub transactions: Vec<TransactionRef>,
}

impl Account {
    /// Construct a fresh root node with the given reserved name.
    pub fn new_root(name: &str) -> AccountRef {
        Rc::new(RefCell::new(Account {
            name: name.to_string(),
            parent: None,
            children: IndexMap::new(),
            path: String::new(),
            path_components: Vec::new(),
            amount: Amount::zero(""),
            postings: Vec::new(),
            transactions: Vec::new(),
        }))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_components(&self) -> &[String] {
        &self.path_components
    }

    pub fn depth(&self) -> usize {
        self.path_components.len()
    }

    pub fn parent(&self) -> Option<AccountRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn children(&self) -> impl Iterator<Item = &AccountRef> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<AccountRef> {
        self.children.get(name).cloned()
    }

    fn is_reserved_name(name: &str) -> bool {
        name == ROOT_NAME || name == BUDGET_ROOT_NAME
    }

    fn compose_path(parent_components: &[String], name: &str) -> (String, Vec<String>) {
        let mut components = parent_components.to_vec();
        if !Self::is_reserved_name(name) {
            components.push(name.to_string());
        }
        (components.join(":"), components)
    }

    /// Descend from `self_ref`, matching `components` against existing
    /// children. Any components that don't already exist are created as
    /// a fresh descending chain.
    pub fn find_or_create(self_ref: &AccountRef, components: &[&str]) -> AccountRef {
        let mut current = self_ref.clone();
        for component in components {
            let existing = current.borrow().child(component);
            current = match existing {
                Some(child) => child,
                None => {
                    let (path, path_components) = {
                        let parent = current.borrow();
                        Self::compose_path(parent.path_components(), component)
                    };
                    let child = Rc::new(RefCell::new(Account {
                        name: component.to_string(),
                        parent: Some(Rc::downgrade(&current)),
                        children: IndexMap::new(),
                        path,
                        path_components,
                        amount: Amount::zero(""),
                        postings: Vec::new(),
                        transactions: Vec::new(),
                    }));
                    current
                        .borrow_mut()
                        .children
                        .insert(component.to_string(), child.clone());
                    child
                }
            };
        }
        current
    }

    pub fn find_or_create_path(self_ref: &AccountRef, path: &str) -> AccountRef {
        let components: Vec<&str> = path.split(':').filter(|s| !s.is_empty()).collect();
        Account::find_or_create(self_ref, &components)
    }

    /// Invoke `action` on `self_ref`, then on each ancestor toward the root.
    pub fn walk_ancestors(self_ref: &AccountRef, mut action: impl FnMut(&AccountRef)) {
        let mut current = Some(self_ref.clone());
        while let Some(node) = current {
            action(&node);
            current = node.borrow().parent();
        }
    }

    /// Add `amount` to this account and every one of its ancestors.
    /// An ancestor whose commodity is still empty adopts the posting's
    /// commodity (first-write-wins; see the design notes on multi-currency).
    /// A mismatch against an ancestor that already carries a different,
    /// non-empty commodity is reported via `log::warn!` rather than
    /// failing the add — §7 treats cross-commodity arithmetic as
    /// non-fatal.
    pub fn add_amount_up_chain(self_ref: &AccountRef, amount: &Amount) {
        Account::walk_ancestors(self_ref, |node| {
            let mut node = node.borrow_mut();
            if node.amount.commodity.is_empty() && !amount.commodity.is_empty() {
                node.amount.commodity = amount.commodity.clone();
            } else if !amount.commodity.is_empty() && node.amount.commodity != amount.commodity {
                log::warn!(
                    "commodity mismatch on account {:?}: account carries {:?}, posting carries {:?}",
                    node.path(),
                    node.amount.commodity,
                    amount.commodity,
                );
            }
            node.amount.quantity += amount.quantity;
        });
    }

    /// Remove `self_ref` from its parent's children map and clear its
    /// parent pointer. A no-op on the root, which has no parent.
    pub fn unlink(self_ref: &AccountRef) {
        let parent = self_ref.borrow().parent();
        if let Some(parent) = parent {
            let name = self_ref.borrow().name.clone();
            parent.borrow_mut().children.shift_remove(&name);
        }
        self_ref.borrow_mut().parent = None;
    }

    /// Unlink any descendant (never the root itself) whose aggregated
    /// quantity is zero. A zero-balance node takes its whole subtree
    /// with it — there's no reason to keep zero-balance leaves dangling
    /// under it, and the aggregation invariant guarantees their sum is
    /// already folded into the parent's own zero quantity.
    pub fn remove_empty_children(self_ref: &AccountRef) {
        let children: Vec<AccountRef> = self_ref.borrow().children().cloned().collect();
        for child in children {
            if child.borrow().amount.quantity == 0 {
                Account::unlink(&child);
            } else {
                Account::remove_empty_children(&child);
            }
        }
    }

    /// Drop all descendants strictly deeper than `target_depth`.
    pub fn prune_children(self_ref: &AccountRef, target_depth: usize, current_depth: usize) {
        if current_depth >= target_depth {
            self_ref.borrow_mut().children.clear();
            return;
        }
        let children: Vec<AccountRef> = self_ref.borrow().children().cloned().collect();
        for child in children {
            Account::prune_children(&child, target_depth, current_depth + 1);
        }
    }

    /// Pre-order traversal returning every node for which `matcher` holds.
    pub fn find_accounts(self_ref: &AccountRef, matcher: &impl Fn(&Account) -> bool) -> Vec<AccountRef> {
        let mut found = Vec::new();
        if matcher(&self_ref.borrow()) {
            found.push(self_ref.clone());
        }
        for child in self_ref.borrow().children() {
            found.extend(Account::find_accounts(child, matcher));
        }
        found
    }

    /// Unlink descendants that do not match (directly, or through a
    /// matching descendant); returns whether this subtree retained any
    /// match, including `self_ref` itself.
    pub fn remove_children(self_ref: &AccountRef, matcher: &impl Fn(&Account) -> bool) -> bool {
        let self_matches = matcher(&self_ref.borrow());
        let children: Vec<AccountRef> = self_ref.borrow().children().cloned().collect();
        let mut any_child_retained = false;
        for child in children {
            if Account::remove_children(&child, matcher) {
                any_child_retained = true;
            } else {
                Account::unlink(&child);
            }
        }
        self_matches || any_child_retained
    }

    /// Alphabetically sorted snapshot of child names.
    pub fn sorted_child_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.children.keys().cloned().collect();
        names.sort();
        names
    }

    /// Accounts with no children, found via pre-order traversal.
    pub fn leaves(self_ref: &AccountRef) -> Vec<AccountRef> {
        Account::find_accounts(self_ref, &|a| a.children.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_or_create_builds_path() {
        let root = Account::new_root(ROOT_NAME);
        let a = Account::find_or_create(&root, &["Expenses", "Food", "Groceries"]);
        assert_eq!(a.borrow().path(), "Expenses:Food:Groceries");
        assert_eq!(
            a.borrow().path_components(),
            &["Expenses".to_string(), "Food".to_string(), "Groceries".to_string()]
        );
    }

    #[test]
    fn find_or_create_is_idempotent() {
        let root = Account::new_root(ROOT_NAME);
        let a = Account::find_or_create(&root, &["Expenses", "Food"]);
        let b = Account::find_or_create(&root, &["Expenses", "Food"]);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(
            root.borrow().child("Expenses").unwrap().borrow().children.len(),
            1
        );
    }

    #[test]
    fn root_name_elided_from_path() {
        let root = Account::new_root(ROOT_NAME);
        assert_eq!(root.borrow().path(), "");
    }

    #[test]
    fn walk_ancestors_visits_self_then_parents() {
        let root = Account::new_root(ROOT_NAME);
        let leaf = Account::find_or_create(&root, &["Expenses", "Food"]);
        let mut names = Vec::new();
        Account::walk_ancestors(&leaf, |n| names.push(n.borrow().name.clone()));
        assert_eq!(names, vec!["Food", "Expenses", ROOT_NAME]);
    }

    #[test]
    fn prune_children_drops_deeper_nodes() {
        let root = Account::new_root(ROOT_NAME);
        Account::find_or_create(&root, &["Expenses", "Food", "Groceries"]);
        Account::prune_children(&root, 1, 0);
        let expenses = root.borrow().child("Expenses").unwrap();
        assert!(expenses.borrow().children().next().is_none());
    }

    #[test]
    fn remove_empty_children_drops_zero_balance_subtrees() {
        let root = Account::new_root(ROOT_NAME);
        let food = Account::find_or_create(&root, &["Expenses", "Food"]);
        let rent = Account::find_or_create(&root, &["Expenses", "Rent"]);
        food.borrow_mut().amount.quantity = 4281;
        rent.borrow_mut().amount.quantity = 0;

        Account::remove_empty_children(&root);

        let expenses = root.borrow().child("Expenses").unwrap();
        assert!(expenses.borrow().child("Food").is_some());
        assert!(expenses.borrow().child("Rent").is_none());
    }
}
