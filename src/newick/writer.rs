//! Newick string and file writing for any [TreeView].

use crate::model::TreeView;
use crate::parser::utils::{escape_label, format_branch_length};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Estimated characters per vertex: label or parentheses, separator and
/// branch length
const CHARS_PER_VERTEX: usize = 16;

/// Style for serializing a tree to Newick format, controlling the order in
/// which children are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// Children in the order the tree stores them
    #[default]
    Verbatim,
    /// Children ordered by subtree size (ascending), then by smallest leaf
    /// label, giving one string per rooted tree regardless of children order
    Sorted,
}

/// Writes the given trees to a file in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
///
/// # Example
/// ```no_run
/// use phylovec::newick::{NewickStyle, parse_file, write_newick_file};
/// use std::fs::File;
///
/// let (trees, labels) = parse_file("trees.nwk")?;
/// let file = File::create("sorted.nwk")?;
/// write_newick_file(file, trees.iter().map(|t| t.view(&labels)), NewickStyle::Sorted)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_newick_file<T, I>(file: File, trees: I, style: NewickStyle) -> io::Result<()>
where
    T: TreeView,
    I: IntoIterator<Item = T>,
{
    write_newick(BufWriter::new(file), trees, style)
}

/// Writes the given trees to `writer` in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick<W, T, I>(mut writer: W, trees: I, style: NewickStyle) -> io::Result<()>
where
    W: Write,
    T: TreeView,
    I: IntoIterator<Item = T>,
{
    for tree in trees {
        let newick = to_newick_with_style(&tree, style);
        writer.write_all(newick.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Returns the Newick representation of the tree with closing semicolon.
///
/// Labels are quoted where necessary and branch lengths are written in the
/// shortest form that parses back to the same value. The root's branch
/// length is omitted.
///
/// # Example
/// ```
/// use phylovec::model::tree::GenTree;
/// use phylovec::model::vertex::BranchLength;
/// use phylovec::newick::to_newick;
///
/// let mut tree = GenTree::new(3);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "Kaka".to_string());
/// let b = tree.add_leaf(Some(BranchLength::new(0.25)), "Kea".to_string());
/// let c = tree.add_leaf(None, "Kakapo parrot".to_string());
/// tree.add_root_without_branch(vec![a, b, c]);
///
/// assert_eq!(to_newick(&tree), "(Kaka:1,Kea:0.25,'Kakapo parrot');");
/// ```
pub fn to_newick<T: TreeView>(tree: &T) -> String {
    to_newick_with_style(tree, NewickStyle::Verbatim)
}

/// Returns the Newick representation with children in sorted order,
/// see [NewickStyle::Sorted].
///
/// # Example
/// ```
/// use phylovec::newick::to_sorted_newick;
/// use phylovec::parse_newick_str;
///
/// let first = parse_newick_str("((C:1,(B:1,A:1):1):1,D:2);").unwrap();
/// let second = parse_newick_str("(D:2,((A:1,B:1):1,C:1):1);").unwrap();
/// assert_eq!(to_sorted_newick(&first), "(D:2,(C:1,(A:1,B:1):1):1);");
/// assert_eq!(to_sorted_newick(&first), to_sorted_newick(&second));
/// ```
pub fn to_sorted_newick<T: TreeView>(tree: &T) -> String {
    to_newick_with_style(tree, NewickStyle::Sorted)
}

/// Returns the Newick representation of the tree in the given style.
///
/// An empty tree gives `;`.
pub fn to_newick_with_style<T: TreeView>(tree: &T, style: NewickStyle) -> String {
    let Some(root) = tree.root() else {
        return ";".to_string();
    };

    let mut newick = match style {
        NewickStyle::Verbatim => {
            let mut newick = String::with_capacity(CHARS_PER_VERTEX * 2);
            build_newick(tree, root, &mut newick);
            newick
        }
        NewickStyle::Sorted => build_sorted_newick(tree, root).newick,
    };
    newick.push(';');
    newick
}

// Helper for adding labels
fn push_label<T: TreeView>(tree: &T, node: T::Node, newick: &mut String) {
    if let Some(label) = tree.label(node) {
        newick.push_str(&escape_label(label));
    }
}

// Helper for adding branch lengths
fn push_branch_length<T: TreeView>(tree: &T, node: T::Node, newick: &mut String) {
    if let Some(length) = tree.branch_length(node) {
        newick.push(':');
        newick.push_str(&format_branch_length(length));
    }
}

// Recursive helper for building the Newick string
fn build_newick<T: TreeView>(tree: &T, node: T::Node, newick: &mut String) {
    let is_root = tree.root() == Some(node);

    if tree.is_leaf(node) {
        push_label(tree, node, newick);
    } else {
        newick.push('(');
        for (i, &child) in tree.children(node).iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            build_newick(tree, child, newick);
        }
        newick.push(')');
    }

    if !is_root {
        push_branch_length(tree, node, newick);
    }
}

/// Newick string of a subtree with its sort key.
struct SortedSubtree<'a> {
    num_leaves: usize,
    min_label: Option<&'a str>,
    newick: String,
}

fn build_sorted_newick<T: TreeView>(tree: &T, node: T::Node) -> SortedSubtree<'_> {
    let is_root = tree.root() == Some(node);

    let mut subtree = if tree.is_leaf(node) {
        let mut newick = String::with_capacity(CHARS_PER_VERTEX);
        push_label(tree, node, &mut newick);
        SortedSubtree {
            num_leaves: 1,
            min_label: tree.label(node),
            newick,
        }
    } else {
        let mut children: Vec<SortedSubtree> = tree
            .children(node)
            .iter()
            .map(|&child| build_sorted_newick(tree, child))
            .collect();
        children.sort_by(|a, b| {
            a.num_leaves
                .cmp(&b.num_leaves)
                .then_with(|| a.min_label.cmp(&b.min_label))
        });

        let capacity = children.iter().map(|c| c.newick.len() + 1).sum::<usize>() + 2;
        let mut newick = String::with_capacity(capacity + CHARS_PER_VERTEX);
        newick.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            newick.push_str(&child.newick);
        }
        newick.push(')');

        SortedSubtree {
            num_leaves: children.iter().map(|c| c.num_leaves).sum(),
            min_label: children.iter().filter_map(|c| c.min_label).min(),
            newick,
        }
    };

    if !is_root {
        push_branch_length(tree, node, &mut subtree.newick);
    }
    subtree
}
