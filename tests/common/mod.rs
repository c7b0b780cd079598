//! Helpers shared by the integration tests: rerooting and reshuffling trees.
#![allow(dead_code)]

use phylovec::model::vertex::BranchLength;
use phylovec::model::{SimpleTree, TaxonSet, VertexIndex};
use rand::Rng;
use rand::seq::SliceRandom;

/// Returns the taxon set `t1..tN`.
pub fn numbered_taxa(num_taxa: usize) -> TaxonSet {
    TaxonSet::new((1..=num_taxa).map(|i| format!("t{i}"))).unwrap()
}

/// A tree with its rooting forgotten: labeled vertices and weighted edges.
///
/// A root with two children is suppressed, joining its two edges into one.
pub struct Unrooted {
    labels: Vec<Option<String>>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl Unrooted {
    pub fn from_tree(tree: &SimpleTree) -> Self {
        let num_vertices = tree.num_vertices();
        let mut labels = vec![None; num_vertices];
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); num_vertices];

        for vertex in tree.pre_order_iter() {
            let index = vertex.index();
            labels[index] = vertex.label().cloned();
            if let Some(parent) = vertex.parent() {
                let length = vertex.branch_length().map_or(0.0, |l| *l);
                adjacency[index].push((parent, length));
                adjacency[parent].push((index, length));
            }
        }

        let root = tree.root_index();
        if let &[(a, length_a), (b, length_b)] = adjacency[root].as_slice() {
            let joined = length_a + length_b;
            adjacency[root].clear();
            for (from, to) in [(a, b), (b, a)] {
                for entry in adjacency[from].iter_mut() {
                    if entry.0 == root {
                        *entry = (to, joined);
                    }
                }
            }
        }

        Self { labels, adjacency }
    }

    /// Vertices of degree at least three, the candidate roots.
    pub fn internal_vertices(&self) -> Vec<usize> {
        (0..self.adjacency.len())
            .filter(|&v| self.adjacency[v].len() >= 3)
            .collect()
    }

    /// All edges `(u, v, length)` with `u < v`.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        let mut edges = Vec::new();
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &(v, length) in neighbors {
                if u < v {
                    edges.push((u, v, length));
                }
            }
        }
        edges
    }

    fn num_leaves(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }

    /// Roots the tree at vertex `root`, shuffling all children lists.
    pub fn rooted_at<R: Rng>(&self, root: usize, rng: &mut R) -> SimpleTree {
        let mut tree = SimpleTree::new(self.num_leaves().max(1));
        let mut children: Vec<VertexIndex> = self.adjacency[root]
            .iter()
            .map(|&(child, length)| self.build(&mut tree, child, root, length, rng))
            .collect();
        children.shuffle(rng);
        tree.add_root(children, None);
        tree
    }

    /// Roots the tree in the middle of the edge `u - v`.
    pub fn rooted_on_edge<R: Rng>(&self, u: usize, v: usize, rng: &mut R) -> SimpleTree {
        let length = self.adjacency[u]
            .iter()
            .find(|&&(n, _)| n == v)
            .map(|&(_, l)| l)
            .unwrap();
        let half = length / 2.0;

        let mut tree = SimpleTree::new(self.num_leaves().max(1));
        let mut children = vec![
            self.build(&mut tree, u, v, half, rng),
            self.build(&mut tree, v, u, half, rng),
        ];
        children.shuffle(rng);
        tree.add_root(children, None);
        tree
    }

    fn build<R: Rng>(
        &self,
        tree: &mut SimpleTree,
        node: usize,
        parent: usize,
        length: f64,
        rng: &mut R,
    ) -> VertexIndex {
        let length = Some(BranchLength::new(length));
        if let Some(label) = &self.labels[node] {
            return tree.add_leaf(length, label.clone());
        }

        let mut children: Vec<VertexIndex> = self.adjacency[node]
            .iter()
            .filter(|&&(n, _)| n != parent)
            .map(|&(child, child_length)| self.build(tree, child, node, child_length, rng))
            .collect();
        children.shuffle(rng);
        tree.add_internal_vertex(children, length)
    }
}

/// Rebuilds `tree` with the same rooting but shuffled children lists.
pub fn shuffled<R: Rng>(tree: &SimpleTree, rng: &mut R) -> SimpleTree {
    fn copy<R: Rng>(
        source: &SimpleTree,
        target: &mut SimpleTree,
        index: VertexIndex,
        rng: &mut R,
    ) -> VertexIndex {
        let vertex = &source[index];
        match vertex.children() {
            None => target.add_leaf(vertex.branch_length(), vertex.label().unwrap().clone()),
            Some(children) => {
                let mut copied: Vec<VertexIndex> = children
                    .iter()
                    .map(|&child| copy(source, target, child, rng))
                    .collect();
                copied.shuffle(rng);
                target.add_internal_vertex(copied, vertex.branch_length())
            }
        }
    }

    let mut target = SimpleTree::new(tree.num_leaves());
    let root = tree.root();
    match root.children() {
        None => {
            target.add_root_leaf(root.branch_length(), root.label().unwrap().clone());
        }
        Some(children) => {
            let mut copied: Vec<VertexIndex> = children
                .iter()
                .map(|&child| copy(tree, &mut target, child, rng))
                .collect();
            copied.shuffle(rng);
            target.add_root(copied, root.branch_length());
        }
    }
    target
}
