use std::slice;

/// Name given to the root suite of specs reported without any suite.
pub const ORPHAN_SUITE: &str = "(no suite)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Suite,
    Test,
    Browser,
}

#[derive(Debug, Clone)]
pub struct FailureNode {
    pub id: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub kind: NodeKind,
    pub name: String,
    /// 0 for root suites, parent depth + 1 below.
    pub depth: usize,
    /// Raw error lines of a browser node, in emission order.
    pub lines: Vec<String>,
}

/// Failures of the current run, grouped as Suite > Test > Browser.
///
/// Suites and tests are deduplicated by name under their parent; every
/// recorded failure appends its own browser node.
#[derive(Debug, Default)]
pub struct ResultTree {
    nodes: Vec<FailureNode>,
    root_ids: Vec<usize>,
}

impl ResultTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one failing spec into the tree. Returns the new browser node id.
    pub fn record(
        &mut self,
        browser_name: &str,
        suite_path: &[String],
        test_name: &str,
        lines: Vec<String>,
    ) -> usize {
        let mut segments = suite_path
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());

        let root_name = segments.next().unwrap_or(ORPHAN_SUITE);
        let mut suite_id = match self.find_root_by_name(root_name) {
            Some(id) => id,
            None => self.add_root(root_name),
        };

        for segment in segments {
            suite_id = self.find_or_add_child(suite_id, NodeKind::Suite, segment);
        }

        let test_id = self.find_or_add_child(suite_id, NodeKind::Test, test_name.trim());
        let browser = self.add_child(test_id, NodeKind::Browser, browser_name.trim());
        self.nodes[browser].lines = lines;
        browser
    }

    pub fn get(&self, id: usize) -> Option<&FailureNode> {
        self.nodes.get(id)
    }

    pub fn roots(&self) -> &[usize] {
        &self.root_ids
    }

    pub fn is_empty(&self) -> bool {
        self.root_ids.is_empty()
    }

    /// Number of recorded browser failures.
    pub fn failure_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Browser)
            .count()
    }

    /// Children of `id` with the given kind, in insertion order.
    pub fn children_of_kind(&self, id: usize, kind: NodeKind) -> ChildrenOfKind<'_> {
        let children = self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[]);
        ChildrenOfKind {
            tree: self,
            children: children.iter(),
            kind,
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root_ids.clear();
    }

    fn find_root_by_name(&self, name: &str) -> Option<usize> {
        self.root_ids
            .iter()
            .copied()
            .find(|&id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    fn find_or_add_child(&mut self, parent: usize, kind: NodeKind, name: &str) -> usize {
        let existing = self.nodes[parent].children.iter().copied().find(|&id| {
            self.nodes
                .get(id)
                .is_some_and(|n| n.kind == kind && n.name == name)
        });
        match existing {
            Some(id) => id,
            None => self.add_child(parent, kind, name),
        }
    }

    fn add_root(&mut self, name: &str) -> usize {
        let id = self.add_node(NodeKind::Suite, name, None, 0);
        self.root_ids.push(id);
        id
    }

    fn add_child(&mut self, parent: usize, kind: NodeKind, name: &str) -> usize {
        let depth = self.nodes[parent].depth + 1;
        let id = self.add_node(kind, name, Some(parent), depth);
        self.nodes[parent].children.push(id);
        id
    }

    fn add_node(&mut self, kind: NodeKind, name: &str, parent: Option<usize>, depth: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(FailureNode {
            id,
            parent,
            children: Vec::new(),
            kind,
            name: name.to_string(),
            depth,
            lines: Vec::new(),
        });
        id
    }
}

pub struct ChildrenOfKind<'a> {
    tree: &'a ResultTree,
    children: slice::Iter<'a, usize>,
    kind: NodeKind,
}

impl<'a> Iterator for ChildrenOfKind<'a> {
    type Item = &'a FailureNode;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let kind = self.kind;
        self.children
            .by_ref()
            .filter_map(|&id| tree.get(id))
            .find(|n| n.kind == kind)
    }
}
