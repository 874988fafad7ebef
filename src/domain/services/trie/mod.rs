//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Prefix tree over pattern segments. Nodes live in an arena owned by the trie and are
// addressed by `NodeId`, which doubles as the node identity used by the router to
// de-duplicate converging routes.
//
// | Component     | Description                                                               |
// |---------------|---------------------------------------------------------------------------|
// | Trie          | Arena of nodes rooted at `Trie::ROOT`                                     |
// | TrieNode      | Literal children, `*` slot, `#` slot and an optional handler list         |
// | router        | Breadth-first wildcard expansion (see router.rs)                          |
//--------------------------------------------------------------------------------------------------

pub mod router;

use std::collections::HashMap;
use std::fmt;

use crate::domain::models::topic::PatternToken;

pub use router::resolve;

/// Identity of a node within one trie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index of this node
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A node in the subscription trie
#[derive(Debug)]
struct TrieNode<H> {
    literal: HashMap<String, NodeId>,
    single: Option<NodeId>,
    multi: Option<NodeId>,
    /// `Some` once anything has been registered here, even if later emptied
    handlers: Option<Vec<H>>,
}

impl<H> TrieNode<H> {
    fn new() -> Self {
        Self {
            literal: HashMap::new(),
            single: None,
            multi: None,
            handlers: None,
        }
    }
}

/// Subscription trie keyed by pattern segment.
///
/// Nodes are never removed; a node whose handlers were all unregistered stays
/// in place and simply contributes no handlers.
#[derive(Debug)]
pub struct Trie<H> {
    nodes: Vec<TrieNode<H>>,
}

impl<H> Default for Trie<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Trie<H> {
    /// Identity of the root node
    pub const ROOT: NodeId = NodeId(0);

    /// Creates a trie holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
        }
    }

    /// Walks from the root following, or creating, a child per token and returns
    /// the terminal node.
    pub fn add(&mut self, tokens: &[PatternToken]) -> NodeId {
        let mut cursor = Self::ROOT;

        for token in tokens {
            cursor = match self.child(cursor, token) {
                Some(next) => next,
                None => {
                    let next = self.allocate();
                    let node = &mut self.nodes[cursor.0];
                    match token {
                        PatternToken::Literal(word) => {
                            node.literal.insert(word.clone(), next);
                        }
                        PatternToken::Single => node.single = Some(next),
                        PatternToken::Multi => node.multi = Some(next),
                    }
                    next
                }
            };
        }

        cursor
    }

    /// Appends a handler to the node's list, marking the node as terminal
    pub fn register(&mut self, node: NodeId, handler: H) {
        self.nodes[node.0]
            .handlers
            .get_or_insert_with(Vec::new)
            .push(handler);
    }

    /// Removes the first handler satisfying `predicate` from the node's list.
    ///
    /// # Returns
    /// The removed handler, or `None` if nothing matched
    pub fn unregister<F>(&mut self, node: NodeId, predicate: F) -> Option<H>
    where
        F: Fn(&H) -> bool,
    {
        let handlers = self.nodes.get_mut(node.0)?.handlers.as_mut()?;
        let position = handlers.iter().position(predicate)?;
        Some(handlers.remove(position))
    }

    /// Returns the handlers registered on a node, `None` if it was never terminal
    pub fn handlers(&self, node: NodeId) -> Option<&[H]> {
        self.nodes.get(node.0)?.handlers.as_deref()
    }

    /// Returns true if a handler list exists on this node
    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|node| node.handlers.is_some())
    }

    /// Returns the literal child for `word`
    pub fn literal_child(&self, node: NodeId, word: &str) -> Option<NodeId> {
        self.nodes[node.0].literal.get(word).copied()
    }

    /// Returns the `*` child
    pub fn single_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].single
    }

    /// Returns the `#` child
    pub fn multi_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].multi
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn child(&self, node: NodeId, token: &PatternToken) -> Option<NodeId> {
        match token {
            PatternToken::Literal(word) => self.literal_child(node, word),
            PatternToken::Single => self.single_child(node),
            PatternToken::Multi => self.multi_child(node),
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TrieNode::new());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::topic::TopicPattern;

    fn add(trie: &mut Trie<&'static str>, pattern: &str) -> NodeId {
        trie.add(TopicPattern::parse(pattern).tokens())
    }

    #[test]
    fn test_empty_trie() {
        let trie: Trie<()> = Trie::new();
        assert_eq!(trie.node_count(), 1);
        assert!(!trie.is_terminal(Trie::<()>::ROOT));
    }

    #[test]
    fn test_add_reuses_shared_prefix() {
        let mut trie = Trie::new();
        let ab = add(&mut trie, "a.b");
        let ac = add(&mut trie, "a.c");

        assert_ne!(ab, ac);
        assert_eq!(trie.node_count(), 4);
        assert_eq!(add(&mut trie, "a.b"), ab);
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn test_identities_increase_monotonically() {
        let mut trie = Trie::new();
        let a = add(&mut trie, "a");
        let ab = add(&mut trie, "a.b");
        let abc = add(&mut trie, "a.b.c");

        assert!(Trie::<&str>::ROOT < a);
        assert!(a < ab);
        assert!(ab < abc);
    }

    #[test]
    fn test_wildcard_slots_are_separate_from_literals() {
        let mut trie = Trie::new();
        let star = add(&mut trie, "a.*");
        let hash = add(&mut trie, "a.#");
        let word = add(&mut trie, "a.b");

        let a = trie.literal_child(Trie::<&str>::ROOT, "a").unwrap();
        assert_eq!(trie.single_child(a), Some(star));
        assert_eq!(trie.multi_child(a), Some(hash));
        assert_eq!(trie.literal_child(a, "b"), Some(word));
        assert_eq!(trie.literal_child(a, "*"), None);
        assert_eq!(trie.literal_child(a, "#"), None);
    }

    #[test]
    fn test_register_and_unregister() {
        let mut trie = Trie::new();
        let node = add(&mut trie, "a.b");

        assert!(!trie.is_terminal(node));
        trie.register(node, "first");
        trie.register(node, "second");
        assert_eq!(trie.handlers(node), Some(&["first", "second"][..]));

        assert_eq!(trie.unregister(node, |h| *h == "first"), Some("first"));
        assert_eq!(trie.unregister(node, |h| *h == "first"), None);
        assert_eq!(trie.handlers(node), Some(&["second"][..]));

        trie.unregister(node, |h| *h == "second");
        assert!(trie.is_terminal(node));
        assert_eq!(trie.handlers(node), Some(&[][..]));
    }
}
