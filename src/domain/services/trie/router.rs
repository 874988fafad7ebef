//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                                     | Return Type        |
// |-----------------------|-------------------------------------------------|--------------------|
// | resolve               | Finds every terminal node matching a topic      | Vec<NodeId>        |
//--------------------------------------------------------------------------------------------------

use std::collections::{HashSet, VecDeque};

use super::{NodeId, Trie};

/// Resolves the terminal nodes whose pattern matches the given topic words.
///
/// Performs a breadth-first walk over routes `(node, consumed)`, starting at the
/// root with nothing consumed. For each route:
///
/// 1. all words consumed and the node is terminal: record it (once per node)
/// 2. otherwise follow the literal child for the next word, if any
/// 3. a `#` child is entered once for every possible number of words it swallows,
///    zero through all remaining
/// 4. a `*` child is entered only when a word is left for it to consume
///
/// # Arguments
/// * `trie` - The subscription trie to search
/// * `words` - The topic split into words
///
/// # Returns
/// Matching nodes in discovery order, without duplicates
pub fn resolve<H>(trie: &Trie<H>, words: &[&str]) -> Vec<NodeId> {
    let mut routes = VecDeque::from([(Trie::<H>::ROOT, 0usize)]);
    let mut expanded = HashSet::new();
    let mut matched = HashSet::new();
    let mut found = Vec::new();

    while let Some((cursor, index)) = routes.pop_front() {
        // The same route reached twice would only rediscover the same nodes
        if !expanded.insert((cursor, index)) {
            continue;
        }

        let word = words.get(index).copied();

        match word {
            None => {
                if trie.is_terminal(cursor) && matched.insert(cursor) {
                    found.push(cursor);
                }
            }
            Some(word) => {
                if let Some(next) = trie.literal_child(cursor, word) {
                    routes.push_back((next, index + 1));
                }
            }
        }

        if let Some(multi) = trie.multi_child(cursor) {
            routes.extend((index..=words.len()).map(|consumed| (multi, consumed)));
        }

        if word.is_some() {
            if let Some(single) = trie.single_child(cursor) {
                routes.push_back((single, index + 1));
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::topic::{split_topic, TopicPattern};

    fn trie_with(patterns: &[&'static str]) -> (Trie<&'static str>, Vec<NodeId>) {
        let mut trie = Trie::new();
        let nodes = patterns
            .iter()
            .map(|pattern| {
                let node = trie.add(TopicPattern::parse(pattern).tokens());
                trie.register(node, *pattern);
                node
            })
            .collect();
        (trie, nodes)
    }

    fn matches(pattern: &'static str, topic: &str) -> bool {
        let (trie, nodes) = trie_with(&[pattern]);
        resolve(&trie, &split_topic(topic)) == nodes
    }

    #[test]
    fn test_exact_match() {
        assert!(matches("a", "a"));
        assert!(matches("a.b.c", "a.b.c"));
        assert!(!matches("a.b", "a"));
        assert!(!matches("a", "a.b"));
        assert!(!matches("a.b", "a.c"));
    }

    #[test]
    fn test_single_wildcard() {
        assert!(matches("a.*", "a.b"));
        assert!(matches("*.b", "a.b"));
        assert!(matches("a.*.c", "a.b.c"));
        assert!(!matches("a.*", "a"));
        assert!(!matches("*.a", "a"));
        assert!(!matches("a.*", "a.b.c"));
        assert!(!matches("*.c", "a.b.c"));
        assert!(!matches("a.*.d", "a.b.c.d"));
    }

    #[test]
    fn test_multi_wildcard() {
        assert!(matches("a.#", "a"));
        assert!(matches("a.#", "a.b"));
        assert!(matches("a.#", "a.b.c"));
        assert!(matches("#.b", "a.b"));
        assert!(matches("#.c", "c"));
        assert!(matches("#.c", "a.b.c"));
        assert!(matches("a.#.c", "a.b.c"));
        assert!(matches("a.#.b", "a.b"));
        assert!(matches("a.#.d", "a.b.c.d"));
        assert!(!matches("a.#", "b.a"));
        assert!(!matches("#.c", "a.c.d"));
    }

    #[test]
    fn test_lone_multi_wildcard_matches_everything() {
        assert!(matches("#", ""));
        assert!(matches("#", "a"));
        assert!(matches("#", "a.b.c.d"));
    }

    #[test]
    fn test_mixed_wildcards() {
        assert!(matches("*.#", "a"));
        assert!(matches("*.#", "a.b.c"));
        // the empty topic is a single empty word
        assert!(matches("*.#", ""));
        assert!(!matches("*.*", "a"));
        assert!(matches("#.*", "a"));
        assert!(matches("a.#.*.d", "a.b.c.d"));
        assert!(!matches("a.#.*.d", "a.d"));
    }

    #[test]
    fn test_converging_routes_yield_node_once() {
        let (trie, nodes) = trie_with(&["#.#", "metrics.#"]);
        let found = resolve(&trie, &split_topic("metrics.changed.now"));

        assert_eq!(found.len(), 2);
        assert!(found.contains(&nodes[0]));
        assert!(found.contains(&nodes[1]));
    }

    #[test]
    fn test_discovery_order_is_breadth_first() {
        let (trie, nodes) = trie_with(&["a.b.c", "#", "a.*.c"]);
        let found = resolve(&trie, &split_topic("a.b.c"));

        // `#` swallowing everything is found before either three-level path
        assert_eq!(found[0], nodes[1]);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_unregistered_prefix_is_not_a_match() {
        let (trie, _) = trie_with(&["a.b"]);
        assert!(resolve(&trie, &split_topic("a")).is_empty());
    }

    #[test]
    fn test_literal_wildcard_words_in_topics() {
        assert!(!matches("a.b", "a.*"));
        assert!(matches("a.*", "a.*"));
        assert!(matches("a.#", "a.#"));
        assert!(matches("a.*", "a.#"));
    }

    #[test]
    fn test_empty_segments_are_words() {
        assert!(matches("a..b", "a..b"));
        assert!(matches("a.*.b", "a..b"));
        assert!(!matches("a.b", "a..b"));
        assert!(matches("", ""));
    }
}
