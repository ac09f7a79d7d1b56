//! Arena-backed prefix trie with frequency accumulation.
//!
//! Nodes live in a single `Vec` and refer to their children by index, so the
//! tree has exactly one owner and can be cloned into a snapshot cheaply.
//! Children are kept in a `BTreeMap`, which makes depth-first enumeration
//! lexicographic without any extra sorting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const ROOT: usize = 0;

/// A term to be inserted into the trie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Lowercased term text.
    pub text: String,
    /// Frequency to add for this term.
    pub frequency: u64,
}

impl Term {
    /// Create a new term. The text is case-folded to lowercase.
    pub fn new<S: AsRef<str>>(text: S, frequency: u64) -> Self {
        Term {
            text: text.as_ref().to_lowercase(),
            frequency,
        }
    }
}

/// A completion produced by traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The full reconstructed term.
    pub term: String,
    /// Accumulated frequency of the term.
    pub frequency: u64,
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, usize>,
    terminal: bool,
    frequency: u64,
}

/// Prefix tree over lowercase characters.
#[derive(Debug, Clone)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
    term_count: usize,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    /// Create an empty trie containing only the root node.
    pub fn new() -> Self {
        PrefixTrie {
            nodes: vec![TrieNode::default()],
            term_count: 0,
        }
    }

    /// Insert `term` and add `frequency` to its counter.
    ///
    /// Re-inserting an existing term accumulates; it never replaces. The empty
    /// string marks the root itself as terminal.
    pub fn insert(&mut self, term: &str, frequency: u64) {
        let mut current = ROOT;
        for ch in term.to_lowercase().chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(ch, child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if !node.terminal {
            node.terminal = true;
            self.term_count += 1;
        }
        node.frequency = node.frequency.saturating_add(frequency);
    }

    /// Insert every term from an iterator.
    pub fn insert_all<I: IntoIterator<Item = Term>>(&mut self, terms: I) {
        for term in terms {
            self.insert(&term.text, term.frequency);
        }
    }

    /// Accumulated frequency of `term`, or 0 if it was never inserted.
    pub fn frequency(&self, term: &str) -> u64 {
        match self.find(&term.to_lowercase()) {
            Some(node) if self.nodes[node].terminal => self.nodes[node].frequency,
            _ => 0,
        }
    }

    /// Whether `term` was inserted.
    pub fn contains(&self, term: &str) -> bool {
        self.find(&term.to_lowercase())
            .is_some_and(|node| self.nodes[node].terminal)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.term_count
    }

    /// Whether no term has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }

    /// Number of allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Enumerate up to `limit` completions of `prefix` in lexicographic order.
    ///
    /// Returns an empty vector when the prefix is not in the trie or `limit`
    /// is zero.
    pub fn completions(&self, prefix: &str, limit: usize) -> Vec<Candidate> {
        let prefix = prefix.to_lowercase();
        let Some(start) = self.find(&prefix) else {
            return Vec::new();
        };
        self.collect_from(start, prefix, limit)
    }

    /// Enumerate every completion of `prefix` in lexicographic order.
    pub fn all_completions(&self, prefix: &str) -> Vec<Candidate> {
        self.completions(prefix, usize::MAX)
    }

    /// Walk down from the root along `key`. `key` must already be lowercased.
    fn find(&self, key: &str) -> Option<usize> {
        let mut current = ROOT;
        for ch in key.chars() {
            current = *self.nodes[current].children.get(&ch)?;
        }
        Some(current)
    }

    /// Iterative pre-order DFS. Children are pushed in reverse so the smallest
    /// character is popped first.
    fn collect_from(&self, start: usize, prefix: String, limit: usize) -> Vec<Candidate> {
        let mut results = Vec::new();
        if limit == 0 {
            return results;
        }

        let mut path = prefix;
        let base_len = path.len();
        // (node, edge char leading into it, byte length of `path` before the edge)
        let mut stack: Vec<(usize, Option<char>, usize)> = vec![(start, None, base_len)];

        while let Some((node_idx, edge, depth)) = stack.pop() {
            path.truncate(depth);
            if let Some(ch) = edge {
                path.push(ch);
            }

            let node = &self.nodes[node_idx];
            if node.terminal {
                results.push(Candidate {
                    term: path.clone(),
                    frequency: node.frequency,
                });
                if results.len() >= limit {
                    break;
                }
            }

            let depth = path.len();
            for (&ch, &child) in node.children.iter().rev() {
                stack.push((child, Some(ch), depth));
            }
        }

        results
    }
}
