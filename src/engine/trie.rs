use std::io::{self, Write};

/// Pruning state of a trie node. Only `Alive` nodes are enumerated;
/// `TempPruned` marks a branch whose subtree went empty and may come back
/// after insertions; `Pruned` is permanent within a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    Alive,
    TempPruned,
    Pruned,
}

pub(crate) enum NodeKind {
    Branch(Vec<Node>),
    Leaf(Box<[u8]>),
}

pub(crate) struct Node {
    pub(crate) ch: u8,
    pub(crate) status: Status,
    pub(crate) kind: NodeKind,
}

impl Node {
    fn leaf(ch: u8, suffix: &[u8], status: Status) -> Self {
        Node {
            ch,
            status,
            kind: NodeKind::Leaf(suffix.into()),
        }
    }

    /// Turns a leaf into the branch chain shared with `rest`, ending in two
    /// sibling leaves: the old suffix keeps this node's previous status, the
    /// inserted word starts alive. The converted node itself comes back alive.
    fn split_leaf(&mut self, rest: &[u8]) {
        let NodeKind::Leaf(suffix) = std::mem::replace(&mut self.kind, NodeKind::Branch(Vec::new()))
        else {
            unreachable!("split_leaf called on a branch");
        };

        let shared = suffix
            .iter()
            .zip(rest)
            .take_while(|(a, b)| a == b)
            .count();
        if shared == suffix.len() {
            // Word already present. Inserting a duplicate violates the input
            // contract; leave the trie untouched.
            self.kind = NodeKind::Leaf(suffix);
            return;
        }

        let old = Node::leaf(suffix[shared], &suffix[shared + 1..], self.status);
        let new = Node::leaf(rest[shared], &rest[shared + 1..], Status::Alive);
        let mut children = if old.ch < new.ch {
            vec![old, new]
        } else {
            vec![new, old]
        };
        for &ch in suffix[..shared].iter().rev() {
            children = vec![Node {
                ch,
                status: Status::Alive,
                kind: NodeKind::Branch(children),
            }];
        }

        self.status = Status::Alive;
        self.kind = NodeKind::Branch(children);
    }
}

/// Compressed ordered trie over the session dictionary. Siblings are kept in
/// strictly increasing character order, so a depth-first walk emits words
/// lexicographically.
pub struct Trie {
    pub(crate) children: Vec<Node>,
    word_len: usize,
}

impl Trie {
    pub fn new(word_len: usize) -> Self {
        Trie {
            children: Vec::new(),
            word_len,
        }
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn insert(&mut self, word: &[u8]) {
        debug_assert_eq!(word.len(), self.word_len);

        let mut level = &mut self.children;
        let mut depth = 0;
        loop {
            let ch = word[depth];
            let pos = match level.binary_search_by(|node| node.ch.cmp(&ch)) {
                Ok(pos) => pos,
                Err(pos) => {
                    level.insert(pos, Node::leaf(ch, &word[depth + 1..], Status::Alive));
                    return;
                }
            };
            let node = &mut level[pos];
            if matches!(node.kind, NodeKind::Leaf(_)) {
                node.split_leaf(&word[depth + 1..]);
                return;
            }
            match &mut node.kind {
                NodeKind::Branch(children) => {
                    level = children;
                    depth += 1;
                }
                NodeKind::Leaf(_) => unreachable!(),
            }
        }
    }

    pub fn contains(&self, word: &[u8]) -> bool {
        debug_assert_eq!(word.len(), self.word_len);

        let mut level = &self.children;
        let mut depth = 0;
        loop {
            let ch = word[depth];
            let Ok(pos) = level.binary_search_by(|node| node.ch.cmp(&ch)) else {
                return false;
            };
            match &level[pos].kind {
                NodeKind::Branch(children) => {
                    level = children;
                    depth += 1;
                }
                NodeKind::Leaf(suffix) => return suffix.as_ref() == &word[depth + 1..],
            }
        }
    }

    /// Writes the surviving words, one per line, in lexicographic order.
    pub fn write_alive<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut path = Vec::with_capacity(self.word_len);
        write_level(&self.children, &mut path, out)
    }

    /// Resets every prune flag. Called between matches; frees nothing.
    pub fn reset_pruning(&mut self) {
        reset_level(&mut self.children);
    }
}

fn write_level<W: Write>(nodes: &[Node], path: &mut Vec<u8>, out: &mut W) -> io::Result<()> {
    for node in nodes {
        if node.status != Status::Alive {
            continue;
        }
        path.push(node.ch);
        match &node.kind {
            NodeKind::Branch(children) => write_level(children, path, out)?,
            NodeKind::Leaf(suffix) => {
                out.write_all(path)?;
                out.write_all(suffix)?;
                out.write_all(b"\n")?;
            }
        }
        path.pop();
    }
    Ok(())
}

fn reset_level(nodes: &mut [Node]) {
    for node in nodes {
        node.status = Status::Alive;
        if let NodeKind::Branch(children) = &mut node.kind {
            reset_level(children);
        }
    }
}
