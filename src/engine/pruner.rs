use super::alphabet::{self, CHARSET};
use super::requirements::{Requirements, UNKNOWN};
use super::trie::{Node, NodeKind, Status, Trie};

/// Re-marks the whole trie against `reqs` and returns how many words survive.
///
/// `revisit_temp` selects the full prune: temporarily pruned branches are
/// walked again so subtrees that went empty before a mid-match insertion can
/// come back alive. Between ordinary guesses the incremental prune
/// (`revisit_temp = false`) is enough, because requirements only tighten.
pub fn prune_trie(trie: &mut Trie, reqs: &Requirements, revisit_temp: bool) -> usize {
    // Scratch occurrence budget; every adjustment made on the way down is
    // undone on the way back up, so the copy ends each call unchanged.
    let mut occ = reqs.occ;
    prune_level(&mut trie.children, reqs, &mut occ, 0, revisit_temp)
}

/// Consumes one occurrence of `char_idx` from the budget around `walk`:
/// a lower bound moves one step toward satisfied, an exact bound loses one
/// remaining slot, no information stays no information.
fn consume<T>(
    occ: &mut [i16; CHARSET],
    char_idx: usize,
    walk: impl FnOnce(&mut [i16; CHARSET]) -> T,
) -> T {
    let before = occ[char_idx];
    if before < -1 {
        occ[char_idx] += 1;
    } else if before > 0 {
        occ[char_idx] -= 1;
    }
    let result = walk(occ);
    occ[char_idx] = before;
    result
}

fn prune_level(
    nodes: &mut [Node],
    reqs: &Requirements,
    occ: &mut [i16; CHARSET],
    depth: usize,
    revisit_temp: bool,
) -> usize {
    let mut total = 0;
    for node in nodes {
        match node.status {
            Status::Alive => {}
            Status::TempPruned if revisit_temp => {}
            _ => continue,
        }

        let wanted = reqs.matched[depth];
        if wanted != UNKNOWN && node.ch != wanted {
            node.status = Status::Pruned;
            continue;
        }
        let idx = alphabet::index(node.ch);
        if occ[idx] == 0 || !reqs.allowed_at(idx, depth) {
            node.status = Status::Pruned;
            continue;
        }

        match &mut node.kind {
            NodeKind::Leaf(suffix) => {
                let alive = consume(occ, idx, |occ| check_suffix(suffix, reqs, occ, depth + 1));
                if alive {
                    total += 1;
                } else {
                    node.status = Status::Pruned;
                }
            }
            NodeKind::Branch(children) => {
                let below = consume(occ, idx, |occ| {
                    prune_level(children, reqs, occ, depth + 1, revisit_temp)
                });
                if node.status == Status::TempPruned && below > 0 {
                    // New insertions gave the subtree live words again.
                    node.status = Status::Alive;
                } else if below == 0 {
                    node.status = Status::TempPruned;
                }
                total += below;
            }
        }
    }
    total
}

/// Walks a leaf suffix under the same gates as the trie walk. Once the suffix
/// runs out, every letter of the reference must have its budget on -1 or 0,
/// i.e. every minimum and exact bound consumed along the path was met.
fn check_suffix(suffix: &[u8], reqs: &Requirements, occ: &mut [i16; CHARSET], depth: usize) -> bool {
    let Some((&first, rest)) = suffix.split_first() else {
        return reqs
            .reference
            .iter()
            .all(|&ref_ch| matches!(occ[alphabet::index(ref_ch)], -1 | 0));
    };

    let wanted = reqs.matched[depth];
    if wanted != UNKNOWN && first != wanted {
        return false;
    }
    let idx = alphabet::index(first);
    if occ[idx] == 0 || !reqs.allowed_at(idx, depth) {
        return false;
    }
    consume(occ, idx, |occ| check_suffix(rest, reqs, occ, depth + 1))
}
