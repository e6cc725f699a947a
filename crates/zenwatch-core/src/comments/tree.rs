//! Comment tree builder.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;
use zenwatch_api::types::Comment;

/// Placeholder shown for soft-deleted comments.
const DELETED_PLACEHOLDER: &str = "[deleted]";

/// A comment and its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    /// The comment itself.
    pub comment: Comment,
    /// Direct replies, oldest first.
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Text to display; soft-deleted comments keep their place in the thread.
    #[must_use]
    pub fn display_content(&self) -> &str {
        if self.comment.is_deleted {
            DELETED_PLACEHOLDER
        } else {
            &self.comment.content
        }
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + count_nodes(&self.replies)
    }
}

// Unlinks replies level by level so a long reply chain drops without recursing.
impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}

/// Builds a reply forest from a flat list of comments.
///
/// - comments without a parent, or whose parent is not in the list, are roots
/// - roots are ordered newest first, replies oldest first at every level
/// - ties on `created_at` are ordered by id, so the output is deterministic
/// - a comment whose ancestor chain loops back to itself is treated as a root
///
/// Every input comment appears exactly once in the output.
#[must_use]
pub fn build_tree(comments: &[Comment]) -> Vec<CommentNode> {
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(comments.len());
    for (i, comment) in comments.iter().enumerate() {
        index.entry(comment.id).or_insert(i);
    }

    let mut parent: Vec<Option<usize>> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| {
            c.parent_id
                .and_then(|pid| index.get(&pid).copied())
                .filter(|&p| p != i)
        })
        .collect();
    break_cycles(comments, &mut parent);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();
    for (i, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }
    for replies in &mut children {
        replies.sort_by(|&a, &b| oldest_first(&comments[a], &comments[b]));
    }
    roots.sort_by(|&a, &b| newest_first(&comments[a], &comments[b]));

    // Post-order with an explicit stack so reply depth never touches the call stack
    let mut built: Vec<Option<CommentNode>> = vec![None; comments.len()];
    let mut stack: Vec<(usize, bool)> = roots.iter().map(|&r| (r, false)).collect();
    while let Some((i, expanded)) = stack.pop() {
        if expanded {
            let replies = children[i].iter().filter_map(|&c| built[c].take()).collect();
            built[i] = Some(CommentNode {
                comment: comments[i].clone(),
                replies,
            });
        } else {
            stack.push((i, true));
            stack.extend(children[i].iter().map(|&c| (c, false)));
        }
    }

    roots.into_iter().filter_map(|r| built[r].take()).collect()
}

/// Detaches every node that sits on a parent cycle.
fn break_cycles(comments: &[Comment], parent: &mut [Option<usize>]) {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; parent.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parent.len() {
        let mut current = Some(start);
        while let Some(i) = current {
            match marks[i] {
                Mark::Done => break,
                Mark::OnPath => {
                    let from = path.iter().position(|&n| n == i).unwrap_or(0);
                    for &member in &path[from..] {
                        warn!(
                            comment_id = comments[member].id,
                            "Comment parent cycle, showing as root"
                        );
                        parent[member] = None;
                    }
                    break;
                }
                Mark::Unvisited => {
                    marks[i] = Mark::OnPath;
                    path.push(i);
                    current = parent[i];
                }
            }
        }
        for n in path.drain(..) {
            marks[n] = Mark::Done;
        }
    }
}

fn newest_first(a: &Comment, b: &Comment) -> Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

fn oldest_first(a: &Comment, b: &Comment) -> Ordering {
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}

/// Total number of nodes in a forest.
#[must_use]
pub fn count_nodes(nodes: &[CommentNode]) -> usize {
    let mut total = 0;
    let mut stack = vec![nodes];
    while let Some(level) = stack.pop() {
        total += level.len();
        stack.extend(level.iter().map(|n| n.replies.as_slice()));
    }
    total
}

/// Deepest nesting level; a flat list has depth 1, an empty forest 0.
#[must_use]
pub fn max_depth(nodes: &[CommentNode]) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(nodes, 0)];
    while let Some((level, depth)) = stack.pop() {
        if level.is_empty() {
            continue;
        }
        deepest = deepest.max(depth + 1);
        stack.extend(level.iter().map(|n| (n.replies.as_slice(), depth + 1)));
    }
    deepest
}

/// Finds a comment by id anywhere in the forest, in display order.
#[must_use]
pub fn find(nodes: &[CommentNode], id: i64) -> Option<&CommentNode> {
    let mut stack: Vec<&CommentNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.comment.id == id {
            return Some(node);
        }
        stack.extend(node.replies.iter().rev());
    }
    None
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;
    use zenwatch_api::types::ContentKind;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn comment(id: i64, parent_id: Option<i64>, secs: i64) -> Comment {
        Comment {
            id,
            user_id: 1,
            username: Some("ada".into()),
            content_type: ContentKind::Article,
            content_id: "a1".into(),
            parent_id,
            content: format!("comment {id}"),
            is_deleted: false,
            created_at: at(secs),
            updated_at: None,
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.comment.id).collect()
    }

    #[test]
    fn test_builds_nested_replies() {
        let comments = vec![
            comment(1, None, 0),
            comment(2, Some(1), 10),
            comment(3, Some(1), 5),
            comment(4, Some(3), 20),
            comment(5, None, 30),
        ];
        let tree = build_tree(&comments);

        assert_eq!(ids(&tree), vec![5, 1]);
        assert_eq!(ids(&tree[1].replies), vec![3, 2]);
        assert_eq!(ids(&tree[1].replies[0].replies), vec![4]);
        assert_eq!(count_nodes(&tree), 5);
        assert_eq!(max_depth(&tree), 3);
        assert_eq!(find(&tree, 4).unwrap().comment.parent_id, Some(3));
        assert!(find(&tree, 99).is_none());
    }

    #[test]
    fn test_orphans_become_roots() {
        let comments = vec![comment(1, None, 0), comment(2, Some(42), 5)];
        let tree = build_tree(&comments);
        assert_eq!(ids(&tree), vec![2, 1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[]).is_empty());
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn test_ties_ordered_by_id() {
        let comments = vec![
            comment(1, None, 0),
            comment(2, None, 0),
            comment(3, Some(1), 5),
            comment(4, Some(1), 5),
        ];
        let tree = build_tree(&comments);
        assert_eq!(ids(&tree), vec![2, 1]);
        assert_eq!(ids(&tree[1].replies), vec![3, 4]);
    }

    #[test]
    fn test_cycles_terminate_and_keep_every_node() {
        let comments = vec![
            comment(1, Some(2), 0),
            comment(2, Some(1), 1),
            comment(3, Some(3), 2),
            comment(4, Some(2), 3),
        ];
        let tree = build_tree(&comments);

        assert_eq!(count_nodes(&tree), 4);
        assert_eq!(ids(&tree), vec![3, 2, 1]);
        assert_eq!(ids(&find(&tree, 2).unwrap().replies), vec![4]);
    }

    #[test]
    fn test_deleted_comment_placeholder() {
        let mut deleted = comment(1, None, 0);
        deleted.is_deleted = true;
        let tree = build_tree(&[deleted, comment(2, Some(1), 1)]);
        assert_eq!(tree[0].display_content(), "[deleted]");
        assert_eq!(tree[0].replies[0].display_content(), "comment 2");
    }

    #[test]
    fn test_deep_reply_chain() {
        const DEPTH: i64 = 50_000;
        let comments: Vec<Comment> = (1..=DEPTH)
            .map(|id| comment(id, (id > 1).then_some(id - 1), id))
            .collect();

        let tree = build_tree(&comments);

        assert_eq!(ids(&tree), vec![1]);
        assert_eq!(count_nodes(&tree), DEPTH as usize);
        assert_eq!(max_depth(&tree), DEPTH as usize);
        assert_eq!(find(&tree, DEPTH).unwrap().comment.parent_id, Some(DEPTH - 1));
        drop(tree);
    }

    #[test]
    fn test_find_returns_first_in_display_order() {
        let comments = vec![comment(1, None, 0), comment(2, Some(1), 5), comment(3, None, 10)];
        let tree = build_tree(&comments);
        assert_eq!(find(&tree, 3).unwrap().comment.id, 3);
        assert_eq!(find(&tree, 2).unwrap().comment.parent_id, Some(1));
    }

    /// Acyclic input: each comment points at an earlier one, a missing id, or nothing.
    fn acyclic_comments() -> impl Strategy<Value = Vec<Comment>> {
        prop::collection::vec((0..3u8, any::<prop::sample::Index>(), 0..50i64), 0..60).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (link, pick, secs))| {
                        let id = i as i64 + 1;
                        let parent = match link {
                            0 => None,
                            1 if i > 0 => Some(pick.index(i) as i64 + 1),
                            _ => Some(10_000 + id),
                        };
                        comment(id, parent, secs)
                    })
                    .collect()
            },
        )
    }

    fn check_reply_order(nodes: &[CommentNode]) -> bool {
        nodes.iter().all(|n| {
            n.replies
                .windows(2)
                .all(|w| oldest_first(&w[0].comment, &w[1].comment) == Ordering::Less)
                && check_reply_order(&n.replies)
        })
    }

    proptest! {
        #[test]
        fn test_prop_node_count_preserved(comments in acyclic_comments()) {
            let tree = build_tree(&comments);
            prop_assert_eq!(count_nodes(&tree), comments.len());
        }

        #[test]
        fn test_prop_orphans_are_roots(comments in acyclic_comments()) {
            let tree = build_tree(&comments);
            let roots = ids(&tree);
            for c in &comments {
                let orphan = c.parent_id.is_none_or(|p| !comments.iter().any(|o| o.id == p));
                prop_assert_eq!(orphan, roots.contains(&c.id));
            }
        }

        #[test]
        fn test_prop_ordering(comments in acyclic_comments()) {
            let tree = build_tree(&comments);
            prop_assert!(tree
                .windows(2)
                .all(|w| newest_first(&w[0].comment, &w[1].comment) == Ordering::Less));
            prop_assert!(check_reply_order(&tree));
        }
    }
}
