use foundation::time::{TimeSpan, Timestamp};

use crate::entity::FireId;

/// A deterministic interval tree over half-open activity spans.
///
/// Ordering contract:
/// - `query_at_time` returns fires in ascending `FireId` order, which is the
///   record order.
#[derive(Debug, Clone, Default)]
pub struct IntervalTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
struct Node {
    center: Timestamp,
    items: Vec<IntervalItem>,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntervalItem {
    pub fire: FireId,
    pub span: TimeSpan,
}

impl IntervalTree {
    pub fn build(items: Vec<IntervalItem>) -> Self {
        // Empty spans contain no instant; dropping them keeps every build step
        // making progress.
        let items: Vec<IntervalItem> = items
            .into_iter()
            .filter(|item| item.span.end.is_none_or(|end| end > item.span.start))
            .collect();

        let mut nodes = Vec::new();
        if !items.is_empty() {
            let _ = build_node(&mut nodes, items);
        }
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns all fires active at `time`.
    pub fn query_at_time(&self, time: Timestamp) -> Vec<FireId> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<FireId> = Vec::new();
        query_time(&self.nodes, 0, time, &mut hits);

        hits.sort_unstable();
        hits.dedup();
        hits
    }
}

fn build_node(nodes: &mut Vec<Node>, items: Vec<IntervalItem>) -> usize {
    let center = choose_center(&items);

    let mut left_items: Vec<IntervalItem> = Vec::new();
    let mut right_items: Vec<IntervalItem> = Vec::new();
    let mut here: Vec<IntervalItem> = Vec::new();

    for item in items {
        if item.span.end.is_some_and(|end| end <= center) {
            left_items.push(item);
        } else if item.span.start > center {
            right_items.push(item);
        } else {
            here.push(item);
        }
    }

    // Stable ordering for deterministic traversal.
    here.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| a.fire.cmp(&b.fire))
    });

    let idx = nodes.len();
    nodes.push(Node {
        center,
        items: here,
        left: None,
        right: None,
    });

    if !left_items.is_empty() {
        let child = build_node(nodes, left_items);
        nodes[idx].left = Some(child);
    }
    if !right_items.is_empty() {
        let child = build_node(nodes, right_items);
        nodes[idx].right = Some(child);
    }

    idx
}

// Median start. The item owning it always stays at this node.
fn choose_center(items: &[IntervalItem]) -> Timestamp {
    let mut starts: Vec<Timestamp> = items.iter().map(|item| item.span.start).collect();
    starts.sort_unstable();
    starts[starts.len() / 2]
}

fn query_time(nodes: &[Node], idx: usize, t: Timestamp, out: &mut Vec<FireId>) {
    let node = &nodes[idx];

    for item in &node.items {
        if item.span.contains(t) {
            out.push(item.fire);
        }
    }

    if t < node.center {
        if let Some(left) = node.left {
            query_time(nodes, left, t, out);
        }
    } else if let Some(right) = node.right {
        query_time(nodes, right, t, out);
    }
}
