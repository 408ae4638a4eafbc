//! Deterministic 2D placement of flow nodes for visual editors.
//!
//! Presentation only: nothing here feeds back into validation or
//! traversal. The same unchanged flow must produce bit-identical
//! coordinates on every run, since editors diff stored layouts against
//! recomputed ones in regression tests. Hence document-order iteration
//! and stable sorts throughout.

use ahash::AHashMap;
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::flow::FlowDefinition;

/// Horizontal distance between layers.
const COLUMN_WIDTH: f64 = 260.0;
/// Vertical distance between rows within a layer.
const ROW_HEIGHT: f64 = 140.0;

/// An editor-space coordinate for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Computes a coordinate for every node in the flow.
pub fn layout(flow: &FlowDefinition) -> AHashMap<String, Point> {
    let nodes = flow.nodes();
    let layers = assign_layers(flow);
    let layer_count = layers.values().copied().max().map_or(0, |deepest| deepest + 1);

    // Bucket reachable nodes into their layers, document order within each.
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for (slot, node) in nodes.iter().enumerate() {
        if let Some(&layer) = layers.get(node.id.as_str()) {
            buckets[layer].push(slot);
        }
    }

    // Row assignment, layer by layer. The start layer keeps document
    // order; later layers order by the barycenter of already-placed
    // predecessors to cut down edge crossings.
    let mut row_of: AHashMap<&str, usize> = AHashMap::new();
    let mut positions: AHashMap<String, Point> = AHashMap::with_capacity(nodes.len());
    for (layer, bucket) in buckets.iter().enumerate() {
        let ordered: Vec<usize> = if layer == 0 {
            bucket.clone()
        } else {
            bucket
                .iter()
                .copied()
                .enumerate()
                .sorted_by(|&(ia, a), &(ib, b)| {
                    let ka = barycenter(flow, &nodes[a].id, &row_of).unwrap_or(ia as f64);
                    let kb = barycenter(flow, &nodes[b].id, &row_of).unwrap_or(ib as f64);
                    ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
                })
                .map(|(_, slot)| slot)
                .collect()
        };
        for (row, &slot) in ordered.iter().enumerate() {
            row_of.insert(nodes[slot].id.as_str(), row);
            positions.insert(
                nodes[slot].id.clone(),
                Point {
                    x: layer as f64 * COLUMN_WIDTH,
                    y: row as f64 * ROW_HEIGHT,
                },
            );
        }
    }

    // Anything unreachable lands in an overflow column one past the
    // deepest layer, stacked in document order.
    let overflow_x = layer_count as f64 * COLUMN_WIDTH;
    let mut overflow_row = 0usize;
    for node in nodes {
        if !layers.contains_key(node.id.as_str()) {
            positions.insert(
                node.id.clone(),
                Point {
                    x: overflow_x,
                    y: overflow_row as f64 * ROW_HEIGHT,
                },
            );
            overflow_row += 1;
        }
    }

    positions
}

/// Breadth-first layer assignment from the start node.
///
/// A node's layer is the length of the shortest discovered path, except
/// that a merge point reached again via a longer path sinks to the later
/// layer, keeping the drawing forward-flowing. Relaxation is bounded per
/// node so graphs with cycles still terminate.
fn assign_layers(flow: &FlowDefinition) -> AHashMap<String, usize> {
    let mut layers: AHashMap<String, usize> = AHashMap::new();
    let Some(start) = flow.start_node() else {
        return layers;
    };

    let max_bumps = flow.nodes().len();
    let mut bumps: AHashMap<String, usize> = AHashMap::new();
    let mut queue = VecDeque::new();
    layers.insert(start.id.clone(), 0);
    queue.push_back(start.id.clone());

    while let Some(id) = queue.pop_front() {
        let Some(next_layer) = layers.get(&id).map(|&layer| layer + 1) else {
            continue;
        };
        for conn in flow.connections_from(&id) {
            if !flow.contains_node(&conn.target) {
                continue;
            }
            match layers.get(&conn.target) {
                None => {
                    layers.insert(conn.target.clone(), next_layer);
                    queue.push_back(conn.target.clone());
                }
                Some(&existing) if next_layer > existing => {
                    let bump = bumps.entry(conn.target.clone()).or_insert(0);
                    if *bump < max_bumps {
                        *bump += 1;
                        layers.insert(conn.target.clone(), next_layer);
                        queue.push_back(conn.target.clone());
                    }
                }
                Some(_) => {}
            }
        }
    }

    layers
}

/// Mean row of the node's placed predecessors; `None` when no predecessor
/// has a row yet.
fn barycenter(flow: &FlowDefinition, id: &str, row_of: &AHashMap<&str, usize>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for conn in flow.connections() {
        if conn.target == id {
            if let Some(&row) = row_of.get(conn.source.as_str()) {
                sum += row as f64;
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}
