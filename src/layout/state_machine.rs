// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use crate::model::graph::{NodeRef, StateGraph};

pub const HORIZONTAL_SPACING: f32 = 400.0;
pub const VERTICAL_SPACING: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    fn midpoint(a: Point, b: Point) -> Point {
        Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
    }
}

/// Deterministic placement of a reconstructed state machine.
///
/// Levels are shortest hop-counts from the initial state; nodes unreachable
/// from it appear in neither map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateMachineLayout {
    levels: BTreeMap<usize, usize>,
    positions: BTreeMap<NodeRef, Point>,
}

impl StateMachineLayout {
    pub fn levels(&self) -> &BTreeMap<usize, usize> {
        &self.levels
    }

    pub fn level(&self, state_index: usize) -> Option<usize> {
        self.levels.get(&state_index).copied()
    }

    pub fn positions(&self) -> &BTreeMap<NodeRef, Point> {
        &self.positions
    }

    pub fn position(&self, node: NodeRef) -> Option<Point> {
        self.positions.get(&node).copied()
    }
}

/// Deterministic layered layout for state-machine graphs.
///
/// Pure over the graph: reads topology, produces placements, mutates nothing.
/// Running it twice on an unchanged graph yields equal output.
///
/// - Levels come from multi-pass relaxation starting at the entry-wired
///   initial state (uniform edge weight 1). Levels only ever shrink and are
///   bounded below by 0, so the queue drains after at most node-count passes
///   and each reachable node ends at its shortest hop-count.
/// - Within a level, states are ordered by name ascending.
/// - `x = level * 400`, `y` symmetric about 0 with spacing 200.
/// - Each transition sits at the midpoint of its resolved endpoints.
pub fn layout_state_machine(graph: &StateGraph) -> StateMachineLayout {
    let Some(initial) = graph.entry_target() else {
        return StateMachineLayout::default();
    };
    if graph.state(initial).is_none() {
        return StateMachineLayout::default();
    }

    let mut outgoing = BTreeMap::<usize, BTreeSet<usize>>::new();
    for index in 0..graph.transitions().len() {
        if let (Some(from), Some(to)) = graph.transition_endpoints(index) {
            outgoing.entry(from).or_default().insert(to);
        }
    }

    let mut levels = BTreeMap::<usize, usize>::new();
    let mut queue = VecDeque::new();
    levels.insert(initial, 0);
    queue.push_back(initial);

    while let Some(current) = queue.pop_front() {
        let current_level = levels[&current];
        let Some(next_states) = outgoing.get(&current) else {
            continue;
        };
        for &next in next_states {
            let candidate = current_level + 1;
            if levels.get(&next).map_or(true, |&existing| candidate < existing) {
                levels.insert(next, candidate);
                queue.push_back(next);
            }
        }
    }

    let mut by_level = BTreeMap::<usize, Vec<usize>>::new();
    for (&state, &level) in &levels {
        by_level.entry(level).or_default().push(state);
    }

    let mut positions = BTreeMap::new();
    for (&level, states) in by_level.iter_mut() {
        states.sort_by(|&a, &b| {
            let name_a = graph.state(a).map(|s| s.name()).unwrap_or_default();
            let name_b = graph.state(b).map(|s| s.name()).unwrap_or_default();
            name_a.cmp(name_b).then(a.cmp(&b))
        });

        let x = level as f32 * HORIZONTAL_SPACING;
        let start_y = -((states.len() - 1) as f32 * VERTICAL_SPACING) * 0.5;
        for (slot, &state) in states.iter().enumerate() {
            positions.insert(
                NodeRef::State(state),
                Point::new(x, start_y + slot as f32 * VERTICAL_SPACING),
            );
        }
    }

    for index in 0..graph.transitions().len() {
        let (Some(from), Some(to)) = graph.transition_endpoints(index) else {
            continue;
        };
        let (Some(from_pos), Some(to_pos)) = (
            positions.get(&NodeRef::State(from)).copied(),
            positions.get(&NodeRef::State(to)).copied(),
        ) else {
            continue;
        };
        positions.insert(NodeRef::Transition(index), Point::midpoint(from_pos, to_pos));
    }

    StateMachineLayout { levels, positions }
}
