// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;
use smol_str::SmolStr;

/// Loose property payload carried by reconstructed nodes.
///
/// Populated by the external property deserializer; this crate never
/// interprets the fields, it only stores them.
pub type PropertyBag = serde_json::Map<String, serde_json::Value>;

/// Handle to one node of a [`StateGraph`].
///
/// State and transition indices are positions in the graph's node vectors and
/// stay stable for the lifetime of the graph (nodes are never removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    Entry,
    State(usize),
    Transition(usize),
}

/// A directional connection point on a node.
///
/// Wiring records the link on both endpoints, so an edge `u -> v` appears in
/// `u`'s output pin and in `v`'s input pin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pin {
    links: SmallVec<[NodeRef; 2]>,
}

impl Pin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> &[NodeRef] {
        &self.links
    }

    pub fn first_link(&self) -> Option<NodeRef> {
        self.links.first().copied()
    }

    fn push_link(&mut self, node: NodeRef) {
        if !self.links.contains(&node) {
            self.links.push(node);
        }
    }
}

/// The designated entry pseudo-node; its single output is wired to the
/// initial state to make the machine runnable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNode {
    output_pin: Option<Pin>,
}

impl EntryNode {
    pub fn new() -> Self {
        Self {
            output_pin: Some(Pin::new()),
        }
    }

    pub fn output_pin(&self) -> Option<&Pin> {
        self.output_pin.as_ref()
    }

    pub fn set_output_pin(&mut self, pin: Option<Pin>) {
        self.output_pin = pin;
    }
}

impl Default for EntryNode {
    fn default() -> Self {
        Self::new()
    }
}

/// The subgraph bound to a state node (the state's own animation graph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSubgraph {
    name: SmolStr,
}

impl StateSubgraph {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<SmolStr>) {
        self.name = name.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateNode {
    name: SmolStr,
    bound_graph: StateSubgraph,
    input_pin: Option<Pin>,
    output_pin: Option<Pin>,
}

impl StateNode {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        Self {
            bound_graph: StateSubgraph::new(name.clone()),
            name,
            input_pin: Some(Pin::new()),
            output_pin: Some(Pin::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bound_graph(&self) -> &StateSubgraph {
        &self.bound_graph
    }

    pub fn bound_graph_mut(&mut self) -> &mut StateSubgraph {
        &mut self.bound_graph
    }

    pub fn input_pin(&self) -> Option<&Pin> {
        self.input_pin.as_ref()
    }

    pub fn output_pin(&self) -> Option<&Pin> {
        self.output_pin.as_ref()
    }

    pub fn set_input_pin(&mut self, pin: Option<Pin>) {
        self.input_pin = pin;
    }

    pub fn set_output_pin(&mut self, pin: Option<Pin>) {
        self.output_pin = pin;
    }
}

/// Result node of a transition's condition-evaluation subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    can_enter: bool,
}

impl TransitionResult {
    pub fn new(can_enter: bool) -> Self {
        Self { can_enter }
    }

    pub fn can_enter(&self) -> bool {
        self.can_enter
    }

    pub fn set_can_enter(&mut self, can_enter: bool) {
        self.can_enter = can_enter;
    }
}

/// The subgraph bound to a transition node. Only the result node's verdict is
/// reconstructed; condition semantics are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSubgraph {
    name: SmolStr,
    result: TransitionResult,
}

impl TransitionSubgraph {
    pub fn new(name: impl Into<SmolStr>, can_enter: bool) -> Self {
        Self {
            name: name.into(),
            result: TransitionResult::new(can_enter),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn result(&self) -> &TransitionResult {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut TransitionResult {
        &mut self.result
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionNode {
    bound_graph: TransitionSubgraph,
    automatic_rule: bool,
    properties: PropertyBag,
    input_pin: Option<Pin>,
    output_pin: Option<Pin>,
}

impl TransitionNode {
    pub fn new(bound_graph_name: impl Into<SmolStr>, can_enter: bool) -> Self {
        Self {
            bound_graph: TransitionSubgraph::new(bound_graph_name, can_enter),
            automatic_rule: false,
            properties: PropertyBag::new(),
            input_pin: Some(Pin::new()),
            output_pin: Some(Pin::new()),
        }
    }

    pub fn bound_graph(&self) -> &TransitionSubgraph {
        &self.bound_graph
    }

    pub fn bound_graph_mut(&mut self) -> &mut TransitionSubgraph {
        &mut self.bound_graph
    }

    pub fn can_enter(&self) -> bool {
        self.bound_graph.result().can_enter()
    }

    pub fn automatic_rule(&self) -> bool {
        self.automatic_rule
    }

    pub fn set_automatic_rule(&mut self, automatic_rule: bool) {
        self.automatic_rule = automatic_rule;
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    pub fn input_pin(&self) -> Option<&Pin> {
        self.input_pin.as_ref()
    }

    pub fn output_pin(&self) -> Option<&Pin> {
        self.output_pin.as_ref()
    }

    pub fn set_input_pin(&mut self, pin: Option<Pin>) {
        self.input_pin = pin;
    }

    pub fn set_output_pin(&mut self, pin: Option<Pin>) {
        self.output_pin = pin;
    }
}

/// The reconstructed state-machine graph: one entry pseudo-node, state nodes
/// in source order, transition nodes in flat-list order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateGraph {
    entry: EntryNode,
    states: Vec<StateNode>,
    transitions: Vec<TransitionNode>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self) -> &EntryNode {
        &self.entry
    }

    pub fn entry_mut(&mut self) -> &mut EntryNode {
        &mut self.entry
    }

    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    pub fn state(&self, index: usize) -> Option<&StateNode> {
        self.states.get(index)
    }

    pub fn state_mut(&mut self, index: usize) -> Option<&mut StateNode> {
        self.states.get_mut(index)
    }

    pub fn transitions(&self) -> &[TransitionNode] {
        &self.transitions
    }

    pub fn transition(&self, index: usize) -> Option<&TransitionNode> {
        self.transitions.get(index)
    }

    pub fn transition_mut(&mut self, index: usize) -> Option<&mut TransitionNode> {
        self.transitions.get_mut(index)
    }

    pub fn add_state(&mut self, state: StateNode) -> usize {
        self.states.push(state);
        self.states.len() - 1
    }

    pub fn add_transition(&mut self, transition: TransitionNode) -> usize {
        self.transitions.push(transition);
        self.transitions.len() - 1
    }

    /// Wires a directed link from `source`'s output pin to `dest`'s input pin.
    ///
    /// Returns `false` without mutating anything when either connection point
    /// is absent (the caller skips that one link and continues).
    pub fn wire(&mut self, source: NodeRef, dest: NodeRef) -> bool {
        if source == dest {
            return false;
        }
        if self.output_pin(source).is_none() || self.input_pin(dest).is_none() {
            return false;
        }

        self.output_pin_mut(source)
            .expect("presence checked above")
            .push_link(dest);
        self.input_pin_mut(dest)
            .expect("presence checked above")
            .push_link(source);
        true
    }

    /// The state the entry pseudo-node is wired to, if entry wiring happened.
    pub fn entry_target(&self) -> Option<usize> {
        match self.entry.output_pin()?.first_link()? {
            NodeRef::State(index) => Some(index),
            _ => None,
        }
    }

    /// Resolved `(from_state, to_state)` endpoints of one transition, read
    /// back from its pins. Either side is `None` when its wiring was skipped.
    pub fn transition_endpoints(&self, index: usize) -> (Option<usize>, Option<usize>) {
        let Some(transition) = self.transition(index) else {
            return (None, None);
        };

        let from = transition.input_pin().and_then(|pin| match pin.first_link() {
            Some(NodeRef::State(state)) => Some(state),
            _ => None,
        });
        let to = transition.output_pin().and_then(|pin| match pin.first_link() {
            Some(NodeRef::State(state)) => Some(state),
            _ => None,
        });
        (from, to)
    }

    fn output_pin(&self, node: NodeRef) -> Option<&Pin> {
        match node {
            NodeRef::Entry => self.entry.output_pin(),
            NodeRef::State(index) => self.states.get(index)?.output_pin(),
            NodeRef::Transition(index) => self.transitions.get(index)?.output_pin(),
        }
    }

    fn input_pin(&self, node: NodeRef) -> Option<&Pin> {
        match node {
            NodeRef::Entry => None,
            NodeRef::State(index) => self.states.get(index)?.input_pin(),
            NodeRef::Transition(index) => self.transitions.get(index)?.input_pin(),
        }
    }

    fn output_pin_mut(&mut self, node: NodeRef) -> Option<&mut Pin> {
        match node {
            NodeRef::Entry => self.entry.output_pin.as_mut(),
            NodeRef::State(index) => self.states.get_mut(index)?.output_pin.as_mut(),
            NodeRef::Transition(index) => self.transitions.get_mut(index)?.output_pin.as_mut(),
        }
    }

    fn input_pin_mut(&mut self, node: NodeRef) -> Option<&mut Pin> {
        match node {
            NodeRef::Entry => None,
            NodeRef::State(index) => self.states.get_mut(index)?.input_pin.as_mut(),
            NodeRef::Transition(index) => self.transitions.get_mut(index)?.input_pin.as_mut(),
        }
    }
}
