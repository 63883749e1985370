// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde_json::Value;

use super::serializer::PropertyDeserializer;
use crate::layout::{layout_state_machine, StateMachineLayout};
use crate::model::graph::{NodeRef, PropertyBag, StateGraph, StateNode, TransitionNode};
use crate::notify::{NotificationSink, Severity};

/// How far a build got. Every phase short of [`BuildPhase::LaidOut`] still
/// yields a valid partial graph; nothing is rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildPhase {
    Empty,
    StatesCreated,
    TransitionsWired,
    EntryWired,
    LaidOut,
}

/// Result of rebuilding one state-machine asset.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMachineImport {
    graph: StateGraph,
    layout: StateMachineLayout,
    phase: BuildPhase,
}

impl StateMachineImport {
    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    pub fn layout(&self) -> &StateMachineLayout {
        &self.layout
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }
}

/// Hands out names derived from a requested name, made unique with a numeric
/// suffix when the plain name is already taken.
#[derive(Debug, Default)]
struct UniqueNamer {
    taken: BTreeMap<String, usize>,
}

impl UniqueNamer {
    fn claim(&mut self, requested: &str) -> String {
        if !self.taken.contains_key(requested) {
            self.taken.insert(requested.to_owned(), 0);
            return requested.to_owned();
        }

        let mut suffix = self.taken[requested];
        loop {
            suffix += 1;
            let candidate = format!("{requested}_{suffix}");
            if !self.taken.contains_key(&candidate) {
                self.taken.insert(requested.to_owned(), suffix);
                self.taken.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}

/// Rebuilds a state-machine graph from the document shape described in the
/// snapshot format: a flat `States` list, a flat `Transitions` list indexing
/// states by position, and an `InitialState` position.
///
/// Transition metadata is stored twice in the source: the flat list carries
/// the endpoints and the desired-result flag, while the *from* state's own
/// nested `Transitions` list carries the automatic rule and extra properties,
/// tagged with the flat ordinal. The two lists are reconciled by that
/// ordinal, never by position.
pub struct StateMachineBuilder<'a> {
    deserializer: &'a dyn PropertyDeserializer,
    sink: &'a dyn NotificationSink,
}

impl<'a> StateMachineBuilder<'a> {
    pub fn new(deserializer: &'a dyn PropertyDeserializer, sink: &'a dyn NotificationSink) -> Self {
        Self { deserializer, sink }
    }

    pub fn build(&self, doc: &PropertyBag) -> StateMachineImport {
        let mut graph = StateGraph::new();
        let mut namer = UniqueNamer::default();

        let Some(states_src) = doc.get("States").and_then(Value::as_array) else {
            self.sink
                .notify("document has no States list", Severity::Warning);
            return StateMachineImport {
                graph,
                layout: StateMachineLayout::default(),
                phase: BuildPhase::Empty,
            };
        };
        let transitions_src = doc
            .get("Transitions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let state_map = self.create_states(states_src, &mut graph, &mut namer);
        self.create_transitions(transitions_src, states_src, &state_map, &mut graph, &mut namer);

        let entry_wired = self.wire_entry(doc.get("InitialState"), &state_map, &mut graph);
        if !entry_wired {
            return StateMachineImport {
                graph,
                layout: StateMachineLayout::default(),
                phase: BuildPhase::TransitionsWired,
            };
        }

        let layout = layout_state_machine(&graph);
        StateMachineImport {
            graph,
            layout,
            phase: BuildPhase::LaidOut,
        }
    }

    /// Creates one state node per source entry and keys it by its *position*
    /// in the source list; the flat transition list addresses states by that
    /// position, not by name.
    fn create_states(
        &self,
        states_src: &[Value],
        graph: &mut StateGraph,
        namer: &mut UniqueNamer,
    ) -> BTreeMap<usize, usize> {
        let mut state_map = BTreeMap::new();

        for (position, state_value) in states_src.iter().enumerate() {
            let Some(name) = state_value
                .as_object()
                .and_then(|obj| obj.get("StateName"))
                .and_then(Value::as_str)
            else {
                self.sink.notify(
                    &format!("state {position} has no usable StateName, skipped"),
                    Severity::Warning,
                );
                continue;
            };

            let unique = namer.claim(name);
            let state_index = graph.add_state(StateNode::new(unique));
            state_map.insert(position, state_index);
        }

        state_map
    }

    fn create_transitions(
        &self,
        transitions_src: &[Value],
        states_src: &[Value],
        state_map: &BTreeMap<usize, usize>,
        graph: &mut StateGraph,
        namer: &mut UniqueNamer,
    ) {
        for (ordinal, transition_value) in transitions_src.iter().enumerate() {
            let Some(record) = transition_value.as_object() else {
                self.sink.notify(
                    &format!("transition {ordinal} is not an object, skipped"),
                    Severity::Warning,
                );
                continue;
            };

            let (Some(prev), Some(next)) = (
                record.get("PreviousState").and_then(Value::as_u64),
                record.get("NextState").and_then(Value::as_u64),
            ) else {
                self.sink.notify(
                    &format!("transition {ordinal} has no usable endpoints, skipped"),
                    Severity::Warning,
                );
                continue;
            };
            let (prev, next) = (prev as usize, next as usize);

            let (Some(&from_state), Some(&to_state)) = (state_map.get(&prev), state_map.get(&next))
            else {
                self.sink.notify(
                    &format!(
                        "transition {ordinal} references state {} which does not exist, skipped",
                        if state_map.contains_key(&prev) { next } else { prev }
                    ),
                    Severity::Warning,
                );
                continue;
            };

            let can_enter = record
                .get("bDesiredTransitionReturnValue")
                .and_then(Value::as_bool)
                .unwrap_or(false);

            let from_name = graph
                .state(from_state)
                .map(|s| s.name().to_owned())
                .unwrap_or_default();
            let to_name = graph
                .state(to_state)
                .map(|s| s.name().to_owned())
                .unwrap_or_default();
            let bound_name = namer.claim(&format!("{from_name}_to_{to_name}"));

            let mut transition = TransitionNode::new(bound_name, can_enter);
            self.reconcile_metadata(ordinal, prev, states_src, &mut transition);
            let transition_index = graph.add_transition(transition);

            if !graph.wire(NodeRef::State(from_state), NodeRef::Transition(transition_index)) {
                self.sink.notify(
                    &format!("transition {ordinal}: no output pin on its from state, not wired"),
                    Severity::Warning,
                );
            }
            if !graph.wire(NodeRef::Transition(transition_index), NodeRef::State(to_state)) {
                self.sink.notify(
                    &format!("transition {ordinal}: no input pin on its to state, not wired"),
                    Severity::Warning,
                );
            }
        }
    }

    /// Correlates one flat transition with the duplicate metadata inside its
    /// *from* state's nested `Transitions` list, matched by the nested
    /// entry's `TransitionIndex` ordinal (the lists need not be the same
    /// length or order).
    ///
    /// A state with no nested list at all keeps the defaults silently
    /// (`automatic_rule = false`, no extra properties). A nested list with no
    /// matching ordinal keeps the same defaults but warns; the source format
    /// assumes a match always exists, and a miss must not cost the transition
    /// itself.
    fn reconcile_metadata(
        &self,
        ordinal: usize,
        from_position: usize,
        states_src: &[Value],
        transition: &mut TransitionNode,
    ) {
        let Some(nested) = states_src
            .get(from_position)
            .and_then(Value::as_object)
            .and_then(|state| state.get("Transitions"))
            .and_then(Value::as_array)
        else {
            return;
        };

        let matched = nested.iter().filter_map(Value::as_object).find(|entry| {
            entry
                .get("TransitionIndex")
                .and_then(Value::as_u64)
                .is_some_and(|index| index as usize == ordinal)
        });

        let Some(metadata) = matched else {
            self.sink.notify(
                &format!(
                    "transition {ordinal}: no nested metadata with TransitionIndex {ordinal} \
                     on its from state, using defaults"
                ),
                Severity::Warning,
            );
            return;
        };

        transition.set_automatic_rule(
            metadata
                .get("bAutomaticRemainingTimeRule")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        );
        self.deserializer
            .deserialize_into(metadata, transition.properties_mut());
    }

    /// Connects the entry pseudo-node to the initial state. An invalid
    /// initial index or a missing connection point aborts entry wiring only;
    /// the rest of the graph stays valid.
    fn wire_entry(
        &self,
        initial_state: Option<&Value>,
        state_map: &BTreeMap<usize, usize>,
        graph: &mut StateGraph,
    ) -> bool {
        let Some(initial) = initial_state.and_then(Value::as_u64) else {
            self.sink.notify(
                "no usable InitialState, entry not wired",
                Severity::Warning,
            );
            return false;
        };

        let Some(&state_index) = state_map.get(&(initial as usize)) else {
            self.sink.notify(
                &format!("InitialState {initial} is not a known state, entry not wired"),
                Severity::Warning,
            );
            return false;
        };

        if !graph.wire(NodeRef::Entry, NodeRef::State(state_index)) {
            self.sink.notify(
                "entry connection point is missing, entry not wired",
                Severity::Warning,
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BuildPhase, StateMachineBuilder, UniqueNamer};
    use crate::import::serializer::JsonPropertyDeserializer;
    use crate::model::graph::PropertyBag;
    use crate::notify::{MemorySink, Severity};

    fn bag(value: serde_json::Value) -> PropertyBag {
        value.as_object().expect("object fixture").clone()
    }

    fn build(doc: serde_json::Value) -> (super::StateMachineImport, MemorySink) {
        let deserializer = JsonPropertyDeserializer::new();
        let sink = MemorySink::new();
        let import = StateMachineBuilder::new(&deserializer, &sink).build(&bag(doc));
        (import, sink)
    }

    #[test]
    fn unique_namer_suffixes_collisions() {
        let mut namer = UniqueNamer::default();
        assert_eq!(namer.claim("Idle"), "Idle");
        assert_eq!(namer.claim("Idle"), "Idle_1");
        assert_eq!(namer.claim("Idle"), "Idle_2");
        assert_eq!(namer.claim("Walk"), "Walk");
    }

    #[test]
    fn creates_one_state_per_entry_keyed_by_position() {
        let (import, sink) = build(json!({
            "States": [
                { "StateName": "Idle" },
                { "StateName": "Walk" },
                { "StateName": "Run" }
            ],
            "Transitions": [],
            "InitialState": 0
        }));

        let states = import.graph().states();
        assert_eq!(states.len(), 3);
        assert_eq!(states[0].name(), "Idle");
        assert_eq!(states[1].name(), "Walk");
        assert_eq!(states[2].name(), "Run");
        assert!(sink.is_empty());
    }

    #[test]
    fn duplicate_state_names_get_unique_bound_graphs() {
        let (import, _) = build(json!({
            "States": [
                { "StateName": "Idle" },
                { "StateName": "Idle" }
            ],
            "Transitions": [],
            "InitialState": 0
        }));

        let states = import.graph().states();
        assert_eq!(states[0].bound_graph().name(), "Idle");
        assert_eq!(states[1].bound_graph().name(), "Idle_1");
    }

    #[test]
    fn out_of_range_transition_is_skipped_not_fatal() {
        let (import, sink) = build(json!({
            "States": [
                { "StateName": "A" },
                { "StateName": "B" },
                { "StateName": "C" }
            ],
            "Transitions": [
                { "PreviousState": 0, "NextState": 1, "bDesiredTransitionReturnValue": true },
                { "PreviousState": 1, "NextState": 5, "bDesiredTransitionReturnValue": true }
            ],
            "InitialState": 0
        }));

        assert_eq!(import.graph().transitions().len(), 1);
        assert_eq!(import.phase(), BuildPhase::LaidOut);
        let warnings = sink.messages_with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("state 5"));
    }

    #[test]
    fn can_enter_comes_from_the_flat_record() {
        let (import, _) = build(json!({
            "States": [ { "StateName": "A" }, { "StateName": "B" } ],
            "Transitions": [
                { "PreviousState": 0, "NextState": 1, "bDesiredTransitionReturnValue": false }
            ],
            "InitialState": 0
        }));

        assert!(!import.graph().transitions()[0].can_enter());
    }

    #[test]
    fn reconciliation_matches_by_ordinal_value_not_list_position() {
        // The nested list is deliberately out of order: the entry for flat
        // ordinal 0 sits last.
        let (import, sink) = build(json!({
            "States": [
                {
                    "StateName": "A",
                    "Transitions": [
                        { "TransitionIndex": 1, "bAutomaticRemainingTimeRule": false },
                        { "TransitionIndex": 0, "bAutomaticRemainingTimeRule": true,
                          "CrossfadeDuration": 0.4 }
                    ]
                },
                { "StateName": "B" }
            ],
            "Transitions": [
                { "PreviousState": 0, "NextState": 1, "bDesiredTransitionReturnValue": true },
                { "PreviousState": 0, "NextState": 1, "bDesiredTransitionReturnValue": true }
            ],
            "InitialState": 0
        }));

        let transitions = import.graph().transitions();
        assert!(transitions[0].automatic_rule());
        assert!(!transitions[1].automatic_rule());
        assert_eq!(
            transitions[0].properties().get("CrossfadeDuration"),
            Some(&json!(0.4))
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn reconciliation_miss_defaults_and_warns_but_keeps_the_transition() {
        let (import, sink) = build(json!({
            "States": [
                { "StateName": "A", "Transitions": [ { "TransitionIndex": 7 } ] },
                { "StateName": "B" }
            ],
            "Transitions": [
                { "PreviousState": 0, "NextState": 1, "bDesiredTransitionReturnValue": true }
            ],
            "InitialState": 0
        }));

        let transitions = import.graph().transitions();
        assert_eq!(transitions.len(), 1);
        assert!(!transitions[0].automatic_rule());
        assert!(transitions[0].properties().is_empty());

        let warnings = sink.messages_with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("no nested metadata"));
    }

    #[test]
    fn invalid_initial_state_stops_at_transitions_wired() {
        let (import, sink) = build(json!({
            "States": [ { "StateName": "A" }, { "StateName": "B" } ],
            "Transitions": [
                { "PreviousState": 0, "NextState": 1, "bDesiredTransitionReturnValue": true }
            ],
            "InitialState": 9
        }));

        assert_eq!(import.phase(), BuildPhase::TransitionsWired);
        assert_eq!(import.graph().entry_target(), None);
        // Graph topology is still intact.
        assert_eq!(import.graph().transitions().len(), 1);
        assert!(import.layout().positions().is_empty());
        assert_eq!(sink.messages_with_severity(Severity::Warning).len(), 1);
    }

    #[test]
    fn entry_is_wired_to_the_initial_state() {
        let (import, _) = build(json!({
            "States": [ { "StateName": "A" }, { "StateName": "B" } ],
            "Transitions": [],
            "InitialState": 1
        }));

        assert_eq!(import.graph().entry_target(), Some(1));
        assert_eq!(import.phase(), BuildPhase::LaidOut);
    }

    #[test]
    fn malformed_state_entries_keep_siblings() {
        let (import, sink) = build(json!({
            "States": [
                { "StateName": "A" },
                { "NoStateName": true },
                { "StateName": "C" }
            ],
            "Transitions": [
                { "PreviousState": 0, "NextState": 2, "bDesiredTransitionReturnValue": true },
                { "PreviousState": 0, "NextState": 1, "bDesiredTransitionReturnValue": true }
            ],
            "InitialState": 0
        }));

        // The malformed slot is absent from the state map, so the transition
        // into position 1 is skipped like an out-of-range reference.
        assert_eq!(import.graph().states().len(), 2);
        assert_eq!(import.graph().transitions().len(), 1);
        assert_eq!(sink.messages_with_severity(Severity::Warning).len(), 2);
    }
}
