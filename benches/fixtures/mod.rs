// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    MediumChain,
    LargeDense,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumChain => "medium_chain",
            Self::LargeDense => "large_dense",
        }
    }
}

pub fn snapshot(case: Case) -> Vec<Value> {
    match case {
        Case::Small => state_machine_snapshot(4, 1),
        Case::MediumChain => state_machine_snapshot(64, 1),
        Case::LargeDense => state_machine_snapshot(128, 4),
    }
}

/// A snapshot with one state-machine export: `states` states in a ring, each
/// with `fan_out` forward transitions, nested metadata for every transition.
pub fn state_machine_snapshot(states: usize, fan_out: usize) -> Vec<Value> {
    let mut transitions = Vec::new();
    let mut nested_per_state = vec![Vec::<Value>::new(); states];

    for from in 0..states {
        for step in 1..=fan_out {
            let ordinal = transitions.len();
            let to = (from + step) % states;
            transitions.push(json!({
                "PreviousState": from,
                "NextState": to,
                "bDesiredTransitionReturnValue": ordinal % 2 == 0
            }));
            nested_per_state[from].push(json!({
                "TransitionIndex": ordinal,
                "bAutomaticRemainingTimeRule": ordinal % 3 == 0,
                "CrossfadeDuration": (ordinal % 10) as f64 / 10.0
            }));
        }
    }

    let state_values = (0..states)
        .map(|position| {
            json!({
                "StateName": format!("State_{position:03}"),
                "Transitions": nested_per_state[position]
            })
        })
        .collect::<Vec<_>>();

    vec![json!({
        "Type": "AnimationStateMachineGraph",
        "Name": "BenchMachine",
        "Properties": {
            "States": state_values,
            "Transitions": transitions,
            "InitialState": 0
        }
    })]
}
