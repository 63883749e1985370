// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model for reconstructed state-machine graphs.
//!
//! A [`StateGraph`] holds the entry pseudo-node, the state nodes in source
//! order, and the transition nodes in flat-list order; wiring lives in pins.

pub mod graph;
pub mod ids;

pub use graph::{
    EntryNode, NodeRef, Pin, PropertyBag, StateGraph, StateNode, StateSubgraph, TransitionNode,
    TransitionResult, TransitionSubgraph,
};
pub use ids::{ExportName, Name, NameError};
