// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Object materialization from the export table.
//!
//! [`GraphImporter`] turns exports into live objects (dedup by identity,
//! explicit ownership table, leaf fields via the external property
//! deserializer) and [`StateMachineBuilder`] specializes that for the
//! state-machine schema: state nodes, transition nodes, directed wiring,
//! two-location metadata reconciliation, entry wiring, layout.

pub mod object_graph;
pub mod serializer;
pub mod state_machine;

pub use object_graph::{
    GraphImporter, ImportError, ImportSummary, ImportedObject, MalformedReason, MemoryRegistry,
    ObjectClass, ObjectRegistry,
};
pub use serializer::{JsonPropertyDeserializer, PropertyDeserializer, RESERVED_KEYS};
pub use state_machine::{BuildPhase, StateMachineBuilder, StateMachineImport};
