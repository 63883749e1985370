// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::serializer::PropertyDeserializer;
use super::state_machine::{StateMachineBuilder, StateMachineImport};
use crate::model::graph::PropertyBag;
use crate::notify::{NotificationSink, Severity};
use crate::snapshot::{subobject_export_name, ExportTable, ObjectIdentity, ResolveError};

/// Closed set of exported classes this importer knows how to materialize.
///
/// The snapshot identifies classes by string; dispatch happens once per
/// export through this tag instead of runtime reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectClass {
    StateMachineGraph,
    StateNode,
    TransitionNode,
    StateSubgraph,
    TransitionSubgraph,
}

impl ObjectClass {
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        match class_name {
            "AnimationStateMachineGraph" => Some(Self::StateMachineGraph),
            "AnimStateNode" => Some(Self::StateNode),
            "AnimStateTransitionNode" => Some(Self::TransitionNode),
            "AnimationStateGraph" => Some(Self::StateSubgraph),
            "AnimationTransitionGraph" => Some(Self::TransitionSubgraph),
            _ => None,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::StateMachineGraph => "AnimationStateMachineGraph",
            Self::StateNode => "AnimStateNode",
            Self::TransitionNode => "AnimStateTransitionNode",
            Self::StateSubgraph => "AnimationStateGraph",
            Self::TransitionSubgraph => "AnimationTransitionGraph",
        }
    }

    pub fn is_supported(class_name: &str) -> bool {
        Self::from_class_name(class_name).is_some()
    }
}

/// One materialized object: identity, class tag, and the leaf-property bag
/// the external deserializer populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedObject {
    identity: ObjectIdentity,
    class: ObjectClass,
    properties: PropertyBag,
}

impl ImportedObject {
    pub fn identity(&self) -> &ObjectIdentity {
        &self.identity
    }

    pub fn class(&self) -> ObjectClass {
        self.class
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }
}

/// Destination for finished objects. The importer hands each materialized
/// object off exactly once; persistence is the host's concern.
pub trait ObjectRegistry {
    fn register(&mut self, object: &ImportedObject);
}

/// Registry that keeps registered objects in memory, in hand-off order.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    objects: Vec<ImportedObject>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[ImportedObject] {
        &self.objects
    }
}

impl ObjectRegistry for MemoryRegistry {
    fn register(&mut self, object: &ImportedObject) {
        self.objects.push(object.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    Resolve(ResolveError),
    MalformedRecord { index: usize, reason: MalformedReason },
    WrongClass { index: usize, expected: ObjectClass, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    MissingName,
    MissingClass,
    UnsupportedClass { class_name: String },
    MissingProperties,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(err) => write!(f, "{err}"),
            Self::MalformedRecord { index, reason } => {
                write!(f, "export {index} is malformed: {reason}")
            }
            Self::WrongClass { index, expected, found } => {
                write!(
                    f,
                    "export {index} has class '{found}', expected '{}'",
                    expected.class_name()
                )
            }
        }
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => f.write_str("missing or invalid 'Name'"),
            Self::MissingClass => f.write_str("missing 'Type'"),
            Self::UnsupportedClass { class_name } => {
                write!(f, "unsupported class '{class_name}'")
            }
            Self::MissingProperties => f.write_str("missing 'Properties'"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Resolve(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolveError> for ImportError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

/// Outcome counters for one whole-table import pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    pub materialized: usize,
    pub skipped: usize,
}

/// Materializes live objects from an export table.
///
/// Owns the dedup map and the ownership table for the duration of one import
/// call; ownership is recorded as an explicit child-to-parent identity table,
/// never as a back-pointer.
pub struct GraphImporter<'a> {
    table: &'a ExportTable,
    deserializer: &'a dyn PropertyDeserializer,
    sink: &'a dyn NotificationSink,
    objects: BTreeMap<ObjectIdentity, ImportedObject>,
    ownership: BTreeMap<ObjectIdentity, ObjectIdentity>,
}

impl<'a> GraphImporter<'a> {
    pub fn new(
        table: &'a ExportTable,
        deserializer: &'a dyn PropertyDeserializer,
        sink: &'a dyn NotificationSink,
    ) -> Self {
        Self {
            table,
            deserializer,
            sink,
            objects: BTreeMap::new(),
            ownership: BTreeMap::new(),
        }
    }

    pub fn objects(&self) -> &BTreeMap<ObjectIdentity, ImportedObject> {
        &self.objects
    }

    pub fn object(&self, identity: &ObjectIdentity) -> Option<&ImportedObject> {
        self.objects.get(identity)
    }

    /// Parent identity of a materialized object, per the ownership table.
    pub fn parent_of(&self, identity: &ObjectIdentity) -> Option<&ObjectIdentity> {
        self.ownership.get(identity)
    }

    /// Materializes every export in table order, then hands each finished
    /// object to the registry once. Failures skip the one record and are
    /// surfaced through the sink; siblings are unaffected.
    pub fn import_all(&mut self, registry: &mut dyn ObjectRegistry) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for index in 0..self.table.len() {
            match self.materialize(index) {
                Ok(_) => summary.materialized += 1,
                Err(err) => {
                    summary.skipped += 1;
                    self.sink
                        .notify(&format!("skipped export {index}: {err}"), Severity::Warning);
                }
            }
        }

        for object in self.objects.values() {
            registry.register(object);
        }

        summary
    }

    /// Materializes the object for one export, reusing an already-built
    /// object when the `(name, outer)` identity was seen before.
    pub fn materialize(&mut self, index: usize) -> Result<ObjectIdentity, ImportError> {
        let record = self.table.resolve_by_index(index)?;

        let identity = record.identity().ok_or(ImportError::MalformedRecord {
            index,
            reason: MalformedReason::MissingName,
        })?;
        if self.objects.contains_key(&identity) {
            return Ok(identity);
        }

        let class_name = record.class_name().ok_or(ImportError::MalformedRecord {
            index,
            reason: MalformedReason::MissingClass,
        })?;
        let class =
            ObjectClass::from_class_name(class_name).ok_or(ImportError::MalformedRecord {
                index,
                reason: MalformedReason::UnsupportedClass {
                    class_name: class_name.to_owned(),
                },
            })?;

        // Insert before recursing so diamond references and cycles reuse
        // this object instead of materializing it twice.
        self.objects.insert(
            identity.clone(),
            ImportedObject {
                identity: identity.clone(),
                class,
                properties: PropertyBag::new(),
            },
        );

        self.materialize_owner(&identity);
        self.materialize_references(index, &identity);

        let record = self.table.resolve_by_index(index)?;
        if let Some(properties) = record.properties() {
            let object = self
                .objects
                .get_mut(&identity)
                .expect("object inserted above");
            self.deserializer
                .deserialize_into(properties, &mut object.properties);
        }

        Ok(identity)
    }

    /// Resolves the outer name to its owning export and records the
    /// child-to-parent edge. An outer that is not itself an export (e.g. the
    /// package) makes this object a root; that is not an error.
    fn materialize_owner(&mut self, identity: &ObjectIdentity) {
        let Some(outer) = identity.outer().cloned() else {
            return;
        };
        let Some(owner_index) = self.table.find_by_name(outer.as_str()).map(|r| r.index()) else {
            return;
        };

        match self.materialize(owner_index) {
            Ok(parent) => {
                self.ownership.insert(identity.clone(), parent);
            }
            Err(err) => {
                self.sink.notify(
                    &format!("owner '{outer}' of '{identity}' not materialized: {err}"),
                    Severity::Warning,
                );
            }
        }
    }

    /// Walks the payload for subobject references (`Class'Name'`) and
    /// materializes each referenced export. A reference that resolves to
    /// nothing is skipped with a warning; the rest of the graph continues.
    fn materialize_references(&mut self, index: usize, identity: &ObjectIdentity) {
        let Ok(record) = self.table.resolve_by_index(index) else {
            return;
        };
        let Some(properties) = record.properties() else {
            return;
        };

        let mut referenced = Vec::new();
        for value in properties.values() {
            collect_subobject_names(value, &mut referenced);
        }

        for name in referenced {
            let Some(target_index) = self.table.find_by_name(&name).map(|r| r.index()) else {
                self.sink.notify(
                    &format!("'{identity}' references missing export '{name}', skipped"),
                    Severity::Warning,
                );
                continue;
            };
            if let Err(err) = self.materialize(target_index) {
                self.sink.notify(
                    &format!("'{identity}' references '{name}' which failed to import: {err}"),
                    Severity::Warning,
                );
            }
        }
    }

    /// Materializes the state-machine export at `index` and rebuilds its
    /// graph, transitions, entry wiring, and layout from its payload.
    pub fn import_state_machine(&mut self, index: usize) -> Result<StateMachineImport, ImportError> {
        let identity = self.materialize(index)?;
        let object = self.objects.get(&identity).expect("just materialized");
        if object.class() != ObjectClass::StateMachineGraph {
            return Err(ImportError::WrongClass {
                index,
                expected: ObjectClass::StateMachineGraph,
                found: object.class().class_name().to_owned(),
            });
        }

        let record = self.table.resolve_by_index(index)?;
        let doc = record.properties().ok_or(ImportError::MalformedRecord {
            index,
            reason: MalformedReason::MissingProperties,
        })?;

        let builder = StateMachineBuilder::new(self.deserializer, self.sink);
        Ok(builder.build(doc))
    }
}

fn collect_subobject_names(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("ObjectName").and_then(Value::as_str) {
                if let Some(name) = subobject_export_name(reference) {
                    out.push(name.to_owned());
                }
            }
            for nested in map.values() {
                collect_subobject_names(nested, out);
            }
        }
        Value::Array(values) => {
            for nested in values {
                collect_subobject_names(nested, out);
            }
        }
        _ => {}
    }
}
