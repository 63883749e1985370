// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use smol_str::SmolStr;

use crate::model::graph::PropertyBag;
use crate::model::ids::ExportName;

/// Dedup/ownership key of one exported object: its name plus the name of its
/// owning container, matching the snapshot's outer relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentity {
    outer: Option<ExportName>,
    name: ExportName,
}

impl ObjectIdentity {
    pub fn new(outer: Option<ExportName>, name: ExportName) -> Self {
        Self { outer, name }
    }

    pub fn outer(&self) -> Option<&ExportName> {
        self.outer.as_ref()
    }

    pub fn name(&self) -> &ExportName {
        &self.name
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(outer) = &self.outer {
            write!(f, "{outer}.{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// One entry of the snapshot's flat export array.
///
/// Field parsing is lenient on purpose: a malformed entry still occupies its
/// index slot (indices are positional and must stay stable), it only fails
/// later when something tries to materialize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    index: usize,
    name: Option<ExportName>,
    outer: Option<ExportName>,
    class_name: Option<SmolStr>,
    payload: Value,
}

impl ExportRecord {
    fn from_value(index: usize, raw: &Value) -> Self {
        let name = raw
            .get("Name")
            .and_then(Value::as_str)
            .and_then(|s| ExportName::new(s).ok());
        let outer = raw
            .get("Outer")
            .and_then(Value::as_str)
            .and_then(|s| ExportName::new(s).ok());
        let class_name = raw.get("Type").and_then(Value::as_str).map(SmolStr::new);

        Self {
            index,
            name,
            outer,
            class_name,
            payload: raw.clone(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&ExportName> {
        self.name.as_ref()
    }

    pub fn outer(&self) -> Option<&ExportName> {
        self.outer.as_ref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The record's `Properties` object, when present and object-shaped.
    pub fn properties(&self) -> Option<&PropertyBag> {
        self.payload.get("Properties").and_then(Value::as_object)
    }

    pub fn identity(&self) -> Option<ObjectIdentity> {
        let name = self.name.clone()?;
        Some(ObjectIdentity::new(self.outer.clone(), name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    OutOfRange { index: usize, len: usize },
    NotFound { outer: Option<String>, name: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "export index {index} out of range (table has {len} entries)")
            }
            Self::NotFound { outer: Some(outer), name } => {
                write!(f, "no export named '{name}' under outer '{outer}'")
            }
            Self::NotFound { outer: None, name } => {
                write!(f, "no export named '{name}'")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Immutable, order-preserving view of the snapshot's export array.
///
/// Built once per import call; every later stage resolves indices and names
/// against it and nothing ever re-sorts or re-indexes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    records: Vec<ExportRecord>,
    by_identity: BTreeMap<ObjectIdentity, usize>,
    by_name: BTreeMap<ExportName, usize>,
}

impl ExportTable {
    pub fn build(raw_exports: &[Value]) -> Self {
        let records = raw_exports
            .iter()
            .enumerate()
            .map(|(index, raw)| ExportRecord::from_value(index, raw))
            .collect::<Vec<_>>();

        let mut by_identity = BTreeMap::new();
        let mut by_name = BTreeMap::new();
        for record in &records {
            if let Some(identity) = record.identity() {
                by_identity.entry(identity).or_insert(record.index);
            }
            if let Some(name) = record.name() {
                by_name.entry(name.clone()).or_insert(record.index);
            }
        }

        Self { records, by_identity, by_name }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ExportRecord] {
        &self.records
    }

    pub fn resolve_by_index(&self, index: usize) -> Result<&ExportRecord, ResolveError> {
        self.records.get(index).ok_or(ResolveError::OutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn resolve_by_name(
        &self,
        outer: Option<&str>,
        name: &str,
    ) -> Result<&ExportRecord, ResolveError> {
        let not_found = || ResolveError::NotFound {
            outer: outer.map(ToOwned::to_owned),
            name: name.to_owned(),
        };

        let name = ExportName::new(name).map_err(|_| not_found())?;
        let outer = match outer {
            Some(outer) => Some(ExportName::new(outer).map_err(|_| not_found())?),
            None => None,
        };

        let identity = ObjectIdentity::new(outer, name);
        let index = self.by_identity.get(&identity).ok_or_else(not_found)?;
        Ok(&self.records[*index])
    }

    /// Name-only lookup, ignoring outers. First occurrence wins.
    pub fn find_by_name(&self, name: &str) -> Option<&ExportRecord> {
        let index = self.by_name.get(name)?;
        Some(&self.records[*index])
    }

    /// All records whose class name starts with `prefix`, in table order.
    pub fn exports_with_class_prefix(&self, prefix: &str) -> Vec<&ExportRecord> {
        self.records
            .iter()
            .filter(|record| {
                record
                    .class_name()
                    .is_some_and(|class| class.starts_with(prefix))
            })
            .collect()
    }

    /// All records owned by the named outer, in table order.
    pub fn exports_under_outer(&self, outer: &str) -> Vec<&ExportRecord> {
        self.records
            .iter()
            .filter(|record| record.outer().is_some_and(|o| o.as_str() == outer))
            .collect()
    }
}

/// Extracts the export name from a subobject reference like
/// `AnimStateNode'Idle'`. Returns `None` when the reference does not carry a
/// quoted name.
pub fn subobject_export_name(reference: &str) -> Option<&str> {
    let start = reference.find('\'')?;
    let end = reference.rfind('\'')?;
    if end <= start + 1 {
        return None;
    }
    Some(&reference[start + 1..end])
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{subobject_export_name, ExportTable, ResolveError};

    fn sample_exports() -> Vec<serde_json::Value> {
        vec![
            json!({
                "Type": "AnimationStateMachineGraph",
                "Name": "Locomotion",
                "Properties": { "InitialState": 0 }
            }),
            json!({
                "Type": "AnimStateNode",
                "Name": "Idle",
                "Outer": "Locomotion"
            }),
            json!({
                "Type": "AnimStateNode",
                "Name": "Walk",
                "Outer": "Locomotion"
            }),
            json!({ "Comment": "no name, no type" }),
        ]
    }

    #[test]
    fn build_preserves_input_order_and_indices() {
        let table = ExportTable::build(&sample_exports());
        assert_eq!(table.len(), 4);
        for (expected, record) in table.records().iter().enumerate() {
            assert_eq!(record.index(), expected);
        }
    }

    #[test]
    fn malformed_record_keeps_its_slot() {
        let table = ExportTable::build(&sample_exports());
        let record = table.resolve_by_index(3).expect("slot exists");
        assert_eq!(record.name(), None);
        assert_eq!(record.class_name(), None);
        assert_eq!(record.identity(), None);
    }

    #[test]
    fn resolve_by_index_rejects_out_of_range() {
        let table = ExportTable::build(&sample_exports());
        let err = table.resolve_by_index(4).unwrap_err();
        assert_eq!(err, ResolveError::OutOfRange { index: 4, len: 4 });
    }

    #[test]
    fn resolve_by_name_uses_the_outer() {
        let table = ExportTable::build(&sample_exports());

        let idle = table
            .resolve_by_name(Some("Locomotion"), "Idle")
            .expect("resolves");
        assert_eq!(idle.index(), 1);

        let err = table.resolve_by_name(None, "Idle").unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFound {
                outer: None,
                name: "Idle".to_owned()
            }
        );
    }

    #[test]
    fn find_by_name_ignores_outers() {
        let table = ExportTable::build(&sample_exports());
        let walk = table.find_by_name("Walk").expect("found");
        assert_eq!(walk.index(), 2);
        assert!(table.find_by_name("Run").is_none());
    }

    #[test]
    fn class_prefix_and_outer_filters_keep_table_order() {
        let table = ExportTable::build(&sample_exports());

        let states = table.exports_with_class_prefix("AnimState");
        assert_eq!(
            states.iter().map(|r| r.index()).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let owned = table.exports_under_outer("Locomotion");
        assert_eq!(
            owned.iter().map(|r| r.index()).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[rstest]
    #[case("AnimStateNode'Idle'", Some("Idle"))]
    #[case("AnimationStateGraph'Walk_1'", Some("Walk_1"))]
    #[case("NoQuotesHere", None)]
    #[case("Dangling'", None)]
    #[case("''", None)]
    fn subobject_names_are_read_between_quotes(
        #[case] reference: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(subobject_export_name(reference), expected);
    }
}
