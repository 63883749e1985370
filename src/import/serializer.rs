// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::graph::PropertyBag;

/// Keys consumed by topology reconstruction. They describe wiring, not leaf
/// state, so the default deserializer never copies them into a property bag.
pub const RESERVED_KEYS: &[&str] = &[
    "Name",
    "Outer",
    "Type",
    "Properties",
    "States",
    "Transitions",
    "InitialState",
    "StateName",
    "PreviousState",
    "NextState",
    "bDesiredTransitionReturnValue",
    "TransitionIndex",
    "bAutomaticRemainingTimeRule",
];

/// External leaf-property deserialization capability.
///
/// Populates native fields on a target from a structured document. Must be
/// tolerant of unknown and missing fields; this crate treats it as a black
/// box and never inspects what it wrote.
pub trait PropertyDeserializer {
    fn deserialize_into(&self, doc: &PropertyBag, target: &mut PropertyBag);
}

/// Default tolerant implementation: copies every non-reserved field into the
/// target, overwriting earlier values on key collision.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPropertyDeserializer;

impl JsonPropertyDeserializer {
    pub fn new() -> Self {
        Self
    }
}

impl PropertyDeserializer for JsonPropertyDeserializer {
    fn deserialize_into(&self, doc: &PropertyBag, target: &mut PropertyBag) {
        for (key, value) in doc {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{JsonPropertyDeserializer, PropertyDeserializer};
    use crate::model::graph::PropertyBag;

    fn bag(value: serde_json::Value) -> PropertyBag {
        value.as_object().expect("object fixture").clone()
    }

    #[test]
    fn copies_unknown_fields_and_skips_reserved_ones() {
        let doc = bag(json!({
            "TransitionIndex": 2,
            "bAutomaticRemainingTimeRule": true,
            "CrossfadeDuration": 0.25,
            "BlendMode": "Cubic"
        }));
        let mut target = PropertyBag::new();

        JsonPropertyDeserializer::new().deserialize_into(&doc, &mut target);

        assert_eq!(target.get("CrossfadeDuration"), Some(&json!(0.25)));
        assert_eq!(target.get("BlendMode"), Some(&json!("Cubic")));
        assert!(!target.contains_key("TransitionIndex"));
        assert!(!target.contains_key("bAutomaticRemainingTimeRule"));
    }

    #[test]
    fn later_documents_overwrite_earlier_values() {
        let mut target = PropertyBag::new();
        let deserializer = JsonPropertyDeserializer::new();

        deserializer.deserialize_into(&bag(json!({ "BlendMode": "Linear" })), &mut target);
        deserializer.deserialize_into(&bag(json!({ "BlendMode": "Cubic" })), &mut target);

        assert_eq!(target.get("BlendMode"), Some(&json!("Cubic")));
    }
}
