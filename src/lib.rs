// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reanimate — snapshot-to-graph reconstruction for animation state machines.
//!
//! Takes the flat, index-addressed export table of a JSON asset snapshot and
//! rebuilds a live, typed state-machine graph plus a deterministic layout.

pub mod import;
pub mod layout;
pub mod model;
pub mod notify;
pub mod snapshot;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
