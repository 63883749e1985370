// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout for reconstructed graphs.
//!
//! This module computes deterministic node positions for visualization; it
//! reads graph topology and owns nothing.

pub mod state_machine;

pub use state_machine::{
    layout_state_machine, Point, StateMachineLayout, HORIZONTAL_SPACING, VERTICAL_SPACING,
};
