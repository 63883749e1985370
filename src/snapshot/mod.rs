// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The snapshot's export table and reference resolution.
//!
//! An [`ExportTable`] is built once per import from the raw export array and
//! is the only place where index-to-record and name-to-record lookup happens.

pub mod export_table;

pub use export_table::{
    subobject_export_name, ExportRecord, ExportTable, ObjectIdentity, ResolveError,
};
