// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval query construction

/// Instruction prefix expected by the query embedding model
pub const RETRIEVAL_INSTRUCTION: &str = "Represent this for searching relevant passages: ";

/// Build the text that is embedded for retrieval
///
/// Report and question are interpolated verbatim, in that order, even when
/// either is empty.
pub fn build_retrieval_query(report: &str, question: &str) -> String {
    format!(
        "{}patient medical report says: \n{}. \n\n{}",
        RETRIEVAL_INSTRUCTION, report, question
    )
}
