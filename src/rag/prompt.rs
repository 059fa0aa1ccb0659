// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt assembly for clinical report analysis

use crate::vector::Passage;

/// Rendered in place of findings when retrieval returned nothing
pub const NO_MATCHES: &str = "<nomatches>";

/// Render retrieved passages as numbered clinical findings
///
/// Each passage becomes `\nClinical Finding {n}: \n {text}` and entries are
/// joined with `". \n\n"`, matching how the indexed books were chunked.
pub fn format_clinical_findings(passages: &[Passage]) -> String {
    if passages.is_empty() {
        return NO_MATCHES.to_string();
    }

    passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("\nClinical Finding {}: \n {}", i + 1, p.text))
        .collect::<Vec<_>>()
        .join(". \n\n")
}

/// Assemble the final generation prompt
pub fn build_final_prompt(report: &str, question: &str, findings: &str) -> String {
    format!(
        "As a medical expert, analyze this patient's clinical report and user query. Integrate ONLY RELEVANT information from the provided clinical findings. Structure your response with:

**1. Key Findings** (2-3 bullet points of critical report insights)
**2. Recommendations** (Actionable steps if applicable)

Formatting rules:
- Use clear headings with **bold**
- 1-2 sentence bullets
- Omit obvious/normal findings
- Flag critical values with ❗
- Never include irrelevant clinical findings

Patient Report: {report}

User Query: {question}

Clinical Findings: {findings}

Response:"
    )
}
