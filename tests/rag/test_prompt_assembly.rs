// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Query and prompt assembly through the public rag API

use medichat_rag_node::{
    rag::{build_final_prompt, build_retrieval_query, format_clinical_findings, NO_MATCHES},
    vector::Passage,
};

fn passages() -> Vec<Passage> {
    vec![
        Passage {
            id: "harrison-1182".to_string(),
            score: 0.88,
            text: "Random plasma glucose of 200 mg/dL or higher with symptoms is diagnostic"
                .to_string(),
        },
        Passage {
            id: "harrison-1183".to_string(),
            score: 0.84,
            text: "HbA1c of 6.5% or higher confirms diabetes".to_string(),
        },
    ]
}

#[test]
fn test_glucose_scenario_prompt() {
    let report = "Glucose: 180 mg/dL";
    let question = "What does my elevated glucose mean?";

    let query = build_retrieval_query(report, question);
    assert_eq!(
        query,
        "Represent this for searching relevant passages: patient medical report says: \nGlucose: 180 mg/dL. \n\nWhat does my elevated glucose mean?"
    );

    let findings = format_clinical_findings(&passages());
    let prompt = build_final_prompt(report, question, &findings);

    let report_at = prompt.find("Patient Report: Glucose: 180 mg/dL").unwrap();
    let query_at = prompt.find("User Query: What does my elevated glucose mean?").unwrap();
    let findings_at = prompt.find("Clinical Findings: \nClinical Finding 1: \n Random plasma glucose").unwrap();
    let response_at = prompt.rfind("Response:").unwrap();

    assert!(report_at < query_at);
    assert!(query_at < findings_at);
    assert!(findings_at < response_at);
    assert!(prompt.contains("is diagnostic. \n\n\nClinical Finding 2: \n HbA1c of 6.5%"));
}

#[test]
fn test_empty_inputs_still_render_sections() {
    let query = build_retrieval_query("", "");
    assert!(query.ends_with("says: \n. \n\n"));

    let prompt = build_final_prompt("", "", &format_clinical_findings(&[]));
    assert!(prompt.contains("Patient Report: \n"));
    assert!(prompt.contains("User Query: \n"));
    assert!(prompt.contains(&format!("Clinical Findings: {}\n", NO_MATCHES)));
}
