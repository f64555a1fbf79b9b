//! # Output Validation
//!
//! The model is asked for a JSON object, but only the syntax is guaranteed by
//! the provider. This module checks the raw completion against the output
//! contract and produces the score batch for telemetry together with a
//! verdict.
//!
//! Checks, in order:
//! 1. `is_json`: the completion is a JSON object. On failure nothing else runs.
//! 2. `is_valid_userneed`: `userneeds` is one of [`VALID_USERNEEDS`].
//! 3. `is_valid_audience`: `audiences` is a non-empty list drawn from [`VALID_AUDIENCES`].
//!
//! A JSON object that does not convert into [`ArticleOutput`] adds a failing
//! `matches_schema` score and is rejected. Failing enum checks are scored and
//! logged, and reject only when the validator is strict.

use crate::{
    constants::{
        REASON_AUDIENCES_NOT_A_LIST, REASON_INVALID_AUDIENCES, REASON_INVALID_USERNEED,
        REASON_NOT_AN_OBJECT, REASON_NOT_JSON, REASON_NO_AUDIENCES, REASON_SCHEMA_MISMATCH,
        SCORE_IS_JSON, SCORE_MATCHES_SCHEMA, SCORE_VALID_AUDIENCE, SCORE_VALID_USERNEED,
        VALID_AUDIENCES, VALID_USERNEEDS,
    },
    telemetry::ScoreEntry,
    types::ArticleOutput,
};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// Keys under which a model may echo the article identifier.
const ECHOED_ID_KEYS: [&str; 2] = ["artikel_id", "ArtikelID"];

/// The outcome of validating one completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(ArticleOutput),
    Rejected(Rejection),
}

/// Why a completion was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The completion is not a JSON object.
    Syntax(String),
    /// The object does not fit [`ArticleOutput`].
    Schema(String),
    /// A `userneeds` or `audiences` check failed under strict validation.
    Domain(String),
}

impl Rejection {
    pub fn reason(&self) -> &str {
        match self {
            Rejection::Syntax(reason) | Rejection::Schema(reason) | Rejection::Domain(reason) => {
                reason
            }
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// The complete result of [`OutputValidator::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Every score recorded for the completion, in check order.
    pub scores: Vec<ScoreEntry>,
    pub verdict: Verdict,
}

impl ValidationReport {
    pub fn score(&self, name: &str) -> Option<&ScoreEntry> {
        self.scores.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputValidator {
    strict_enums: bool,
}

impl OutputValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `strict` is set, a failing `userneeds` or `audiences` check
    /// rejects the completion instead of only being scored.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_enums = strict;
        self
    }

    pub fn validate(&self, raw: &str) -> ValidationReport {
        let mut object = match parse_object(raw) {
            Ok(object) => object,
            Err(reason) => {
                return ValidationReport {
                    scores: vec![ScoreEntry::fail(SCORE_IS_JSON, reason.clone())],
                    verdict: Verdict::Rejected(Rejection::Syntax(reason)),
                };
            }
        };

        let mut scores = vec![
            ScoreEntry::pass(SCORE_IS_JSON),
            score_userneed(object.get("userneeds")),
            score_audiences(object.get("audiences")),
        ];
        let domain_failures: Vec<String> = scores
            .iter()
            .filter(|s| !s.passed())
            .filter_map(|s| s.reason.clone())
            .collect();

        for key in ECHOED_ID_KEYS {
            object.remove(key);
        }
        let converted = serde_json::from_value::<ArticleOutput>(Value::Object(object))
            .map_err(|e| format!("{REASON_SCHEMA_MISMATCH} {e}"));
        if let Err(reason) = &converted {
            scores.push(ScoreEntry::fail(SCORE_MATCHES_SCHEMA, reason.clone()));
        }

        for score in scores.iter().filter(|s| !s.passed()) {
            warn!(
                score = %score.name,
                reason = score.reason.as_deref().unwrap_or(""),
                "Model output failed a check."
            );
        }

        let verdict = match converted {
            Err(reason) => Verdict::Rejected(Rejection::Schema(reason)),
            Ok(_) if self.strict_enums && !domain_failures.is_empty() => {
                Verdict::Rejected(Rejection::Domain(domain_failures.join(" ")))
            }
            Ok(output) => Verdict::Accepted(output),
        };

        ValidationReport { scores, verdict }
    }
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(format!("{REASON_NOT_AN_OBJECT} {}.", kind_of(&other))),
        Err(e) => Err(format!("{REASON_NOT_JSON} {e}")),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "ein Wahrheitswert",
        Value::Number(_) => "eine Zahl",
        Value::String(_) => "ein String",
        Value::Array(_) => "eine Liste",
        Value::Object(_) => "ein Objekt",
    }
}

fn score_userneed(value: Option<&Value>) -> ScoreEntry {
    let value = value.unwrap_or(&Value::Null);
    match value.as_str() {
        Some(userneed) if VALID_USERNEEDS.contains(&userneed) => {
            ScoreEntry::pass(SCORE_VALID_USERNEED)
        }
        _ => ScoreEntry::fail(
            SCORE_VALID_USERNEED,
            format!("{REASON_INVALID_USERNEED} {value}. Erwartet wurde einer aus {VALID_USERNEEDS:?}."),
        ),
    }
}

fn score_audiences(value: Option<&Value>) -> ScoreEntry {
    let audiences = match value {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            return ScoreEntry::fail(
                SCORE_VALID_AUDIENCE,
                format!("{REASON_AUDIENCES_NOT_A_LIST} {other}"),
            )
        }
    };

    if audiences.is_empty() {
        return ScoreEntry::fail(SCORE_VALID_AUDIENCE, REASON_NO_AUDIENCES);
    }

    let invalid: Vec<&Value> = audiences
        .iter()
        .filter(|a| !a.as_str().is_some_and(|a| VALID_AUDIENCES.contains(&a)))
        .collect();

    if invalid.is_empty() {
        ScoreEntry::pass(SCORE_VALID_AUDIENCE)
    } else {
        let listed = invalid
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ScoreEntry::fail(
            SCORE_VALID_AUDIENCE,
            format!("{REASON_INVALID_AUDIENCES} [{listed}]"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(raw: &str) -> ValidationReport {
        OutputValidator::new().validate(raw)
    }

    #[test]
    fn invalid_json_records_a_single_failing_score() {
        let report = validate("not json");

        assert_eq!(report.scores.len(), 1);
        assert_eq!(report.scores[0].name, SCORE_IS_JSON);
        assert_eq!(report.scores[0].value, 0.0);
        assert!(report.scores[0].reason.is_some());
        assert!(matches!(report.verdict, Verdict::Rejected(Rejection::Syntax(_))));
    }

    #[test]
    fn json_that_is_not_an_object_is_rejected() {
        for raw in ["[]", "\"text\"", "42", "null"] {
            let report = validate(raw);
            assert_eq!(report.scores.len(), 1, "raw: {raw}");
            assert_eq!(report.scores[0].value, 0.0);
            assert!(matches!(report.verdict, Verdict::Rejected(Rejection::Syntax(_))));
        }
    }

    #[test]
    fn valid_output_passes_all_checks() {
        let raw = json!({
            "personen": ["Anna Beispiel"],
            "userneeds": "Einordnen",
            "audiences": ["Foodies", "Sportfans"],
            "iab_content_taxonomy": "Sports"
        })
        .to_string();
        let report = validate(&raw);

        assert_eq!(report.scores.len(), 3);
        assert!(report.scores.iter().all(ScoreEntry::passed));
        match report.verdict {
            Verdict::Accepted(output) => {
                assert_eq!(output.personen, vec!["Anna Beispiel"]);
                assert_eq!(output.audiences, vec!["Foodies", "Sportfans"]);
            }
            Verdict::Rejected(rejection) => panic!("unexpected rejection: {rejection}"),
        }
    }

    #[test]
    fn userneed_outside_allow_list_names_the_value() {
        let cases = [
            (json!({"userneeds": "Informieren ", "audiences": ["Foodies"]}), "\"Informieren \""),
            (json!({"userneeds": "", "audiences": ["Foodies"]}), "\"\""),
            (json!({"userneeds": null, "audiences": ["Foodies"]}), "null"),
            (json!({"userneeds": "informieren", "audiences": ["Foodies"]}), "\"informieren\""),
        ];

        for (output, expected) in cases {
            let report = validate(&output.to_string());
            let score = report.score(SCORE_VALID_USERNEED).unwrap();
            assert_eq!(score.value, 0.0);
            let reason = score.reason.as_deref().unwrap();
            assert!(
                reason.contains(&format!("{REASON_INVALID_USERNEED} {expected}.")),
                "reason '{reason}' does not name {expected}"
            );
            // Soft policy: the response is still accepted.
            assert!(matches!(report.verdict, Verdict::Accepted(_)));
        }
    }

    #[test]
    fn missing_userneed_is_reported_as_null() {
        let report = validate(&json!({"audiences": ["Foodies"]}).to_string());
        let score = report.score(SCORE_VALID_USERNEED).unwrap();
        assert_eq!(score.value, 0.0);
        assert!(score.reason.as_deref().unwrap().contains("null"));
    }

    #[test]
    fn empty_audiences_are_reported() {
        for output in [
            json!({"userneeds": "Informieren", "audiences": []}),
            json!({"userneeds": "Informieren"}),
            json!({"userneeds": "Informieren", "audiences": null}),
        ] {
            let report = validate(&output.to_string());
            let score = report.score(SCORE_VALID_AUDIENCE).unwrap();
            assert_eq!(score.value, 0.0);
            assert_eq!(score.reason.as_deref(), Some(REASON_NO_AUDIENCES));
        }
    }

    #[test]
    fn invalid_audiences_are_enumerated_exactly() {
        let raw = json!({
            "userneeds": "Informieren",
            "audiences": ["Foodies", "Astronauten", "Sportfans"]
        })
        .to_string();
        let report = validate(&raw);
        let score = report.score(SCORE_VALID_AUDIENCE).unwrap();

        assert_eq!(score.value, 0.0);
        assert_eq!(
            score.reason.as_deref(),
            Some(format!("{REASON_INVALID_AUDIENCES} [\"Astronauten\"]").as_str())
        );
    }

    #[test]
    fn audiences_that_are_not_a_list_fail() {
        let raw = json!({"userneeds": "Informieren", "audiences": "Foodies"}).to_string();
        let report = validate(&raw);
        let score = report.score(SCORE_VALID_AUDIENCE).unwrap();
        assert_eq!(score.value, 0.0);
        assert_eq!(
            score.reason.as_deref(),
            Some(format!("{REASON_AUDIENCES_NOT_A_LIST} \"Foodies\"").as_str())
        );
        // The schema expects a list, so the typed conversion rejects it too.
        assert_eq!(report.score(SCORE_MATCHES_SCHEMA).unwrap().value, 0.0);
        assert!(matches!(report.verdict, Verdict::Rejected(Rejection::Schema(_))));
    }

    #[test]
    fn strict_validator_rejects_enum_failures() {
        let raw = json!({"userneeds": "Unbekannt", "audiences": ["Foodies"]}).to_string();
        let report = OutputValidator::new().strict(true).validate(&raw);

        assert_eq!(report.scores.len(), 3);
        match report.verdict {
            Verdict::Rejected(Rejection::Domain(reason)) => assert!(reason.contains("Unbekannt")),
            Verdict::Rejected(other) => panic!("unexpected rejection cause: {other:?}"),
            Verdict::Accepted(_) => panic!("strict validator accepted an invalid userneed"),
        }
    }

    #[test]
    fn schema_mismatch_is_scored_and_rejected() {
        let raw = json!({
            "personen": "Max",
            "userneeds": "Informieren",
            "audiences": ["Foodies"]
        })
        .to_string();
        let report = validate(&raw);

        let names: Vec<&str> = report.scores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![SCORE_IS_JSON, SCORE_VALID_USERNEED, SCORE_VALID_AUDIENCE, SCORE_MATCHES_SCHEMA]
        );
        let schema = report.score(SCORE_MATCHES_SCHEMA).unwrap();
        assert_eq!(schema.value, 0.0);
        assert!(schema
            .reason
            .as_deref()
            .unwrap()
            .starts_with(REASON_SCHEMA_MISMATCH));
        assert!(matches!(report.verdict, Verdict::Rejected(Rejection::Schema(_))));
    }

    #[test]
    fn echoed_identifier_is_stripped() {
        let raw = json!({
            "artikel_id": "model-id",
            "ArtikelID": 99,
            "userneeds": "Informieren",
            "audiences": ["Foodies"]
        })
        .to_string();
        match validate(&raw).verdict {
            Verdict::Accepted(output) => assert_eq!(output.artikel_id, ""),
            Verdict::Rejected(rejection) => panic!("unexpected rejection: {rejection}"),
        }
    }
}
