//! Closed value sets the model output is scored against.

/// Permitted values for the `userneeds` field.
pub const VALID_USERNEEDS: &[&str] = &[
    "Informieren",
    "Einordnen",
    "Beteiligen",
    "Unterhalten",
    "Hilfe geben",
    "Erklären",
    "Inspirieren",
    "Vernetzen",
];

/// Permitted values for entries of the `audiences` list.
pub const VALID_AUDIENCES: &[&str] = &[
    "Foodies",
    "Gesundheitsbewusste",
    "Kunden und Arbeitnehmer",
    "Mieter und Hausbesitzer",
    "Verkehrsteilnehmende",
    "Junge Familien",
    "Freizeitjunkies",
    "Naturliebende",
    "Sportfans",
    "Sporttreibende",
    "Voyeuristen",
    "Nostalgiker",
    "Keine weitere",
];

/// Header line that opens every user message sent to the model.
pub const USER_CONTENT_HEADER: &str = "Hier sind die zu verarbeitenden Artikel-Daten:";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

// Score names reported to the telemetry collector.
pub const SCORE_IS_JSON: &str = "is_json";
pub const SCORE_VALID_USERNEED: &str = "is_valid_userneed";
pub const SCORE_VALID_AUDIENCE: &str = "is_valid_audience";
pub const SCORE_MATCHES_SCHEMA: &str = "matches_schema";

// Reasons attached to failing scores. Variable parts follow the prefix.
pub const REASON_NOT_JSON: &str = "Die Antwort ist kein valides JSON:";
pub const REASON_NOT_AN_OBJECT: &str = "Die Antwort ist kein JSON-Objekt, sondern";
pub const REASON_INVALID_USERNEED: &str = "Ungültiger Wert:";
pub const REASON_NO_AUDIENCES: &str = "Keine Audiences extrahiert.";
pub const REASON_AUDIENCES_NOT_A_LIST: &str = "Audiences sind keine Liste:";
pub const REASON_INVALID_AUDIENCES: &str = "Ungültige Werte gefunden:";
pub const REASON_SCHEMA_MISMATCH: &str = "Antwort entspricht nicht dem Schema:";
