use crate::{constants::USER_CONTENT_HEADER, types::ArticleInput};

/// Renders an article into the user message for the model.
///
/// Only non-empty fields are included, each as a `--- <label> ---` block, in
/// the order `ArtikelID`, `Titel`, `Subtitel`, `Teaser`, `Text`. Values are
/// passed through verbatim.
pub fn assemble_user_content(article: &ArticleInput) -> String {
    let mut parts = vec![USER_CONTENT_HEADER.to_string()];

    for (label, value) in article.fields() {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            parts.push(format!("--- {label} ---\n{value}"));
        }
    }

    parts.join("\n\n")
}
