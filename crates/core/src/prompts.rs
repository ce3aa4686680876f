//! Prompt templates for the analysis passes.
//!
//! Prompts are German, matching the suggestion markers in [`crate::response`].

use crate::response::SUGGESTION_MARKERS;

/// Qualitative critique of length, readability and keyphrase usage.
///
/// Numeric ratings are explicitly excluded so the critique stays decoupled
/// from the scoring passes.
pub fn critique(sample: &str, keyphrase: &str) -> String {
    format!(
        "Bitte analysieren Sie den folgenden Text hinsichtlich seiner Länge und Lesbarkeit. \
         Beurteilen Sie, ob die Textlänge angemessen ist oder ob der Text zu kurz oder zu lang erscheint. \
         Beurteilen Sie außerdem, wie flüssig sich der Text lesen lässt. Berücksichtigen Sie dabei Aspekte wie \
         Satzstruktur, Klarheit der Argumentation und die Verwendung von Fachsprache oder Jargon. \
         Geben Sie auch an, wie oft die Keyphrase \"{keyphrase}\" im Text vorhanden ist und machen Sie Vorschläge \
         zur Verbesserung der Suchmaschinenoptimierung (SEO), ohne explizite numerische Bewertungen zu verwenden. \
         Leiten Sie Ihre Vorschläge mit \"{marker}\" ein: {sample}",
        marker = SUGGESTION_MARKERS[0],
    )
}

/// Single 1–10 readability rating.
pub fn readability(sample: &str) -> String {
    format!(
        "Bitte bewerten Sie die allgemeine Lesbarkeit des folgenden Textes auf einer Skala von 1 bis 10, \
         wobei 1 sehr schlecht und 10 ausgezeichnet bedeutet. Geben Sie nur eine Zahl als Antwort zurück, \
         ohne jegliche zusätzliche Erklärung: {sample}"
    )
}

/// Single 1–10 SEO rating judged against the keyphrase.
pub fn seo(sample: &str, keyphrase: &str) -> String {
    format!(
        "Bitte bewerten Sie die SEO-Optimierung des folgenden Textes auf einer Skala von 1 bis 10, \
         wobei 1 sehr schlecht und 10 ausgezeichnet bedeutet, basierend auf der Verwendung der Keyphrase \
         \"{keyphrase}\". Geben Sie nur eine Zahl als Antwort zurück, ohne jegliche zusätzliche Erklärung: {sample}"
    )
}

/// Single 1–10 sentiment rating.
pub fn sentiment(sample: &str) -> String {
    format!(
        "Bewerte das Sentiment des Textes auf einer Skala von 1 bis 10, wobei 1 sehr schlecht und 10 \
         ausgezeichnet bedeutet. Gib nur eine Zahl als Antwort zurück, ohne jegliche zusätzliche Erklärung \
         oder Kommentare: \"{sample}\"."
    )
}
