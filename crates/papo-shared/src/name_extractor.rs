//! Display-name extraction from onboarding transcripts.
//!
//! People introduce themselves with a handful of stock phrases ("meu nome é
//! Ana", "me chamo Ana"). The first phrase found wins; without one we assume
//! the transcript starts with the name.

/// Introduction phrases, in priority order
pub const INTRO_PHRASES: &[&str] = &[
    "meu nome é",
    "me chamo",
    "sou",
    "me chame de",
    "pode me chamar de",
];

/// Name used when nothing usable was said
pub const FALLBACK_NAME: &str = "Novo Usuário";

/// Tokens kept after an introduction phrase
const MAX_INTRO_TOKENS: usize = 3;

/// Tokens kept when no introduction phrase was found
const MAX_LEADING_TOKENS: usize = 2;

/// Extract a title-cased display name from `transcript`. Never fails.
pub fn extract(transcript: &str) -> String {
    let lower = transcript.to_lowercase();

    let mut tokens: Vec<&str> = Vec::new();
    for phrase in INTRO_PHRASES {
        if let Some(pos) = lower.find(phrase) {
            tokens = lower[pos + phrase.len()..]
                .split_whitespace()
                .take(MAX_INTRO_TOKENS)
                .collect();
            break;
        }
    }

    // A phrase with nothing after it counts as no phrase.
    if tokens.is_empty() {
        tokens = transcript.split_whitespace().take(MAX_LEADING_TOKENS).collect();
    }

    let name = tokens.join(" ");
    if name.chars().count() < 2 {
        return title_case(FALLBACK_NAME);
    }
    title_case(&name)
}

/// Upper-case the first letter of every whitespace token, lower-case the rest
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meu_nome_e() {
        assert_eq!(extract("meu nome é Maria Clara Souza"), "Maria Clara Souza");
    }

    #[test]
    fn test_intro_keeps_three_tokens() {
        assert_eq!(extract("Olá, me chamo joão pedro da silva"), "João Pedro Da");
    }

    #[test]
    fn test_no_phrase_uses_first_two_tokens() {
        assert_eq!(extract("Pedro gosta de futebol"), "Pedro Gosta");
    }

    #[test]
    fn test_phrase_order_wins_over_position() {
        // "me chamo" is listed before "sou" even though "sou" appears first
        assert_eq!(extract("eu sou a Ana, me chamo Ana Lúcia"), "Ana Lúcia");
    }

    #[test]
    fn test_uppercase_phrase_matches() {
        assert_eq!(extract("MEU NOME É CARLOS"), "Carlos");
    }

    #[test]
    fn test_pode_me_chamar_de() {
        // "me chame de" does not match, "sou" does not appear: the last phrase wins
        assert_eq!(extract("pode me chamar de Zé"), "Zé");
    }

    #[test]
    fn test_phrase_at_end_falls_back() {
        assert_eq!(extract("quem eu sou"), "Quem Eu");
    }

    #[test]
    fn test_empty_and_short_inputs() {
        assert_eq!(extract(""), FALLBACK_NAME);
        assert_eq!(extract("   "), FALLBACK_NAME);
        assert_eq!(extract("a"), FALLBACK_NAME);
        assert_eq!(extract("me chamo x"), FALLBACK_NAME);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ÉRICA  dos santos"), "Érica Dos Santos");
        assert_eq!(title_case("novo usuário"), "Novo Usuário");
    }

    #[test]
    fn test_deterministic() {
        let input = "me chame de Bia";
        assert_eq!(extract(input), extract(input));
    }
}
