//! Sentence splitting and tokenization of documentation text

/// Splits text into sentences at periods followed by whitespace or the end of text
///
/// Periods inside tokens (`this.size`, `1.5`) do not end a sentence. Sentences
/// without any word character are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let ends_sentence = matches!(c, '.' | '?' | '!')
            && chars.peek().is_none_or(|next| next.is_whitespace());
        if ends_sentence {
            push_sentence(&mut sentences, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if trimmed.chars().any(|c| c.is_alphanumeric()) {
        sentences.push(trimmed.to_string());
    }
}

const LEADING_PUNCT: &[char] = &['(', '[', '"', '\'', '`', '{'];
const TRAILING_PUNCT: &[char] = &[')', ']', '"', '\'', '`', '}', ':', '?'];

/// Splits one sentence into tokens
///
/// Commas and semicolons become `,` tokens, negated contractions are split
/// (`isn't` -> `is n't`, `cannot` -> `can not`), possessives are split
/// (`map's` -> `map 's`) and inline-tag markers (`{@code`, `{@link`) are dropped.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for chunk in sentence.split_whitespace() {
        if chunk.starts_with("{@") {
            continue;
        }

        let mut word = chunk.trim_start_matches(LEADING_PUNCT);
        let mut trailing_commas = 0;
        loop {
            if let Some(rest) = word.strip_suffix([',', ';']) {
                trailing_commas += 1;
                word = rest;
            } else if let Some(rest) = word.strip_suffix(TRAILING_PUNCT) {
                word = rest;
            } else {
                break;
            }
        }

        push_word(&mut tokens, word);
        tokens.extend(std::iter::repeat_n(",".to_string(), trailing_commas.min(1)));
    }
    tokens
}

fn push_word(tokens: &mut Vec<String>, word: &str) {
    if word.is_empty() {
        return;
    }
    let lower = word.to_lowercase();
    match lower.as_str() {
        "cannot" => {
            tokens.push(word[..3].to_string());
            tokens.push("not".to_string());
        }
        "can't" => {
            tokens.push(word[..2].to_string() + "n");
            tokens.push("n't".to_string());
        }
        "won't" => {
            tokens.push("will".to_string());
            tokens.push("n't".to_string());
        }
        "must'nt" => {
            tokens.push(word[..4].to_string());
            tokens.push("n't".to_string());
        }
        _ if lower.ends_with("n't") && word.len() > 3 => {
            tokens.push(word[..word.len() - 3].to_string());
            tokens.push("n't".to_string());
        }
        _ if lower.ends_with("'s") && word.len() > 2 => {
            tokens.push(word[..word.len() - 2].to_string());
            tokens.push("'s".to_string());
        }
        _ => tokens.push(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences(". x is not null. this.size is 1.5 or more."),
            vec!["x is not null", "this.size is 1.5 or more"]
        );
        assert_eq!(split_sentences("x is null"), vec!["x is null"]);
        assert!(split_sentences("  .  ").is_empty());
    }

    #[test]
    fn test_tokenize_contractions_and_punctuation() {
        assert_eq!(
            tokenize("the map's size isn't zero, (or it cannot be)"),
            vec![
                "the", "map", "'s", "size", "is", "n't", "zero", ",", "or", "it", "can", "not",
                "be"
            ]
        );
    }

    #[test]
    fn test_tokenize_drops_inline_tag_markers() {
        assert_eq!(
            tokenize("if {@code key} is null"),
            vec!["if", "key", "is", "null"]
        );
    }
}
