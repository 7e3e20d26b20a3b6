use tagger_types::SENTENCE_FINAL_PUNCT;

use crate::model::SentenceSplitter;

const LEADING_PUNCT: &[char] = &['"', '\'', '(', '[', '{', '`', '“', '‘', '「', '『', '（', '《'];
const TRAILING_PUNCT: &[char] = &[
    '"', '\'', ')', ']', '}', ',', ';', ':', '.', '?', '!', '”', '’', '」', '』', '）', '》',
    '，', '、', '；', '：', '。', '？', '！',
];
/// Full-width punctuation that stands on its own even inside a chunk.
const CJK_PUNCT: &[char] = &[
    '，', '、', '；', '：', '。', '？', '！', '“', '”', '「', '」', '『', '』', '（', '）', '《', '》',
];
const CONTRACTIONS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Whitespace tokenizer with punctuation peeling and sentence-final splitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSplitter;

impl RuleSplitter {
    pub fn new() -> Self {
        Self
    }

    /// Tokens of `line` in order, before sentence splitting.
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for chunk in line.split_whitespace() {
            for piece in split_cjk(chunk) {
                peel(piece, &mut tokens);
            }
        }
        tokens.into_iter().map(escape_bracket).collect()
    }
}

impl SentenceSplitter for RuleSplitter {
    fn split(&self, line: &str) -> Vec<Vec<String>> {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        for token in self.tokenize(line) {
            let ends = SENTENCE_FINAL_PUNCT.contains(&token.as_str());
            current.push(token);
            if ends {
                sentences.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            sentences.push(current);
        }
        sentences
    }
}

/// Break a chunk around full-width punctuation so `你好。再见` yields three pieces.
fn split_cjk(chunk: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, ch) in chunk.char_indices() {
        if CJK_PUNCT.contains(&ch) {
            if start < pos {
                pieces.push(&chunk[start..pos]);
            }
            let end = pos + ch.len_utf8();
            pieces.push(&chunk[pos..end]);
            start = end;
        }
    }
    if start < chunk.len() {
        pieces.push(&chunk[start..]);
    }
    pieces
}

fn peel(chunk: &str, tokens: &mut Vec<String>) {
    let mut word = chunk;
    while let Some(ch) = word.chars().next() {
        if word.len() == ch.len_utf8() || !LEADING_PUNCT.contains(&ch) {
            break;
        }
        tokens.push(ch.to_string());
        word = &word[ch.len_utf8()..];
    }

    let mut trailing = Vec::new();
    if word.ends_with("...") && word.len() > 3 {
        trailing.push("...".to_string());
        word = &word[..word.len() - 3];
    }
    while let Some(ch) = word.chars().next_back() {
        if word.len() == ch.len_utf8() || !TRAILING_PUNCT.contains(&ch) {
            break;
        }
        // Abbreviations such as "U.S." keep their final period.
        if ch == '.' && word[..word.len() - 1].contains('.') {
            break;
        }
        trailing.push(ch.to_string());
        word = &word[..word.len() - ch.len_utf8()];
    }

    match contraction_split(word) {
        Some((head, tail)) => {
            tokens.push(head.to_string());
            tokens.push(tail.to_string());
        }
        None => tokens.push(word.to_string()),
    }
    tokens.extend(trailing.into_iter().rev());
}

fn contraction_split(word: &str) -> Option<(&str, &str)> {
    let lower = word.to_lowercase();
    CONTRACTIONS.iter().find_map(|suffix| {
        if lower.len() > suffix.len() && lower.ends_with(suffix) && lower.len() == word.len() {
            let at = word.len() - suffix.len();
            word.is_char_boundary(at).then(|| word.split_at(at))
        } else {
            None
        }
    })
}

fn escape_bracket(token: String) -> String {
    match token.as_str() {
        "(" => "-LRB-".to_string(),
        ")" => "-RRB-".to_string(),
        "[" => "-LSB-".to_string(),
        "]" => "-RSB-".to_string(),
        "{" => "-LCB-".to_string(),
        "}" => "-RCB-".to_string(),
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<Vec<String>> {
        RuleSplitter::new().split(line)
    }

    #[test]
    fn splits_on_sentence_final_punctuation() {
        assert_eq!(
            split("Go now. Stop."),
            vec![vec!["Go", "now", "."], vec!["Stop", "."]]
        );
        assert_eq!(split("Hello world"), vec![vec!["Hello", "world"]]);
    }

    #[test]
    fn blank_line_has_no_sentences() {
        assert!(split("").is_empty());
        assert!(split("   \t ").is_empty());
    }

    #[test]
    fn peels_quotes_and_commas() {
        let tokens = RuleSplitter::new().tokenize("\"Well, it's (mostly) fine!\"");
        assert_eq!(
            tokens,
            ["\"", "Well", ",", "it", "'s", "-LRB-", "mostly", "-RRB-", "fine", "!", "\""]
        );
    }

    #[test]
    fn keeps_abbreviations_and_ellipses() {
        let tokens = RuleSplitter::new().tokenize("the U.S. economy... wait");
        assert_eq!(tokens, ["the", "U.S.", "economy", "...", "wait"]);
    }

    #[test]
    fn splits_negative_contractions() {
        let tokens = RuleSplitter::new().tokenize("They don't know");
        assert_eq!(tokens, ["They", "do", "n't", "know"]);
    }

    #[test]
    fn splits_chinese_punctuation_inside_chunks() {
        assert_eq!(
            split("你好，世界。再见！"),
            vec![vec!["你好", "，", "世界", "。"], vec!["再见", "！"]]
        );
    }
}
