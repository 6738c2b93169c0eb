//! Unicode script heuristics

use regex::Regex;
use std::sync::LazyLock;

use crate::core::models::LanguageCode;

static KATAKANA_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ァ-ヶー]+").expect("katakana pattern is valid"));

/// Hiragana block
pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}')
}

/// Katakana, phonetic extensions and halfwidth forms
pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}')
}

/// Kana plus the ideograph block used for Japanese kanji
pub fn is_japanese_char(c: char) -> bool {
    is_hiragana(c) || is_katakana(c) || matches!(c, '\u{4E00}'..='\u{9FAF}')
}

/// Hangul syllables and jamo
pub fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

/// Ideographs outside the Japanese range
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

/// Accented letters used in French
pub fn is_french_accent(c: char) -> bool {
    matches!(
        c.to_lowercase().next().unwrap_or(c),
        'à' | 'â' | 'æ' | 'ç' | 'é' | 'è' | 'ê' | 'ë' | 'î' | 'ï' | 'ô' | 'œ' | 'ù' | 'û' | 'ÿ'
    )
}

/// Umlauts and ß
pub fn is_german_letter(c: char) -> bool {
    matches!(c, 'ä' | 'ö' | 'ü' | 'ß' | 'Ä' | 'Ö' | 'Ü' | 'ẞ')
}

/// Whether any character is kana or a common kanji
pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(is_japanese_char)
}

/// Classify text by script, testing the unambiguous scripts first
pub fn detect_by_script(text: &str) -> Option<LanguageCode> {
    let checks: [(fn(char) -> bool, &str); 6] = [
        (is_japanese_char, "ja"),
        (is_hangul, "ko"),
        (is_cjk_ideograph, "zh"),
        (is_french_accent, "fr"),
        (is_german_letter, "de"),
        (|c: char| c.is_ascii_alphabetic(), "en"),
    ];

    checks
        .iter()
        .find(|(matches, _)| text.chars().any(matches))
        .map(|(_, code)| LanguageCode::new(code))
}

/// All katakana runs in `text`, joined by single spaces
pub fn extract_katakana(text: &str) -> Option<String> {
    let runs: Vec<&str> = KATAKANA_RUN.find_iter(text).map(|m| m.as_str()).collect();
    if runs.is_empty() {
        None
    } else {
        Some(runs.join(" "))
    }
}
