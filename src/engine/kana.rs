//! Built-in kana engine
//!
//! Converts hiragana and dictionary words to katakana and romanizes kana with
//! Hepburn rules. Kanji without a dictionary reading pass through unchanged.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::{EngineLoader, TransliterationEngine};
use crate::core::errors::EngineError;
use crate::core::script::{is_hiragana, is_katakana};

/// Katakana → Hepburn romaji; digraphs are matched before single kana
const HEPBURN: &[(&str, &str)] = &[
    ("キャ", "kya"), ("キュ", "kyu"), ("キョ", "kyo"),
    ("シャ", "sha"), ("シュ", "shu"), ("ショ", "sho"), ("シェ", "she"),
    ("チャ", "cha"), ("チュ", "chu"), ("チョ", "cho"), ("チェ", "che"),
    ("ニャ", "nya"), ("ニュ", "nyu"), ("ニョ", "nyo"),
    ("ヒャ", "hya"), ("ヒュ", "hyu"), ("ヒョ", "hyo"),
    ("ミャ", "mya"), ("ミュ", "myu"), ("ミョ", "myo"),
    ("リャ", "rya"), ("リュ", "ryu"), ("リョ", "ryo"),
    ("ギャ", "gya"), ("ギュ", "gyu"), ("ギョ", "gyo"),
    ("ジャ", "ja"), ("ジュ", "ju"), ("ジョ", "jo"), ("ジェ", "je"),
    ("ビャ", "bya"), ("ビュ", "byu"), ("ビョ", "byo"),
    ("ピャ", "pya"), ("ピュ", "pyu"), ("ピョ", "pyo"),
    ("ティ", "ti"), ("ディ", "di"), ("トゥ", "tu"), ("ドゥ", "du"),
    ("ファ", "fa"), ("フィ", "fi"), ("フェ", "fe"), ("フォ", "fo"),
    ("ウィ", "wi"), ("ウェ", "we"), ("ウォ", "wo"),
    ("ヴァ", "va"), ("ヴィ", "vi"), ("ヴェ", "ve"), ("ヴォ", "vo"),
    ("ア", "a"), ("イ", "i"), ("ウ", "u"), ("エ", "e"), ("オ", "o"),
    ("カ", "ka"), ("キ", "ki"), ("ク", "ku"), ("ケ", "ke"), ("コ", "ko"),
    ("サ", "sa"), ("シ", "shi"), ("ス", "su"), ("セ", "se"), ("ソ", "so"),
    ("タ", "ta"), ("チ", "chi"), ("ツ", "tsu"), ("テ", "te"), ("ト", "to"),
    ("ナ", "na"), ("ニ", "ni"), ("ヌ", "nu"), ("ネ", "ne"), ("ノ", "no"),
    ("ハ", "ha"), ("ヒ", "hi"), ("フ", "fu"), ("ヘ", "he"), ("ホ", "ho"),
    ("マ", "ma"), ("ミ", "mi"), ("ム", "mu"), ("メ", "me"), ("モ", "mo"),
    ("ヤ", "ya"), ("ユ", "yu"), ("ヨ", "yo"),
    ("ラ", "ra"), ("リ", "ri"), ("ル", "ru"), ("レ", "re"), ("ロ", "ro"),
    ("ワ", "wa"), ("ヰ", "i"), ("ヱ", "e"), ("ヲ", "o"), ("ン", "n"),
    ("ガ", "ga"), ("ギ", "gi"), ("グ", "gu"), ("ゲ", "ge"), ("ゴ", "go"),
    ("ザ", "za"), ("ジ", "ji"), ("ズ", "zu"), ("ゼ", "ze"), ("ゾ", "zo"),
    ("ダ", "da"), ("ヂ", "ji"), ("ヅ", "zu"), ("デ", "de"), ("ド", "do"),
    ("バ", "ba"), ("ビ", "bi"), ("ブ", "bu"), ("ベ", "be"), ("ボ", "bo"),
    ("パ", "pa"), ("ピ", "pi"), ("プ", "pu"), ("ペ", "pe"), ("ポ", "po"),
    ("ヴ", "vu"),
    ("ァ", "a"), ("ィ", "i"), ("ゥ", "u"), ("ェ", "e"), ("ォ", "o"),
    ("ャ", "ya"), ("ュ", "yu"), ("ョ", "yo"), ("ヮ", "wa"),
];

const SOKUON: char = 'ッ';
const CHOONPU: char = 'ー';

/// Shift hiragana into the katakana block
fn hiragana_to_katakana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Kana engine with its romanization table and optional reading dictionary
pub struct KanaEngine {
    romaji: HashMap<&'static str, &'static str>,
    /// Surface form → katakana reading
    dictionary: HashMap<String, String>,
    longest_entry: usize,
}

impl Default for KanaEngine {
    fn default() -> Self {
        Self::with_dictionary(HashMap::new())
    }
}

impl KanaEngine {
    /// Engine with surface → reading entries; readings may be hiragana
    pub fn with_dictionary(dictionary: HashMap<String, String>) -> Self {
        let dictionary: HashMap<String, String> = dictionary
            .into_iter()
            .filter(|(surface, _)| !surface.is_empty())
            .map(|(surface, reading)| (surface, hiragana_to_katakana(&reading)))
            .collect();
        let longest_entry = dictionary.keys().map(|k| k.chars().count()).max().unwrap_or(0);

        Self {
            romaji: HEPBURN.iter().copied().collect(),
            dictionary,
            longest_entry,
        }
    }

    /// Number of dictionary entries
    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    /// Replace dictionary words, longest match first
    fn apply_dictionary(&self, text: &str) -> String {
        if self.dictionary.is_empty() {
            return text.to_string();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;

        'outer: while i < chars.len() {
            let max = self.longest_entry.min(chars.len() - i);
            for len in (1..=max).rev() {
                let candidate: String = chars[i..i + len].iter().collect();
                if let Some(reading) = self.dictionary.get(&candidate) {
                    out.push_str(reading);
                    i += len;
                    continue 'outer;
                }
            }
            out.push(chars[i]);
            i += 1;
        }

        out
    }

    fn syllable_at(&self, chars: &[char], i: usize) -> Option<(&'static str, usize)> {
        if i + 1 < chars.len() {
            let pair: String = chars[i..i + 2].iter().collect();
            if let Some(romaji) = self.romaji.get(pair.as_str()) {
                return Some((*romaji, 2));
            }
        }
        let single = chars[i].to_string();
        self.romaji.get(single.as_str()).map(|romaji| (*romaji, 1))
    }
}

impl TransliterationEngine for KanaEngine {
    fn to_katakana(&self, text: &str) -> Result<String, EngineError> {
        let converted = hiragana_to_katakana(&self.apply_dictionary(text));

        if !converted.chars().any(is_katakana) {
            return Err(EngineError::Conversion(format!("no kana reading for {:?}", text)));
        }

        debug!("Katakana conversion: {} -> {}", text, converted);
        Ok(converted)
    }

    fn to_romaji(&self, text: &str) -> Result<String, EngineError> {
        let kana = hiragana_to_katakana(&self.apply_dictionary(text));
        let chars: Vec<char> = kana.chars().collect();

        if !chars.iter().any(|c| is_katakana(*c) || is_hiragana(*c)) {
            return Err(EngineError::Conversion(format!("no kana to romanize in {:?}", text)));
        }

        let mut out = String::with_capacity(chars.len() * 2);
        let mut geminate = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if c == SOKUON {
                geminate = true;
                i += 1;
                continue;
            }

            if c == CHOONPU {
                if let Some(vowel) = out.chars().last().filter(|v| "aeiou".contains(*v)) {
                    out.push(vowel);
                }
                i += 1;
                continue;
            }

            match self.syllable_at(&chars, i) {
                Some((romaji, consumed)) => {
                    if geminate {
                        if romaji.starts_with("ch") {
                            out.push('t');
                        } else if let Some(first) = romaji.chars().next().filter(|f| !"aeiou".contains(*f)) {
                            out.push(first);
                        }
                    }
                    out.push_str(romaji);
                    i += consumed;
                }
                None => {
                    out.push(c);
                    i += 1;
                }
            }
            geminate = false;
        }

        Ok(out)
    }
}

/// Builds a [`KanaEngine`], reading the optional dictionary file
#[derive(Debug, Clone, Default)]
pub struct KanaEngineLoader {
    dictionary_path: Option<PathBuf>,
}

impl KanaEngineLoader {
    /// Loader reading a JSON or YAML dictionary, if given
    pub fn new(dictionary_path: Option<PathBuf>) -> Self {
        Self { dictionary_path }
    }
}

async fn read_dictionary(path: &Path) -> Result<HashMap<String, String>, EngineError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| EngineError::Init(format!("{}: {}", path.display(), e)))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| EngineError::Init(e.to_string())),
        _ => serde_json::from_str(&content).map_err(|e| EngineError::Init(e.to_string())),
    }
}

#[async_trait]
impl EngineLoader for KanaEngineLoader {
    async fn load(&self) -> Result<Arc<dyn TransliterationEngine>, EngineError> {
        let dictionary = match &self.dictionary_path {
            Some(path) => read_dictionary(path).await?,
            None => HashMap::new(),
        };

        let engine = KanaEngine::with_dictionary(dictionary);
        info!("Kana engine loaded with {} dictionary entries", engine.dictionary_len());
        Ok(Arc::new(engine))
    }
}
