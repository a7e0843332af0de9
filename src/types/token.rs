//! Token: one morphologically analysed word occurrence.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::LensError;

/// Part-of-speech tag, collapsed to the categories the views colour by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Preposition,
    Adjective,
    Pronoun,
    Other,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 6] = [
        Self::Noun,
        Self::Verb,
        Self::Preposition,
        Self::Adjective,
        Self::Pronoun,
        Self::Other,
    ];

    /// Canonical name, as used in token JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Noun => "Noun",
            Self::Verb => "Verb",
            Self::Preposition => "Preposition",
            Self::Adjective => "Adjective",
            Self::Pronoun => "Pronoun",
            Self::Other => "Other",
        }
    }

    /// Lenient mapping from a corpus tag. Unknown tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(Self::Other)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PartOfSpeech {
    type Err = LensError;

    /// Strict parse: accepts the canonical names (any case) and the
    /// short corpus tags. Anything else is a configuration error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOUN" | "N" | "PN" => Ok(Self::Noun),
            "VERB" | "V" => Ok(Self::Verb),
            "PREPOSITION" | "P" | "PREP" => Ok(Self::Preposition),
            "ADJECTIVE" | "ADJ" => Ok(Self::Adjective),
            "PRONOUN" | "PRON" | "DEM" | "REL" => Ok(Self::Pronoun),
            "OTHER" => Ok(Self::Other),
            other => Err(LensError::config(format!(
                "unknown part of speech '{other}'"
            ))),
        }
    }
}

impl Serialize for PartOfSpeech {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PartOfSpeech {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Structured morphology bag attached to each token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morphology {
    #[serde(default)]
    pub stem: String,
    #[serde(default)]
    pub gloss: String,
    #[serde(default)]
    pub features: BTreeMap<String, String>,
}

/// Verse address within the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AyahRef {
    pub sura: u32,
    pub ayah: u32,
}

impl AyahRef {
    pub fn new(sura: u32, ayah: u32) -> Self {
        Self { sura, ayah }
    }
}

impl fmt::Display for AyahRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sura, self.ayah)
    }
}

/// One word occurrence. Immutable once produced by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub sura: u32,
    pub ayah: u32,
    pub position: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub lemma: String,
    pub pos: PartOfSpeech,
    #[serde(default)]
    pub morphology: Morphology,
}

impl Token {
    /// The token's ayah address.
    pub fn ayah_ref(&self) -> AyahRef {
        AyahRef::new(self.sura, self.ayah)
    }

    /// Non-empty root, if any.
    pub fn root_str(&self) -> Option<&str> {
        self.root
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Non-empty lemma, if any.
    pub fn lemma_str(&self) -> Option<&str> {
        let lemma = self.lemma.trim();
        if lemma.is_empty() {
            None
        } else {
            Some(lemma)
        }
    }

    /// Canonical sort key: (sura, ayah, position).
    pub fn address(&self) -> (u32, u32, u32) {
        (self.sura, self.ayah, self.position)
    }
}

/// Builder for [`Token`]s. Used by loaders and tests.
pub struct TokenBuilder {
    token: Token,
}

impl TokenBuilder {
    /// Start a token at the given address. The id defaults to `sura:ayah:position`.
    pub fn new(sura: u32, ayah: u32, position: u32) -> Self {
        Self {
            token: Token {
                id: format!("{sura}:{ayah}:{position}"),
                sura,
                ayah,
                position,
                text: String::new(),
                root: None,
                lemma: String::new(),
                pos: PartOfSpeech::Other,
                morphology: Morphology::default(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.token.id = id.into();
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.token.text = text.into();
        self
    }

    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.token.root = Some(root.into());
        self
    }

    pub fn lemma(mut self, lemma: impl Into<String>) -> Self {
        self.token.lemma = lemma.into();
        self
    }

    pub fn pos(mut self, pos: PartOfSpeech) -> Self {
        self.token.pos = pos;
        self
    }

    pub fn stem(mut self, stem: impl Into<String>) -> Self {
        self.token.morphology.stem = stem.into();
        self
    }

    pub fn gloss(mut self, gloss: impl Into<String>) -> Self {
        self.token.morphology.gloss = gloss.into();
        self
    }

    pub fn feature(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.token.morphology.features.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Token {
        self.token
    }
}
