use std::collections::BTreeSet;

use fancy_regex::Regex;
use nonempty::NonEmpty;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants, EnumString};

static CLOZE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").unwrap());

pub trait KindTrait {
    /// The prompt as presented to the user, answers masked where needed.
    fn display_front(&self) -> String;
}

/// Free-text prompt, graded by comparing the typed answer.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TextCard {
    pub front: String,
    pub back: String,
    /// Pre-normalized acceptable answers. Falls back to `back` when empty.
    pub answers: Vec<String>,
    /// Alternate exact-accept pattern. A broken pattern is ignored, not an error.
    pub accept: Option<String>,
}

/// Multiple choice with exactly one right option. All or nothing.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct McqSingleCard {
    pub front: String,
    pub options: Vec<String>,
    pub correct: usize,
}

/// Multiple choice where any subset of options may be right.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct McqMultiCard {
    pub front: String,
    pub options: Vec<String>,
    pub correct: BTreeSet<usize>,
}

/// Fill-in-the-blank. The template embeds each answer in a `{{...}}` marker,
/// one canonical answer per blank, in template order.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ClozeCard {
    pub template: String,
    pub answers: NonEmpty<String>,
}

impl ClozeCard {
    /// Parses a template, pulling the marker contents out as the per-blank
    /// answers. A template without markers is not a cloze.
    pub fn from_template(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        let mut answers = vec![];

        for found in CLOZE_MARKER.captures_iter(&template) {
            let Ok(caps) = found else {
                continue;
            };

            if let Some(blank) = caps.get(1) {
                answers.push(blank.as_str().trim().to_string());
            }
        }

        let answers = NonEmpty::from_vec(answers)?;

        Some(Self { template, answers })
    }

    pub fn blanks(&self) -> usize {
        self.answers.len()
    }
}

/// Listening card. The front references the clip, grading works like text.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AudioCard {
    pub front: String,
    pub back: String,
    pub answers: Vec<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(name(CKind))]
#[strum_discriminants(derive(Display, EnumString, Hash, PartialOrd, Ord, Serialize, Deserialize))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
#[strum_discriminants(serde(rename_all = "kebab-case"))]
pub enum CardKind {
    Text(TextCard),
    McqSingle(McqSingleCard),
    McqMulti(McqMultiCard),
    Cloze(ClozeCard),
    Audio(AudioCard),
}

impl From<TextCard> for CardKind {
    fn from(value: TextCard) -> Self {
        Self::Text(value)
    }
}

impl From<McqSingleCard> for CardKind {
    fn from(value: McqSingleCard) -> Self {
        Self::McqSingle(value)
    }
}
impl From<McqMultiCard> for CardKind {
    fn from(value: McqMultiCard) -> Self {
        Self::McqMulti(value)
    }
}
impl From<ClozeCard> for CardKind {
    fn from(value: ClozeCard) -> Self {
        Self::Cloze(value)
    }
}
impl From<AudioCard> for CardKind {
    fn from(value: AudioCard) -> Self {
        Self::Audio(value)
    }
}

impl KindTrait for TextCard {
    fn display_front(&self) -> String {
        self.front.clone()
    }
}

impl KindTrait for McqSingleCard {
    fn display_front(&self) -> String {
        self.front.clone()
    }
}

impl KindTrait for McqMultiCard {
    fn display_front(&self) -> String {
        self.front.clone()
    }
}

impl KindTrait for ClozeCard {
    fn display_front(&self) -> String {
        CLOZE_MARKER.replace_all(&self.template, "___").into_owned()
    }
}

impl KindTrait for AudioCard {
    fn display_front(&self) -> String {
        self.front.clone()
    }
}

impl KindTrait for CardKind {
    fn display_front(&self) -> String {
        match self {
            CardKind::Text(card) => card.display_front(),
            CardKind::McqSingle(card) => card.display_front(),
            CardKind::McqMulti(card) => card.display_front(),
            CardKind::Cloze(card) => card.display_front(),
            CardKind::Audio(card) => card.display_front(),
        }
    }
}
