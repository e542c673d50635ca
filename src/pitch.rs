use crate::error::PitchError;
use crate::runtime::Randomness;
use serde::{Deserialize, Serialize};

/// Lowest and highest note numbers on a standard 88-key piano
pub const LOWEST_NOTE: i32 = 21;
pub const HIGHEST_NOTE: i32 = 108;

/// Middle C, the treble/bass split used by `suggest_clef`
pub const MIDDLE_C: i32 = 60;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];
const NATURAL_PITCH_CLASSES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Staff a note is written on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

/// Modifier applied to a natural base pitch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Accidental {
    Sharp,
    Flat,
    DoubleSharp,
    DoubleFlat,
}

impl Accidental {
    pub fn semitones(self) -> i32 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
            Accidental::DoubleSharp => 2,
            Accidental::DoubleFlat => -2,
        }
    }

    /// Token used in pitch names and notation keys
    pub fn token(self) -> &'static str {
        match self {
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            Accidental::DoubleSharp => "##",
            Accidental::DoubleFlat => "bb",
        }
    }

    pub fn is_double(self) -> bool {
        matches!(self, Accidental::DoubleSharp | Accidental::DoubleFlat)
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "#" => Some(Accidental::Sharp),
            "b" => Some(Accidental::Flat),
            "##" => Some(Accidental::DoubleSharp),
            "bb" => Some(Accidental::DoubleFlat),
            _ => None,
        }
    }
}

/// A pitch name broken into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedPitch {
    pub letter: char,
    pub accidental: Option<Accidental>,
    pub octave: i32,
}

impl ParsedPitch {
    pub fn note_number(&self) -> i32 {
        let base = letter_offset(self.letter).unwrap_or(0);
        let shift = self.accidental.map_or(0, Accidental::semitones);
        (self.octave + 1) * 12 + base + shift
    }
}

fn letter_offset(letter: char) -> Option<i32> {
    match letter {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Name a note number, e.g. 60 -> `C4`, 61 -> `C#4` (or `Db4` with `prefer_flat`)
pub fn note_number_to_pitch(n: i32, prefer_flat: bool) -> String {
    let octave = n.div_euclid(12) - 1;
    let pitch_class = n.rem_euclid(12) as usize;
    let table = if prefer_flat { &FLAT_NAMES } else { &SHARP_NAMES };
    format!("{}{}", table[pitch_class], octave)
}

/// Split `<letter>[accidental]<signed octave>` into its parts
pub fn parse_pitch(name: &str) -> Result<ParsedPitch, PitchError> {
    let invalid = || PitchError::InvalidPitchFormat(name.to_string());

    let letter = name.chars().next().ok_or_else(invalid)?;
    letter_offset(letter).ok_or_else(invalid)?;
    let rest = &name[letter.len_utf8()..];

    // Longest token first so `bb` is not read as `b` followed by garbage
    let (accidental, octave_str) = ["##", "bb", "#", "b"]
        .iter()
        .find_map(|token| {
            rest.strip_prefix(token)
                .map(|tail| (Accidental::from_token(token), tail))
        })
        .unwrap_or((None, rest));

    let digits = octave_str.strip_prefix('-').unwrap_or(octave_str);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let octave: i32 = octave_str.parse().map_err(|_| invalid())?;

    Ok(ParsedPitch {
        letter,
        accidental,
        octave,
    })
}

pub fn pitch_to_note_number(name: &str) -> Result<i32, PitchError> {
    parse_pitch(name).map(|parsed| parsed.note_number())
}

/// Rewrite a pitch name as a renderer key, e.g. `C#4` -> `c#/4`.
/// Keys are identical on both staves.
pub fn pitch_to_notation_key(name: &str, _clef: Clef) -> Result<String, PitchError> {
    let parsed = parse_pitch(name)?;
    Ok(format!(
        "{}{}/{}",
        parsed.letter.to_ascii_lowercase(),
        parsed.accidental.map_or("", Accidental::token),
        parsed.octave
    ))
}

/// Spell a natural base note with an accidental, keeping the base letter and octave.
/// B3 with a sharp is `B#3` (note number 60), not `C4`.
pub fn spell(base_natural: i32, accidental: Accidental) -> String {
    let octave = base_natural.div_euclid(12) - 1;
    let letter = SHARP_NAMES[base_natural.rem_euclid(12) as usize];
    format!("{}{}{}", letter, accidental.token(), octave)
}

pub fn is_natural(n: i32) -> bool {
    NATURAL_PITCH_CLASSES.contains(&n.rem_euclid(12))
}

pub fn naturals_in_range(min: i32, max: i32) -> Vec<i32> {
    (min..=max).filter(|&n| is_natural(n)).collect()
}

/// Uniform pick among the naturals in `min..=max`, `None` if there are none
pub fn random_natural_in_range<R: Randomness + ?Sized>(
    rng: &mut R,
    min: i32,
    max: i32,
) -> Option<i32> {
    let naturals = naturals_in_range(min, max);
    if naturals.is_empty() {
        return None;
    }
    let idx = rng.int_inclusive(0, naturals.len() as i32 - 1);
    naturals.get(idx as usize).copied()
}

pub fn suggest_clef(n: i32) -> Clef {
    if n >= MIDDLE_C {
        Clef::Treble
    } else {
        Clef::Bass
    }
}
