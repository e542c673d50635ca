use crate::config::{ClefMode, Configuration};
use crate::difficulty::DifficultyProfile;
use crate::pitch::{self, Accidental, Clef};
use crate::runtime::Randomness;
use serde::{Deserialize, Serialize};

/// One note the player is asked to identify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSpec {
    pub note_number: i32,
    pub pitch: String,
    pub notation_key: String,
    pub clef: Clef,
    pub accidental: Option<Accidental>,
}

impl NoteSpec {
    pub fn natural(note_number: i32, clef: Clef) -> Self {
        let pitch = pitch::note_number_to_pitch(note_number, false);
        Self::build(note_number, pitch, clef, None)
    }

    /// A natural base note shifted by `accidental`, spelled on the base letter
    pub fn with_accidental(base_natural: i32, accidental: Accidental, clef: Clef) -> Self {
        let pitch = pitch::spell(base_natural, accidental);
        Self::build(
            base_natural + accidental.semitones(),
            pitch,
            clef,
            Some(accidental),
        )
    }

    fn build(note_number: i32, pitch: String, clef: Clef, accidental: Option<Accidental>) -> Self {
        let notation_key = match pitch::pitch_to_notation_key(&pitch, clef) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("{e} while building notation key");
                String::new()
            }
        };
        Self {
            note_number,
            pitch,
            notation_key,
            clef,
            accidental,
        }
    }
}

/// Build a fresh sequence of `config.sequence_length` notes, clamped to the allowed range
pub fn generate_sequence<R: Randomness + ?Sized>(
    config: &Configuration,
    rng: &mut R,
) -> Vec<NoteSpec> {
    let profile = config.profile();
    let doubles = config.double_accidentals_enabled();
    (0..config.sequence_length_in_range())
        .map(|_| generate_note(&profile, config.clef, doubles, rng))
        .collect()
}

/// Same as `generate_sequence`; used where a running session swaps its sequence
pub fn regenerate_sequence<R: Randomness + ?Sized>(
    config: &Configuration,
    rng: &mut R,
) -> Vec<NoteSpec> {
    generate_sequence(config, rng)
}

fn generate_note<R: Randomness + ?Sized>(
    profile: &DifficultyProfile,
    clef_mode: ClefMode,
    doubles: bool,
    rng: &mut R,
) -> NoteSpec {
    if profile.naturals_only || rng.next_unit() >= profile.accidental_probability {
        let n = pick_natural(profile, rng);
        return NoteSpec::natural(n, assign_clef(clef_mode, n));
    }

    let base = pick_natural(profile, rng);
    let accidental = choose_accidental(profile, doubles, rng);
    let shifted = base + accidental.semitones();

    if !profile.contains(shifted) {
        log::trace!("{accidental} on {base} leaves the range, keeping the natural");
        return NoteSpec::natural(base, assign_clef(clef_mode, base));
    }
    NoteSpec::with_accidental(base, accidental, assign_clef(clef_mode, shifted))
}

fn pick_natural<R: Randomness + ?Sized>(profile: &DifficultyProfile, rng: &mut R) -> i32 {
    pitch::random_natural_in_range(rng, profile.min_note, profile.max_note).unwrap_or_else(|| {
        log::warn!(
            "no naturals in {}..={}, using the lower bound",
            profile.min_note,
            profile.max_note
        );
        profile.min_note
    })
}

fn choose_accidental<R: Randomness + ?Sized>(
    profile: &DifficultyProfile,
    doubles: bool,
    rng: &mut R,
) -> Accidental {
    // The ratio is undefined for a zero accidental probability
    let double = doubles
        && profile.accidental_probability > 0.0
        && rng.next_unit()
            < profile.double_accidental_probability / profile.accidental_probability;
    let sharp = rng.next_unit() < 0.5;

    match (double, sharp) {
        (false, true) => Accidental::Sharp,
        (false, false) => Accidental::Flat,
        (true, true) => Accidental::DoubleSharp,
        (true, false) => Accidental::DoubleFlat,
    }
}

fn assign_clef(mode: ClefMode, n: i32) -> Clef {
    mode.fixed().unwrap_or_else(|| pitch::suggest_clef(n))
}

/// Check a sequence against the range, naturals, clef and double-accidental rules
pub fn validate_sequence(sequence: &[NoteSpec], config: &Configuration) -> bool {
    let profile = config.profile();
    let doubles = config.double_accidentals_enabled();
    let fixed_clef = config.clef.fixed();

    sequence.iter().all(|note| {
        let in_range = profile.contains(note.note_number);
        let naturals_ok = !profile.naturals_only
            || (note.accidental.is_none() && pitch::is_natural(note.note_number));
        let clef_ok = fixed_clef.map_or(true, |clef| note.clef == clef);
        let doubles_ok = doubles || !note.accidental.is_some_and(Accidental::is_double);
        in_range && naturals_ok && clef_ok && doubles_ok
    })
}
