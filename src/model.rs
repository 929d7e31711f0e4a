use std::fmt;

use derive_more::{Display, Error};

/// Number of liquid units a tube can hold.
pub const TUBE_CAPACITY: usize = 4;

/// Dense nonzero code identifying one liquid color.
///
/// Codes run `1..=K` for a puzzle with `K` colors; the raw slot byte `0` is
/// reserved for "empty". The engine only ever compares colors for equality;
/// mapping a code to a display color is the rendering layer's business.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ColorId(u8);

impl ColorId {
    /// Creates a color from its nonzero code.
    ///
    /// # Panics
    ///
    /// Panics if `code` is 0, which is the empty-slot marker.
    #[must_use]
    pub fn new(code: u8) -> Self {
        assert_ne!(code, 0, "color code 0 marks an empty slot");
        Self(code)
    }

    /// Returns the raw code in `1..=255`.
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Parses a letter label like "A", "Z", "AA" into a color.
    /// Uses Excel-style base-26 numbering: A=1, B=2, ..., Z=26, AA=27, ...
    /// Any non A-Z character, or a value past 255, makes the label invalid.
    pub fn from_letters(s: &str) -> Option<Self> {
        let mut acc: usize = 0;
        for ch in s.chars() {
            if !ch.is_ascii_alphabetic() {
                return None;
            }
            let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize;
            acc = acc * 26 + digit + 1;
            if acc > usize::from(u8::MAX) {
                return None;
            }
        }
        (acc != 0).then(|| Self(acc as u8))
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Inverse of `from_letters`. A u8 code needs at most two letters.
        let mut id = usize::from(self.0);
        let mut letters = [0u8; 2];
        let mut n = 0;
        while id > 0 {
            letters[n] = b'A' + ((id - 1) % 26) as u8;
            id = (id - 1) / 26;
            n += 1;
        }
        for &b in letters[..n].iter().rev() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// A single legal transfer between two tubes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Move {
    pub source: usize,
    pub target: usize,
    pub color: ColorId,
    pub units: usize,
}

/// Result of a legality check: what would pour, and how promising it is.
///
/// The weight comes from a fixed rule table (see [`PuzzleState::can_transfer`]);
/// it scores how much of the pour is useful progress rather than shuffling.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Pour {
    pub color: ColorId,
    pub units: usize,
    pub weight: f32,
}

/// Canonical encoding of a [`PuzzleState`]: `TUBE_CAPACITY * tube_count`
/// bytes of slot codes, bottom-to-top per tube. This is the only wire
/// format the engine defines; callers that persist keys as text can armor
/// the bytes however they like (base64, hex, ...).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateKey(Box<[u8]>);

impl StateKey {
    /// Wraps raw bytes, e.g. read back from an undo stack or save file.
    /// Validation happens in [`PuzzleState::decode`].
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Rejection reasons for [`PuzzleState::decode`].
///
/// Keys are only ever produced by [`PuzzleState::encode`], so hitting one of
/// these means the caller handed over corrupted or foreign data.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte length is not a nonzero multiple of the tube capacity.
    #[display("encoded state has {len} bytes, expected a nonzero multiple of 4")]
    BadLength { len: usize },
    /// A slot byte exceeds the number of colors in play.
    #[display("color code {code} is out of range for {color_count} colors")]
    BadColorCode { code: u8, color_count: u8 },
    /// A filled slot sits above an empty one.
    #[display("tube {tube} has liquid floating above an empty slot")]
    FloatingLiquid { tube: usize },
}

/// Rejection reasons for [`PuzzleState::from_text`].
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[display("unrecognized slot symbol {symbol:?}")]
    UnknownSymbol { symbol: String },
    #[display("tube {tube} has {len} slots, expected 4")]
    BadTubeLength { tube: usize, len: usize },
    #[display("tube {tube} has liquid floating above an empty slot")]
    FloatingLiquid { tube: usize },
}

/// A fixed-capacity tube of liquid units, stored bottom-to-top.
///
/// Occupied slots always form a contiguous prefix from the bottom; `add` and
/// `remove` keep it that way by only touching the correct end.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Tube {
    slots: [u8; TUBE_CAPACITY],
}

impl Tube {
    pub fn is_empty(&self) -> bool {
        self.slots[0] == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots[TUBE_CAPACITY - 1] != 0
    }

    /// All occupied slots share one color, and at least one is occupied.
    pub fn is_single_color(&self) -> bool {
        let first = self.slots[0];
        first != 0 && self.slots.iter().all(|&s| s == first || s == 0)
    }

    /// Full of a single color; a finished tube that no move may disturb.
    pub fn is_final(&self) -> bool {
        self.is_full() && self.is_single_color()
    }

    pub fn free_space(&self) -> usize {
        self.slots.iter().filter(|&&s| s == 0).count()
    }

    pub fn top_color(&self) -> Option<ColorId> {
        self.slots.iter().rev().find(|&&s| s != 0).map(|&s| ColorId(s))
    }

    /// The topmost contiguous same-color run: its color and length.
    pub fn top_run(&self) -> Option<(ColorId, usize)> {
        let mut below = self.slots.iter().rev().skip_while(|&&s| s == 0);
        let top = *below.next()?;
        let count = 1 + below.take_while(|&&s| s == top).count();
        Some((ColorId(top), count))
    }

    /// Contiguous same-color runs from the bottom up, for fill-level
    /// rendering by the UI layer.
    pub fn segments(&self) -> Vec<(ColorId, usize)> {
        let mut runs: Vec<(ColorId, usize)> = Vec::new();
        for &slot in &self.slots {
            if slot == 0 {
                break;
            }
            match runs.last_mut() {
                Some((color, count)) if color.code() == slot => *count += 1,
                _ => runs.push((ColorId(slot), 1)),
            }
        }
        runs
    }

    fn add(&mut self, color: ColorId, units: usize) {
        let mut added = 0;
        for slot in &mut self.slots {
            if *slot == 0 {
                *slot = color.code();
                added += 1;
                if added == units {
                    break;
                }
            }
        }
    }

    fn remove(&mut self, color: ColorId, units: usize) {
        let mut removed = 0;
        for slot in self.slots.iter_mut().rev() {
            if *slot == 0 {
                continue;
            }
            if *slot != color.code() {
                break;
            }
            *slot = 0;
            removed += 1;
            if removed == units {
                break;
            }
        }
    }
}

/// The whole puzzle: an ordered row of tubes plus the number of colors in
/// play. A value type; the solver works on its own clones and never touches
/// the caller's instance.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PuzzleState {
    tubes: Vec<Tube>,
    color_count: u8,
}

impl PuzzleState {
    /// Creates an all-empty state with `color_count + extra_tubes` tubes.
    #[must_use]
    pub fn new(color_count: u8, extra_tubes: usize) -> Self {
        Self {
            tubes: vec![Tube::default(); usize::from(color_count) + extra_tubes],
            color_count,
        }
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    pub fn color_count(&self) -> u8 {
        self.color_count
    }

    pub fn tube(&self, i: usize) -> &Tube {
        &self.tubes[i]
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    /// What tube `i` could pour out: the color and length of its top run,
    /// or `None` if the tube is empty.
    pub fn can_give(&self, i: usize) -> Option<(ColorId, usize)> {
        self.tubes[i].top_run()
    }

    /// What tube `i` could receive: the color already on top (`None` means
    /// anything fits) and the free units above it (0 when full).
    pub fn can_take(&self, i: usize) -> (Option<ColorId>, usize) {
        let tube = &self.tubes[i];
        (tube.top_color(), tube.free_space())
    }

    /// Legality and heuristic weight of pouring tube `i` into tube `j`.
    ///
    /// `None` means the pour is rejected outright. The weight of a legal
    /// pour comes from an ordered rule table, first match wins:
    ///
    /// - single-color source into a single-color target only proceeds when
    ///   the target already holds at least as much, weight 1
    /// - single-color source into a mixed target: 0.4
    /// - mixed source into an empty target: 0.5
    /// - pour that exactly tops off a single-color target: 3
    /// - any other pour onto a single-color target: 2
    /// - both tubes mixed: 1
    ///
    /// A finished tube is never disturbed, a single-color tube is never
    /// dumped into an empty one (pure shuffling), and a run larger than the
    /// target's free space is rejected rather than split.
    pub fn can_transfer(&self, i: usize, j: usize) -> Option<Pour> {
        let (s_color, s_units) = self.can_give(i)?;
        let (t_color, t_free) = self.can_take(j);
        if t_free == 0 {
            return None;
        }
        if t_color.is_some_and(|c| c != s_color) {
            return None;
        }
        if self.tubes[i].is_final() {
            return None;
        }
        if s_units > t_free {
            return None;
        }

        let i_single = self.tubes[i].is_single_color();
        let j_single = self.tubes[j].is_single_color();
        let t_run = self.tubes[j].top_run().map_or(0, |(_, count)| count);

        let weight = if i_single && t_free == TUBE_CAPACITY {
            return None;
        } else if i_single && j_single {
            if t_run < s_units {
                return None;
            }
            1.0
        } else if i_single {
            0.4
        } else if t_free == TUBE_CAPACITY {
            0.5
        } else if j_single && t_run + s_units == TUBE_CAPACITY {
            3.0
        } else if j_single {
            2.0
        } else {
            1.0
        };

        Some(Pour {
            color: s_color,
            units: s_units.min(t_free),
            weight,
        })
    }

    /// Applies a pre-validated move. The hot path does no legality check;
    /// callers must have obtained `step` from [`Self::can_transfer`].
    pub fn transfer(&mut self, step: Move) {
        self.tubes[step.source].remove(step.color, step.units);
        self.tubes[step.target].add(step.color, step.units);
    }

    /// Generation-time insertion, bypassing pour rules.
    pub(crate) fn add(&mut self, i: usize, color: ColorId, units: usize) {
        self.tubes[i].add(color, units);
    }

    pub fn is_tube_empty(&self, i: usize) -> bool {
        self.tubes[i].is_empty()
    }

    pub fn is_tube_single_color(&self, i: usize) -> bool {
        self.tubes[i].is_single_color()
    }

    pub fn is_tube_final(&self, i: usize) -> bool {
        self.tubes[i].is_final()
    }

    /// Solved: every tube is either empty or full of a single color.
    pub fn is_final(&self) -> bool {
        self.tubes.iter().all(|t| t.is_empty() || t.is_final())
    }

    /// Per-tube [`Self::can_give`] snapshot for the UI layer.
    pub fn top_runs(&self) -> Vec<Option<(ColorId, usize)>> {
        self.tubes.iter().map(Tube::top_run).collect()
    }

    /// Bottom-to-top color runs of tube `i`, for fill rendering.
    pub fn segments(&self, i: usize) -> Vec<(ColorId, usize)> {
        self.tubes[i].segments()
    }

    /// Serializes the state into its canonical byte key.
    #[must_use]
    pub fn encode(&self) -> StateKey {
        let mut bytes = Vec::with_capacity(self.tubes.len() * TUBE_CAPACITY);
        for tube in &self.tubes {
            bytes.extend_from_slice(&tube.slots);
        }
        StateKey(bytes.into_boxed_slice())
    }

    /// Rebuilds a state from a canonical key. Exact inverse of
    /// [`Self::encode`] for every key that `encode` produced.
    ///
    /// # Errors
    ///
    /// Fails fast on malformed input: a length that is not a nonzero
    /// multiple of the tube capacity, a color code above `color_count`, or
    /// liquid floating above an empty slot.
    pub fn decode(key: &StateKey, color_count: u8) -> Result<Self, DecodeError> {
        let bytes = key.as_bytes();
        if bytes.is_empty() || bytes.len() % TUBE_CAPACITY != 0 {
            return Err(DecodeError::BadLength { len: bytes.len() });
        }
        let mut tubes = Vec::with_capacity(bytes.len() / TUBE_CAPACITY);
        for (index, chunk) in bytes.chunks_exact(TUBE_CAPACITY).enumerate() {
            let mut slots = [0u8; TUBE_CAPACITY];
            slots.copy_from_slice(chunk);
            for p in 0..TUBE_CAPACITY {
                if slots[p] > color_count {
                    return Err(DecodeError::BadColorCode {
                        code: slots[p],
                        color_count,
                    });
                }
                if p > 0 && slots[p] != 0 && slots[p - 1] == 0 {
                    return Err(DecodeError::FloatingLiquid { tube: index });
                }
            }
            tubes.push(Tube { slots });
        }
        Ok(Self { tubes, color_count })
    }

    /// Parses a textual state like `"AABB/BBAA/...."`: tubes separated by
    /// `/`, one symbol per slot bottom-to-top, `.` for empty. Tubes whose
    /// labels run past `Z` use comma-separated multi-letter symbols
    /// (`"A,AB,AB,."`).
    ///
    /// # Errors
    ///
    /// Rejects unknown symbols, tubes that are not exactly capacity-sized,
    /// and liquid floating above an empty slot.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let mut tubes = Vec::new();
        let mut color_count = 0u8;
        for (index, part) in text.split('/').enumerate() {
            let part = part.trim();
            let symbols: Vec<&str> = if part.contains(',') {
                part.split(',').map(str::trim).collect()
            } else {
                part.split("").filter(|s| !s.is_empty()).collect()
            };
            if symbols.len() != TUBE_CAPACITY {
                return Err(ParseError::BadTubeLength {
                    tube: index,
                    len: symbols.len(),
                });
            }
            let mut slots = [0u8; TUBE_CAPACITY];
            for (p, symbol) in symbols.iter().enumerate() {
                slots[p] = if symbol.is_empty() || *symbol == "." {
                    0
                } else {
                    match ColorId::from_letters(symbol) {
                        Some(color) => color.code(),
                        None => {
                            return Err(ParseError::UnknownSymbol {
                                symbol: (*symbol).to_string(),
                            });
                        }
                    }
                };
                color_count = color_count.max(slots[p]);
            }
            for p in 1..TUBE_CAPACITY {
                if slots[p] != 0 && slots[p - 1] == 0 {
                    return Err(ParseError::FloatingLiquid { tube: index });
                }
            }
            tubes.push(Tube { slots });
        }
        Ok(Self { tubes, color_count })
    }

    /// Inverse of [`Self::from_text`].
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut tubes_repr = Vec::with_capacity(self.tubes.len());
        for tube in &self.tubes {
            let symbols: Vec<String> = tube
                .slots
                .iter()
                .map(|&slot| match slot {
                    0 => ".".to_string(),
                    code => ColorId(code).to_string(),
                })
                .collect();
            let separator = if symbols.iter().any(|s| s.len() > 1) { "," } else { "" };
            tubes_repr.push(symbols.join(separator));
        }
        tubes_repr.join("/")
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn state(text: &str) -> PuzzleState {
        PuzzleState::from_text(text).unwrap()
    }

    fn color(letter: &str) -> ColorId {
        ColorId::from_letters(letter).unwrap()
    }

    /// Random full deal: every color gets exactly `TUBE_CAPACITY` units.
    fn shuffled_deal(colors: u8, extra_tubes: usize, rng: &mut impl Rng) -> PuzzleState {
        let mut units: Vec<u8> = (1..=colors)
            .flat_map(|c| std::iter::repeat(c).take(TUBE_CAPACITY))
            .collect();
        units.shuffle(rng);
        let mut state = PuzzleState::new(colors, extra_tubes);
        for (i, &code) in units.iter().enumerate() {
            state.add(i / TUBE_CAPACITY, ColorId::new(code), 1);
        }
        state
    }

    fn units_of(state: &PuzzleState, code: u8) -> usize {
        (0..state.tube_count())
            .flat_map(|i| state.segments(i))
            .filter(|(color, _)| color.code() == code)
            .map(|(_, count)| count)
            .sum()
    }

    fn random_legal_move(state: &PuzzleState, rng: &mut impl Rng) -> Option<Move> {
        let n = state.tube_count();
        let mut moves = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i != j && let Some(pour) = state.can_transfer(i, j) {
                    moves.push(Move {
                        source: i,
                        target: j,
                        color: pour.color,
                        units: pour.units,
                    });
                }
            }
        }
        if moves.is_empty() {
            None
        } else {
            Some(moves[rng.random_range(0..moves.len())])
        }
    }

    #[test]
    fn color_letters_round_trip() {
        assert_eq!(color("A").code(), 1);
        assert_eq!(color("Z").code(), 26);
        assert_eq!(color("AA").code(), 27);
        assert_eq!(ColorId::new(1).to_string(), "A");
        assert_eq!(ColorId::new(27).to_string(), "AA");
        assert_eq!(ColorId::from_letters("a"), Some(ColorId::new(1)));
        assert_eq!(ColorId::from_letters("1"), None);
        assert_eq!(ColorId::from_letters(""), None);
        for code in 1..=255u8 {
            let c = ColorId::new(code);
            assert_eq!(ColorId::from_letters(&c.to_string()), Some(c));
        }
    }

    #[test]
    fn text_round_trip() {
        let s = state("AABB/BBAA/....");
        assert_eq!(s.tube_count(), 3);
        assert_eq!(s.color_count(), 2);
        assert_eq!(s.to_text(), "AABB/BBAA/....");

        assert!(matches!(
            PuzzleState::from_text("AAB/...."),
            Err(ParseError::BadTubeLength { tube: 0, len: 3 })
        ));
        assert!(matches!(
            PuzzleState::from_text("A.AB/...."),
            Err(ParseError::FloatingLiquid { tube: 0 })
        ));
        assert!(matches!(
            PuzzleState::from_text("A1BB/...."),
            Err(ParseError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn give_and_take() {
        let s = state("AABB/B.../....");
        assert_eq!(s.can_give(0), Some((color("B"), 2)));
        assert_eq!(s.can_give(1), Some((color("B"), 1)));
        assert_eq!(s.can_give(2), None);

        assert_eq!(s.can_take(1), (Some(color("B")), 3));
        assert_eq!(s.can_take(2), (None, 4));
        let full = state("AAAA/....");
        assert_eq!(full.can_take(0), (Some(color("A")), 0));
    }

    #[test]
    fn transfer_moves_top_run() {
        let mut s = state("AABB/..../....");
        let pour = s.can_transfer(0, 1).unwrap();
        assert_eq!(pour.units, 2);
        s.transfer(Move {
            source: 0,
            target: 1,
            color: pour.color,
            units: pour.units,
        });
        assert_eq!(s.to_text(), "AA../BB../....");
    }

    #[test]
    fn finished_tube_is_never_disturbed() {
        let s = state("AAAA/A.../....");
        assert!(s.is_tube_final(0));
        assert!(s.can_transfer(0, 1).is_none());
        assert!(s.can_transfer(0, 2).is_none());
        // Pouring onto the finished tube is also out: it has no free space.
        assert!(s.can_transfer(1, 0).is_none());
    }

    #[test]
    fn weight_rule_table() {
        // Single-color source into an empty tube is a pointless shuffle.
        let s = state("AA../BBBB/....");
        assert!(s.can_transfer(0, 2).is_none());

        // Single-color into single-color: target must already hold at
        // least as much as the source would give.
        let s = state("AA../A.../....");
        assert!(s.can_transfer(0, 1).is_none());
        let pour = s.can_transfer(1, 0).unwrap();
        assert_eq!((pour.units, pour.weight), (1, 1.0));

        // Single-color source, mixed target.
        let s = state("AA../BA../....");
        let pour = s.can_transfer(0, 1).unwrap();
        assert_eq!((pour.units, pour.weight), (2, 0.4));

        // Mixed source, empty target.
        let s = state("AB../BA../....");
        let pour = s.can_transfer(0, 2).unwrap();
        assert_eq!((pour.units, pour.weight), (1, 0.5));

        // Exact fill of a single-color target.
        let s = state("BBAA/AA../....");
        let pour = s.can_transfer(0, 1).unwrap();
        assert_eq!((pour.units, pour.weight), (2, 3.0));

        // Single-color target, not an exact fill.
        let s = state("BA../AA../....");
        let pour = s.can_transfer(0, 1).unwrap();
        assert_eq!((pour.units, pour.weight), (1, 2.0));

        // Both mixed.
        let s = state("AB../CB../....");
        let pour = s.can_transfer(0, 1).unwrap();
        assert_eq!((pour.units, pour.weight), (1, 1.0));

        // A run larger than the target's free space is never split.
        let s = state("ABBB/CAB./....");
        assert!(s.can_transfer(0, 1).is_none());
    }

    #[test]
    fn final_state_detection() {
        assert!(state("AAAA/BBBB/....").is_final());
        assert!(state("..../....").is_final());
        assert!(!state("AAAB/BBBA/....").is_final());
        // Single color but not full does not count as finished.
        assert!(!state("AA../AA../....").is_final());
    }

    #[test]
    fn encode_decode_round_trip() {
        let s = state("AABB/BBAA/....");
        let key = s.encode();
        assert_eq!(key.as_bytes(), &[1, 1, 2, 2, 2, 2, 1, 1, 0, 0, 0, 0]);
        assert_eq!(PuzzleState::decode(&key, 2).unwrap(), s);
    }

    #[test]
    fn decode_rejects_malformed_keys() {
        assert_eq!(
            PuzzleState::decode(&StateKey::from_bytes(vec![1, 1, 2]), 2),
            Err(DecodeError::BadLength { len: 3 })
        );
        assert_eq!(
            PuzzleState::decode(&StateKey::from_bytes(Vec::new()), 2),
            Err(DecodeError::BadLength { len: 0 })
        );
        assert_eq!(
            PuzzleState::decode(&StateKey::from_bytes(vec![1, 3, 0, 0]), 2),
            Err(DecodeError::BadColorCode {
                code: 3,
                color_count: 2
            })
        );
        assert_eq!(
            PuzzleState::decode(&StateKey::from_bytes(vec![1, 0, 1, 0]), 2),
            Err(DecodeError::FloatingLiquid { tube: 0 })
        );
    }

    #[test]
    fn segments_and_top_runs() {
        let s = state("AABB/B.../....");
        assert_eq!(s.segments(0), vec![(color("A"), 2), (color("B"), 2)]);
        assert_eq!(s.segments(2), vec![]);
        assert_eq!(
            s.top_runs(),
            vec![Some((color("B"), 2)), Some((color("B"), 1)), None]
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Round-trip and conservation hold along random legal-move walks
        /// from random full deals.
        #[test]
        fn reachable_state_invariants(seed in any::<u64>(), steps in 0usize..40) {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let mut state = shuffled_deal(4, 2, &mut rng);
            for _ in 0..steps {
                let Some(step) = random_legal_move(&state, &mut rng) else {
                    break;
                };
                state.transfer(step);
            }
            let key = state.encode();
            prop_assert_eq!(key.as_bytes().len(), state.tube_count() * TUBE_CAPACITY);
            prop_assert_eq!(
                PuzzleState::decode(&key, state.color_count()).unwrap(),
                state.clone()
            );
            for code in 1..=state.color_count() {
                prop_assert_eq!(units_of(&state, code), TUBE_CAPACITY);
            }
        }
    }
}
