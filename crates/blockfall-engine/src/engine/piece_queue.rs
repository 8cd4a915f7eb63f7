use std::{collections::VecDeque, fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Number of pieces visible in the upcoming-piece preview.
pub const PREVIEW_LEN: usize = 6;

/// Seed for the piece randomizer.
///
/// 128 bits, displayed and parsed as a 32-character hex string. The same
/// seed produces the same piece sequence, which makes sessions reproducible
/// for debugging and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSeed([u8; 16]);

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error parsing a [`GameSeed`] from a hex string.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("seed must be a 32-character hex string")]
pub struct ParseSeedError;

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError);
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError)?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows drawing a random seed with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

/// The randomized piece supply: a 7-bag generator feeding a fixed-length
/// FIFO preview.
///
/// The bag holds a shuffled permutation of all 7 kinds and is drawn from the
/// back; when it runs out, a fresh shuffle replaces it. Any 7 consecutive
/// draws aligned to a bag boundary therefore contain each kind exactly once,
/// which bounds starvation: no kind is ever withheld for more than ~12
/// draws.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    bag: ArrayVec<PieceKind, { PieceKind::LEN }>,
    upcoming: VecDeque<PieceKind>,
}

impl PieceQueue {
    /// Creates a queue seeded from `seed`, with the preview already filled.
    #[must_use]
    pub fn new(seed: GameSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: ArrayVec::new(),
            upcoming: VecDeque::with_capacity(PREVIEW_LEN),
        };
        while this.upcoming.len() < PREVIEW_LEN {
            let piece = this.draw_from_bag();
            this.upcoming.push_back(piece);
        }
        this
    }

    /// Pops the next piece, refilling the preview's tail from the bag.
    pub fn pop_next(&mut self) -> PieceKind {
        let next = self
            .upcoming
            .pop_front()
            .expect("preview queue is never empty");
        let refill = self.draw_from_bag();
        self.upcoming.push_back(refill);
        next
    }

    /// The upcoming pieces, nearest first. Always [`PREVIEW_LEN`] items.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.upcoming.iter().copied()
    }

    fn draw_from_bag(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.bag = ArrayVec::from(PieceKind::ALL);
            self.bag.shuffle(&mut self.rng);
        }
        self.bag.pop().expect("bag was just refilled")
    }
}
