use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64;

use crate::session::AudioSource;

/// Picks cues uniformly at random from the active list.
pub struct CueDeck {
    cues: Vec<String>,
    rng: Box<dyn RngCore + Send>,
}

impl std::fmt::Debug for CueDeck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueDeck").field("cues", &self.cues).finish()
    }
}

impl CueDeck {
    pub fn new(cues: Vec<String>) -> Self {
        Self {
            cues,
            rng: Box::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic deck for reproducible runs.
    pub fn with_seed(cues: Vec<String>, seed: u64) -> Self {
        Self {
            cues,
            rng: Box::new(Pcg64::seed_from_u64(seed)),
        }
    }

    pub fn from_source(source: &AudioSource) -> Self {
        Self::new(source.cues())
    }

    pub fn cues(&self) -> &[String] {
        &self.cues
    }

    /// `None` when the deck is empty.
    pub fn pick(&mut self) -> Option<&str> {
        if self.cues.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.cues.len());
        self.cues.get(index).map(String::as_str)
    }
}
