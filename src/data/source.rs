use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::data::point::LabelledDataPoint;

/// Produces the labelled data for each epoch.
///
/// Every call to `next_epoch` hands out a fresh, single-pass sequence; the
/// trainer never rewinds one. Exhausting the sequence ends the epoch.
pub trait DataSource {
    fn next_epoch(&mut self) -> Box<dyn Iterator<Item = LabelledDataPoint> + '_>;
}

/// An in-memory dataset, optionally reshuffled at the start of each epoch.
///
/// Shuffling draws from the thread RNG unless a seed was given with
/// [`shuffled_with_seed`](Dataset::shuffled_with_seed).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    points: Vec<LabelledDataPoint>,
    shuffle: bool,
    rng: Option<StdRng>,
}

impl Dataset {
    pub fn new(points: Vec<LabelledDataPoint>) -> Self {
        Dataset { points, shuffle: false, rng: None }
    }

    pub fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }

    /// Reshuffles every epoch in an order fixed by `seed`.
    pub fn shuffled_with_seed(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    pub fn points(&self) -> &[LabelledDataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reorders the points in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.points.shuffle(rng);
    }
}

impl DataSource for Dataset {
    fn next_epoch(&mut self) -> Box<dyn Iterator<Item = LabelledDataPoint> + '_> {
        if self.shuffle {
            match self.rng.as_mut() {
                Some(rng) => self.points.shuffle(rng),
                None => self.points.shuffle(&mut rand::thread_rng()),
            }
        }
        Box::new(self.points.iter().cloned())
    }
}

impl From<Vec<LabelledDataPoint>> for Dataset {
    fn from(points: Vec<LabelledDataPoint>) -> Self {
        Dataset::new(points)
    }
}

/// Wraps a closure that builds a new sequence for every epoch, e.g. a
/// reader streaming from disk. The closure receives the 0-based epoch.
pub struct GeneratedSource<F> {
    generator: F,
    epoch: usize,
}

impl<F, I> GeneratedSource<F>
where
    F: FnMut(usize) -> I,
    I: IntoIterator<Item = LabelledDataPoint>,
{
    pub fn new(generator: F) -> Self {
        GeneratedSource { generator, epoch: 0 }
    }
}

impl<F, I> DataSource for GeneratedSource<F>
where
    F: FnMut(usize) -> I,
    I: IntoIterator<Item = LabelledDataPoint>,
    I::IntoIter: 'static,
{
    fn next_epoch(&mut self) -> Box<dyn Iterator<Item = LabelledDataPoint> + '_> {
        let iter = (self.generator)(self.epoch);
        self.epoch += 1;
        Box::new(iter.into_iter())
    }
}
