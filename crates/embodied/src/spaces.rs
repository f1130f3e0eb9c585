//! Action and observation spaces.

use std::collections::BTreeMap;

/// Continuous space with per-element bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    pub low: Vec<f32>,
    pub high: Vec<f32>,
    shape: Vec<usize>,
}

impl BoxSpace {
    #[must_use]
    pub fn new(low: Vec<f32>, high: Vec<f32>, shape: Vec<usize>) -> Self {
        assert_eq!(low.len(), high.len(), "low and high must have the same length");
        assert_eq!(
            low.len(),
            shape.iter().product::<usize>(),
            "bounds must cover the whole shape"
        );
        Self { low, high, shape }
    }

    #[must_use]
    pub fn uniform(shape: &[usize], low: f32, high: f32) -> Self {
        let n = shape.iter().product();
        Self::new(vec![low; n], vec![high; n], shape.to_vec())
    }

    #[must_use]
    pub fn unbounded(shape: &[usize]) -> Self {
        Self::uniform(shape, f32::NEG_INFINITY, f32::INFINITY)
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    /// Uniform sample; unbounded elements are drawn from `[-1, 1)`.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f32> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&l, &h)| {
                if l.is_finite() && h.is_finite() {
                    l + rng.f32() * (h - l)
                } else {
                    rng.f32() * 2.0 - 1.0
                }
            })
            .collect()
    }

    #[must_use]
    pub fn contains(&self, value: &[f32]) -> bool {
        value.len() == self.len()
            && value
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(&v, (&l, &h))| v >= l && v <= h)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Space {
    Box(BoxSpace),
    /// One categorical choice per element, element `i` in `0..nvec[i]`.
    MultiDiscrete(Vec<u32>),
    Dict(BTreeMap<String, Space>),
}

impl Space {
    pub fn dict<'a>(pairs: impl IntoIterator<Item = (&'a str, Space)>) -> Self {
        Self::Dict(pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Space> {
        match self {
            Self::Dict(spaces) => spaces.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_box(&self) -> Option<&BoxSpace> {
        match self {
            Self::Box(b) => Some(b),
            _ => None,
        }
    }

    /// Shape of the space; dictionaries report their flattened size.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Box(b) => b.shape().to_vec(),
            Self::MultiDiscrete(nvec) => vec![nvec.len()],
            Self::Dict(spaces) => vec![spaces
                .values()
                .map(|s| s.shape().iter().product::<usize>())
                .sum()],
        }
    }
}

/// One uniform draw from a `MultiDiscrete` space with sizes `nvec`.
pub fn sample_multi_discrete(nvec: &[u32], rng: &mut fastrand::Rng) -> Vec<u32> {
    nvec.iter().map(|&n| rng.u32(0..n.max(1))).collect()
}
