//! Unroll strategies: given a seed, find the neighbor tuples it belongs to.
//!
//! An `N`-ary strategy answers one question per position: "which neighbor
//! tuples have `seed` at `position`?". Each answer is a lazy, finite sequence
//! and is empty when the seed cannot occupy that position.

use std::fmt;

use factorforge_core::{DomainId, DomainRef, Variable};

use super::relation::{Adjacency, Sequences};

/// Relational traversal for an `N`-ary template.
pub trait Unroller<const N: usize>: Send + Sync + 'static {
    /// Neighbor tuples that hold `seed` at `position`.
    ///
    /// Must be a pure function of the current relational structure.
    fn unroll_at<'a>(
        &'a self,
        position: usize,
        seed: &'a Variable,
    ) -> impl Iterator<Item = [Variable; N]> + 'a;
}

/// Windows of `N` consecutive elements of each sequence.
///
/// `ChainUnroller<2>` over a sequence `a b c` yields `(a, b)` and `(b, c)`.
#[derive(Debug, Clone)]
pub struct ChainUnroller<const N: usize> {
    sequences: Sequences,
}

impl<const N: usize> ChainUnroller<N> {
    pub fn new(sequences: Sequences) -> Self {
        Self { sequences }
    }

    pub fn sequences(&self) -> &Sequences {
        &self.sequences
    }

    fn window(&self, position: usize, seed: &Variable) -> Option<[Variable; N]> {
        if position >= N {
            return None;
        }
        let (s, offset) = self.sequences.position(seed)?;
        let sequence = self.sequences.sequence(s)?;
        let start = offset.checked_sub(position)?;
        let window = sequence.get(start..start + N)?;
        Some(std::array::from_fn(|i| window[i].clone()))
    }
}

impl<const N: usize> Unroller<N> for ChainUnroller<N> {
    fn unroll_at<'a>(
        &'a self,
        position: usize,
        seed: &'a Variable,
    ) -> impl Iterator<Item = [Variable; N]> + 'a {
        self.window(position, seed).into_iter()
    }
}

/// Pairs elements at equal offsets of two parallel sequence collections.
///
/// Position 0 draws from `left`, position 1 from `right`; a typical use is
/// pairing each label with its observation.
#[derive(Debug, Clone)]
pub struct AlignedUnroller {
    left: Sequences,
    right: Sequences,
}

impl AlignedUnroller {
    pub fn new(left: Sequences, right: Sequences) -> Self {
        Self { left, right }
    }

    fn pair(&self, position: usize, seed: &Variable) -> Option<[Variable; 2]> {
        match position {
            0 => {
                let (s, i) = self.left.position(seed)?;
                let partner = self.right.get(s, i)?;
                Some([seed.clone(), partner.clone()])
            }
            1 => {
                let (s, i) = self.right.position(seed)?;
                let partner = self.left.get(s, i)?;
                Some([partner.clone(), seed.clone()])
            }
            _ => None,
        }
    }
}

impl Unroller<2> for AlignedUnroller {
    fn unroll_at<'a>(
        &'a self,
        position: usize,
        seed: &'a Variable,
    ) -> impl Iterator<Item = [Variable; 2]> + 'a {
        self.pair(position, seed).into_iter()
    }
}

/// Pairs along the edges of an explicit adjacency.
#[derive(Debug, Clone)]
pub struct AdjacencyUnroller {
    adjacency: Adjacency,
}

impl AdjacencyUnroller {
    pub fn new(adjacency: Adjacency) -> Self {
        Self { adjacency }
    }
}

impl Unroller<2> for AdjacencyUnroller {
    fn unroll_at<'a>(
        &'a self,
        position: usize,
        seed: &'a Variable,
    ) -> impl Iterator<Item = [Variable; 2]> + 'a {
        let edges: Box<dyn Iterator<Item = &'a (Variable, Variable)> + 'a> = match position {
            0 => Box::new(self.adjacency.outgoing(seed)),
            1 => Box::new(self.adjacency.incoming(seed)),
            _ => Box::new(std::iter::empty()),
        };
        edges.map(|(from, to)| [from.clone(), to.clone()])
    }
}

/// Unary factors for every variable of one domain.
#[derive(Debug, Clone)]
pub struct DomainUnroller {
    domain: DomainId,
}

impl DomainUnroller {
    pub fn new(domain: &DomainRef) -> Self {
        Self {
            domain: domain.id(),
        }
    }
}

impl Unroller<1> for DomainUnroller {
    fn unroll_at<'a>(
        &'a self,
        position: usize,
        seed: &'a Variable,
    ) -> impl Iterator<Item = [Variable; 1]> + 'a {
        (position == 0 && seed.domain().id() == self.domain)
            .then(|| [seed.clone()])
            .into_iter()
    }
}

/// Unroll strategy given by a closure `(position, seed) -> tuples`.
pub struct FnUnroller<F> {
    unroll: F,
}

impl<F> FnUnroller<F> {
    pub fn new(unroll: F) -> Self {
        Self { unroll }
    }
}

impl<const N: usize, F> Unroller<N> for FnUnroller<F>
where
    F: Fn(usize, &Variable) -> Vec<[Variable; N]> + Send + Sync + 'static,
{
    fn unroll_at<'a>(
        &'a self,
        position: usize,
        seed: &'a Variable,
    ) -> impl Iterator<Item = [Variable; N]> + 'a {
        (self.unroll)(position, seed).into_iter()
    }
}

impl<F> fmt::Debug for FnUnroller<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnUnroller").finish_non_exhaustive()
    }
}
