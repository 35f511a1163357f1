//! Relational structure traversed by unroll strategies.
//!
//! Structures are immutable once built and shared by cheap clones, so every
//! unroll query reads one consistent snapshot. To change the structure, build
//! a new one and a new template over it.

use std::collections::HashMap;
use std::sync::Arc;

use factorforge_core::{VarId, Variable};

#[derive(Debug, Default)]
struct SequencesInner {
    sequences: Vec<Vec<Variable>>,
    positions: HashMap<VarId, (usize, usize)>,
}

/// An ordered collection of variable sequences (sentences, time series).
///
/// A variable appears at most once; if it is given twice, its last
/// occurrence is the one `position` reports.
#[derive(Debug, Clone, Default)]
pub struct Sequences {
    inner: Arc<SequencesInner>,
}

impl Sequences {
    pub fn new<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = Variable>,
    {
        let sequences: Vec<Vec<Variable>> = sequences
            .into_iter()
            .map(|s| s.into_iter().collect())
            .collect();
        let mut positions = HashMap::new();
        for (s, sequence) in sequences.iter().enumerate() {
            for (i, variable) in sequence.iter().enumerate() {
                positions.insert(variable.id(), (s, i));
            }
        }
        Self {
            inner: Arc::new(SequencesInner {
                sequences,
                positions,
            }),
        }
    }

    /// A single sequence.
    pub fn single(sequence: impl IntoIterator<Item = Variable>) -> Self {
        Self::new([sequence])
    }

    /// `(sequence, offset)` of `variable`.
    pub fn position(&self, variable: &Variable) -> Option<(usize, usize)> {
        self.inner.positions.get(&variable.id()).copied()
    }

    pub fn sequence(&self, index: usize) -> Option<&[Variable]> {
        self.inner.sequences.get(index).map(Vec::as_slice)
    }

    /// Variable at `offset` in sequence `index`.
    pub fn get(&self, index: usize, offset: usize) -> Option<&Variable> {
        self.sequence(index).and_then(|s| s.get(offset))
    }

    pub fn next(&self, variable: &Variable) -> Option<&Variable> {
        let (s, i) = self.position(variable)?;
        self.get(s, i + 1)
    }

    pub fn previous(&self, variable: &Variable) -> Option<&Variable> {
        let (s, i) = self.position(variable)?;
        self.get(s, i.checked_sub(1)?)
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.inner.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Variable]> + '_ {
        self.inner.sequences.iter().map(Vec::as_slice)
    }

    /// All variables, sequence by sequence.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.inner.sequences.iter().flatten()
    }
}

#[derive(Debug, Default)]
struct AdjacencyInner {
    edges: Vec<(Variable, Variable)>,
    outgoing: HashMap<VarId, Vec<usize>>,
    incoming: HashMap<VarId, Vec<usize>>,
}

/// An explicit directed edge list over variables.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    inner: Arc<AdjacencyInner>,
}

impl Adjacency {
    pub fn new(edges: impl IntoIterator<Item = (Variable, Variable)>) -> Self {
        let edges: Vec<(Variable, Variable)> = edges.into_iter().collect();
        let mut outgoing: HashMap<VarId, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<VarId, Vec<usize>> = HashMap::new();
        for (i, (from, to)) in edges.iter().enumerate() {
            outgoing.entry(from.id()).or_default().push(i);
            incoming.entry(to.id()).or_default().push(i);
        }
        Self {
            inner: Arc::new(AdjacencyInner {
                edges,
                outgoing,
                incoming,
            }),
        }
    }

    /// Edges leaving `variable`, in insertion order.
    pub fn outgoing<'a>(
        &'a self,
        variable: &Variable,
    ) -> impl Iterator<Item = &'a (Variable, Variable)> + 'a {
        self.edges_at(&self.inner.outgoing, variable)
    }

    /// Edges entering `variable`, in insertion order.
    pub fn incoming<'a>(
        &'a self,
        variable: &Variable,
    ) -> impl Iterator<Item = &'a (Variable, Variable)> + 'a {
        self.edges_at(&self.inner.incoming, variable)
    }

    fn edges_at<'a>(
        &'a self,
        index: &'a HashMap<VarId, Vec<usize>>,
        variable: &Variable,
    ) -> impl Iterator<Item = &'a (Variable, Variable)> + 'a {
        index
            .get(&variable.id())
            .into_iter()
            .flatten()
            .map(|&i| &self.inner.edges[i])
    }

    pub fn edges(&self) -> &[(Variable, Variable)] {
        &self.inner.edges
    }

    pub fn len(&self) -> usize {
        self.inner.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.edges.is_empty()
    }
}
