// Doubly linked degree chains stored in an arena.
//
// `DegreeGraph` owns `Degree` records in a `Vec` and links them through
// `DegreeId` indices in each degree's `previous`/`next` fields. A chain is
// either open (the first degree has no `previous`, the last has no `next`)
// or closed into a circle (last.next == first, first.previous == last).
// Every operation here works on both shapes; "have we come back around" is
// decided by comparing ids, never by a sentinel value.
//
// Structural operations:
// - `attach_next` / `attach_previous` / `insert_between` / `push_back`
// - `close_circle` / `open_circle`
// - `get_last`, `forward`, `chain_len`, `is_closed`
// - `round` — lazy one-round traversal in either direction
// - `reversed` / `sorted_by_weight` — build a *new* graph of copies; the
//   source chain is never relinked
//
// A chain whose links neither return to the origin nor end within as many
// steps as there are degrees is malformed; operations that detect one fail
// with `StructuralInvariantViolation` instead of trying to repair it.
//
// See also: `degree.rs` for the record type, `mode.rs` for the owning
// `Mode`, `builder.rs` for how chains are grown.

use crate::degree::{Degree, DegreeId};
use crate::error::{ModeError, Result};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Traversal direction along a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow `next` links.
    Forward,
    /// Follow `previous` links.
    Backward,
}

/// Arena of degrees linked into chains.
///
/// Deserializing checks every link with `check_links`, so a loaded graph
/// never holds an id outside its arena.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphFile")]
pub struct DegreeGraph {
    degrees: Vec<Degree>,
}

#[derive(Deserialize)]
struct GraphFile {
    degrees: Vec<Degree>,
}

impl TryFrom<GraphFile> for DegreeGraph {
    type Error = ModeError;

    fn try_from(file: GraphFile) -> Result<Self> {
        let graph = DegreeGraph {
            degrees: file.degrees,
        };
        graph.check_links()?;
        Ok(graph)
    }
}

impl DegreeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a degree as-is and return its id. Links already set on
    /// `degree` are kept, so callers normally pass a fresh or detached one.
    pub fn add(&mut self, degree: Degree) -> DegreeId {
        let id = DegreeId(self.degrees.len() as u32);
        self.degrees.push(degree);
        id
    }

    /// Get a degree by id. Panics on an id from another graph.
    pub fn degree(&self, id: DegreeId) -> &Degree {
        &self.degrees[id.index()]
    }

    /// Mutable access for annotation. Panics on an id from another graph.
    pub fn degree_mut(&mut self, id: DegreeId) -> &mut Degree {
        &mut self.degrees[id.index()]
    }

    pub fn get(&self, id: DegreeId) -> Option<&Degree> {
        self.degrees.get(id.index())
    }

    /// Every stored degree, in insertion order (not chain order).
    pub fn degrees(&self) -> &[Degree] {
        &self.degrees
    }

    /// Number of stored degrees.
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Every `previous`/`next` link points inside the arena and is matched
    /// by the reverse link on the other degree.
    pub fn check_links(&self) -> Result<()> {
        for (index, degree) in self.degrees().iter().enumerate() {
            let id = DegreeId(index as u32);
            if let Some(next) = degree.next {
                self.check(next)?;
                if self.degree(next).previous != Some(id) {
                    return Err(ModeError::structural(format!(
                        "{id} links forward to {next}, which does not link back"
                    )));
                }
            }
            if let Some(previous) = degree.previous {
                self.check(previous)?;
                if self.degree(previous).next != Some(id) {
                    return Err(ModeError::structural(format!(
                        "{id} links back to {previous}, which does not link forward"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check(&self, id: DegreeId) -> Result<()> {
        if id.index() < self.degrees.len() {
            Ok(())
        } else {
            Err(ModeError::structural(format!(
                "{id} is not in a graph of {} degrees",
                self.degrees.len()
            )))
        }
    }

    fn link(&self, id: DegreeId, direction: Direction) -> Option<DegreeId> {
        let degree = self.degree(id);
        match direction {
            Direction::Forward => degree.next,
            Direction::Backward => degree.previous,
        }
    }

    // -----------------------------------------------------------------------
    // Linking
    // -----------------------------------------------------------------------

    /// Make `b` follow `a`: `a.next = b`, `b.previous = a`.
    pub fn attach_next(&mut self, a: DegreeId, b: DegreeId) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(ModeError::structural(format!("cannot attach {a} to itself")));
        }
        self.degree_mut(a).next = Some(b);
        self.degree_mut(b).previous = Some(a);
        Ok(())
    }

    /// Make `b` precede `a`: `a.previous = b`, `b.next = a`.
    pub fn attach_previous(&mut self, a: DegreeId, b: DegreeId) -> Result<()> {
        self.attach_next(b, a)
    }

    /// Wire the unlinked degree `new` between the adjacent `a` and `b`.
    pub fn insert_between(&mut self, new: DegreeId, a: DegreeId, b: DegreeId) -> Result<()> {
        self.check(new)?;
        self.check(a)?;
        self.check(b)?;
        if self.degree(a).next != Some(b) || self.degree(b).previous != Some(a) {
            return Err(ModeError::structural(format!("{a} and {b} are not adjacent")));
        }
        let inserted = self.degree(new);
        if new == a || new == b || inserted.next.is_some() || inserted.previous.is_some() {
            return Err(ModeError::structural(format!("{new} is already linked")));
        }
        self.attach_next(a, new)?;
        self.attach_next(new, b)
    }

    /// Append `new` after the last degree of the chain containing `origin`.
    /// On a closed chain the new degree goes between the last and first.
    pub fn push_back(&mut self, origin: DegreeId, new: DegreeId) -> Result<()> {
        let last = self.get_last(origin, false)?;
        match self.degree(last).next {
            Some(first) => self.insert_between(new, last, first),
            None => self.attach_next(last, new),
        }
    }

    // -----------------------------------------------------------------------
    // Shape
    // -----------------------------------------------------------------------

    /// Walk from `origin` along `next` (or `previous` when `from_left`) and
    /// return the last degree before the walk ends or wraps back to
    /// `origin`. On an open chain this is the right (left) end; on a closed
    /// chain it is the neighbour of `origin` on the other side.
    pub fn get_last(&self, origin: DegreeId, from_left: bool) -> Result<DegreeId> {
        self.check(origin)?;
        let direction = if from_left {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let mut current = origin;
        for _ in 0..=self.degrees.len() {
            match self.link(current, direction) {
                None => return Ok(current),
                Some(next) if next == origin => return Ok(current),
                Some(next) => {
                    self.check(next)?;
                    current = next;
                }
            }
        }
        Err(ModeError::structural(format!(
            "chain from {origin} neither ends nor returns to its origin"
        )))
    }

    /// True if the chain through `origin` is a circle.
    pub fn is_closed(&self, origin: DegreeId) -> Result<bool> {
        let last = self.get_last(origin, false)?;
        Ok(self.degree(last).next == Some(origin))
    }

    /// The first degree of one full round: `origin` itself on a circle, the
    /// left end on an open chain.
    pub fn round_start(&self, origin: DegreeId) -> Result<DegreeId> {
        if self.is_closed(origin)? {
            Ok(origin)
        } else {
            self.get_last(origin, true)
        }
    }

    /// Number of degrees in the chain through `origin`.
    pub fn chain_len(&self, origin: DegreeId) -> Result<usize> {
        let start = self.round_start(origin)?;
        Ok(self.round(start, Direction::Forward).count())
    }

    /// Link the two open ends of the chain through `origin` together.
    ///
    /// Returns `false` without touching anything when the chain is already
    /// closed. A single degree closes onto itself.
    pub fn close_circle(&mut self, origin: DegreeId) -> Result<bool> {
        let first = self.get_last(origin, true)?;
        let last = self.get_last(origin, false)?;
        if self.degree(first).previous.is_some() || self.degree(last).next.is_some() {
            return Ok(false);
        }
        // Not attach_next: a one-degree circle links a degree to itself.
        self.degree_mut(last).next = Some(first);
        self.degree_mut(first).previous = Some(last);
        trace!(%first, %last, "closed circle");
        Ok(true)
    }

    /// Cut the circle through `origin` just before `origin`, making it the
    /// left end. Returns `false` without touching anything on an open chain.
    pub fn open_circle(&mut self, origin: DegreeId) -> Result<bool> {
        if !self.is_closed(origin)? {
            return Ok(false);
        }
        let last = self.get_last(origin, false)?;
        self.degree_mut(last).next = None;
        self.degree_mut(origin).previous = None;
        trace!(%origin, %last, "opened circle");
        Ok(true)
    }

    /// The degree `n` steps after `origin`. Past the right end of an open
    /// chain the walk wraps to its left end.
    pub fn forward(&self, origin: DegreeId, n: usize) -> Result<DegreeId> {
        let len = self.chain_len(origin)?;
        let mut current = origin;
        for _ in 0..n % len {
            current = match self.degree(current).next {
                Some(next) => next,
                None => self.get_last(current, true)?,
            };
        }
        Ok(current)
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Lazily visit one round of the chain starting at `origin`.
    ///
    /// On a circle this yields every degree once and stops before `origin`
    /// comes around again. On an open chain it stops at the end in
    /// `direction`. Calling again starts a fresh round.
    pub fn round(&self, origin: DegreeId, direction: Direction) -> Round<'_> {
        Round {
            graph: self,
            origin,
            current: self.get(origin).map(|_| origin),
            direction,
            remaining: self.degrees.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Derived chains
    // -----------------------------------------------------------------------

    /// Copy `ids` into a new graph, linked in the given order, closing the
    /// new chain when `closed`. Returns the graph and its first degree.
    fn chain_of_copies(&self, ids: &[DegreeId], closed: bool) -> Result<(DegreeGraph, DegreeId)> {
        let mut copy = DegreeGraph::new();
        let mut previous: Option<DegreeId> = None;
        let mut head: Option<DegreeId> = None;
        for &id in ids {
            let new_id = copy.add(self.degree(id).detached());
            match previous {
                Some(p) => copy.attach_next(p, new_id)?,
                None => head = Some(new_id),
            }
            previous = Some(new_id);
        }
        let head = head.ok_or_else(|| ModeError::structural("cannot copy an empty chain"))?;
        if closed {
            copy.close_circle(head)?;
        }
        Ok((copy, head))
    }

    /// A mirrored copy of the chain through `origin`.
    ///
    /// A circle is mirrored around `origin`, which stays the entry point:
    /// 1 2 3 4 becomes 1 4 3 2. An open chain is read back to front and its
    /// old right end becomes the entry point. Closed-ness is preserved.
    pub fn reversed(&self, origin: DegreeId) -> Result<(DegreeGraph, DegreeId)> {
        let closed = self.is_closed(origin)?;
        let start = if closed {
            origin
        } else {
            self.get_last(origin, false)?
        };
        let ids: Vec<DegreeId> = self.round(start, Direction::Backward).map(|(id, _)| id).collect();
        self.chain_of_copies(&ids, closed)
    }

    /// A copy of the chain through `origin` ordered by absolute modal
    /// position weight, built by insertion sort into a fresh chain.
    ///
    /// Degrees are taken in round order and each is placed before the
    /// first already-sorted degree it beats, so equal weights keep their
    /// round order. Returns `Ok(None)` when any degree has no absolute
    /// modal position; the source chain is left as it was.
    pub fn sorted_by_weight(
        &self,
        origin: DegreeId,
        ascending: bool,
    ) -> Result<Option<(DegreeGraph, DegreeId)>> {
        let closed = self.is_closed(origin)?;
        let start = self.round_start(origin)?;
        let ids: Vec<DegreeId> = self.round(start, Direction::Forward).map(|(id, _)| id).collect();

        let mut weights = Vec::with_capacity(ids.len());
        for &id in &ids {
            match self.degree(id).absolute_modal_position {
                Some(position) => weights.push(position.weight),
                None => {
                    warn!(
                        degree = self.degree(id).number,
                        "degree has no absolute modal position, not sorting"
                    );
                    return Ok(None);
                }
            }
        }

        let goes_before = |new: i32, existing: i32| {
            if ascending {
                new < existing
            } else {
                new > existing
            }
        };

        let mut sorted = DegreeGraph::new();
        let mut head: Option<DegreeId> = None;
        for (&id, &weight) in ids.iter().zip(&weights) {
            let new_id = sorted.add(self.degree(id).detached());
            let Some(first) = head else {
                head = Some(new_id);
                continue;
            };

            let mut cursor = first;
            loop {
                let existing = sorted
                    .degree(cursor)
                    .absolute_modal_position
                    .map(|p| p.weight)
                    .unwrap_or_default();
                if goes_before(weight, existing) {
                    match sorted.degree(cursor).previous {
                        Some(before) => sorted.insert_between(new_id, before, cursor)?,
                        None => {
                            sorted.attach_next(new_id, cursor)?;
                            head = Some(new_id);
                        }
                    }
                    break;
                }
                match sorted.degree(cursor).next {
                    Some(next) => cursor = next,
                    None => {
                        sorted.attach_next(cursor, new_id)?;
                        break;
                    }
                }
            }
            trace!(number = self.degree(id).number, weight, "placed degree");
        }

        let head = head.ok_or_else(|| ModeError::structural("cannot sort an empty chain"))?;
        if closed {
            sorted.close_circle(head)?;
        }
        Ok(Some((sorted, head)))
    }
}

/// One lazy round over a chain. See `DegreeGraph::round`.
#[derive(Debug, Clone)]
pub struct Round<'a> {
    graph: &'a DegreeGraph,
    origin: DegreeId,
    current: Option<DegreeId>,
    direction: Direction,
    remaining: usize,
}

impl<'a> Iterator for Round<'a> {
    type Item = (DegreeId, &'a Degree);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        // A malformed chain cannot make a round outlast the arena.
        if self.remaining == 0 {
            self.current = None;
            return None;
        }
        self.remaining -= 1;
        let graph: &'a DegreeGraph = self.graph;
        let degree = graph.get(id)?;
        self.current = graph
            .link(id, self.direction)
            .filter(|&next| next != self.origin && graph.get(next).is_some());
        Some((id, degree))
    }
}
