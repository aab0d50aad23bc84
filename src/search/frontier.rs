use crate::geometry::Cell;
use bitvec::{bitvec, vec::BitVec};
use std::{cmp::Ordering, collections::BinaryHeap};

/// A* open-set entry
// https://doc.rust-lang.org/std/collections/binary_heap/#examples
#[derive(Copy, Clone, Debug)]
struct FrontierEntry {
    /// Estimated total cost `g + h`.
    priority: f64,
    /// Insertion sequence number; breaks priority ties first-in, first-out.
    order: u64,
    cell: Cell,
}

// The priority queue depends on `Ord`.
// Explicitly implement the trait so the queue becomes a min-heap
// instead of a max-heap.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &FrontierEntry) -> Ordering {
        // Notice that we flip the ordering on priorities and on insertion order.
        // `order` is unique per entry, which keeps `Eq` and `Ord` consistent.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &FrontierEntry) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &FrontierEntry) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Cells discovered but not yet finalized, ordered by estimated total cost.
///
/// Decreasing a cell's priority pushes a second entry rather than editing the
/// first; the stale entry stays in the heap until it is popped, and the searcher
/// discards it then because its cell is already explored.
#[derive(Debug)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    queued: BitVec,
    width: usize,
    next_order: u64,
}

impl Frontier {
    /// An empty frontier over a `height × width` grid.
    pub fn new(height: usize, width: usize) -> Frontier {
        Frontier {
            heap: BinaryHeap::new(),
            queued: bitvec!(0; height * width),
            width,
            next_order: 0,
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// Insert `cell`, or lower its priority if it is already queued.
    pub fn push(&mut self, cell: Cell, priority: f64) {
        let idx = self.index(cell);
        self.queued.set(idx, true);
        self.heap.push(FrontierEntry {
            priority,
            order: self.next_order,
            cell,
        });
        self.next_order += 1;
    }

    /// Remove the entry with the lowest priority; ties go to the earliest insertion.
    ///
    /// May yield a cell more than once if its priority was lowered after it was
    /// first queued.
    pub fn pop(&mut self) -> Option<(Cell, f64)> {
        let FrontierEntry { priority, cell, .. } = self.heap.pop()?;
        let idx = self.index(cell);
        self.queued.set(idx, false);
        Some((cell, priority))
    }

    /// `true` while `cell` has been pushed and not yet popped.
    pub fn contains(&self, cell: Cell) -> bool {
        self.queued[self.index(cell)]
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
