use std::cmp::Ordering;

use ahash::AHashMap;
use glam::DVec2;

use super::beachline::NodeId;

/// Stable identity of an event, valid until the event leaves the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) struct EventId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Event {
    /// Insertion of the site with the given index.
    Site(usize),
    /// Predicted disappearance of the arc `arc`, whose bounding edges meet at
    /// the Voronoi vertex `vertex`.
    Circle { arc: NodeId, vertex: DVec2 },
}

#[derive(Clone, Debug)]
struct Entry {
    point: DVec2,
    id: EventId,
    event: Event,
}

impl Entry {
    /// Sweep order: larger y first, then larger x, then insertion order.
    fn priority_cmp(&self, other: &Self) -> Ordering {
        self.point
            .y
            .total_cmp(&other.point.y)
            .then(self.point.x.total_cmp(&other.point.x))
            .then(other.id.cmp(&self.id))
    }
}

/// A binary max-heap of sweep events that supports removal of arbitrary
/// events by their [`EventId`] in `O(log n)`.
#[derive(Clone, Debug, Default)]
pub(super) struct EventQueue {
    heap: Vec<Entry>,
    positions: AHashMap<EventId, usize>,
    next_id: u64,
}

impl EventQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: AHashMap::with_capacity(capacity),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, id: EventId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Schedule `event` to happen when the sweep reaches `point`.
    pub fn insert(&mut self, point: DVec2, event: Event) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        let idx = self.heap.len();
        self.heap.push(Entry { point, id, event });
        self.positions.insert(id, idx);
        self.sift_up(idx);
        id
    }

    /// Remove and return the event that comes first in sweep order.
    pub fn pop(&mut self) -> Option<(EventId, DVec2, Event)> {
        if self.heap.is_empty() {
            return None;
        }
        let entry = self.take(0);
        Some((entry.id, entry.point, entry.event))
    }

    /// Remove the event with the given id. Does nothing if the event is no
    /// longer queued.
    pub fn remove(&mut self, id: EventId) -> Option<Event> {
        let idx = *self.positions.get(&id)?;
        Some(self.take(idx).event)
    }

    fn take(&mut self, idx: usize) -> Entry {
        let entry = self.heap.swap_remove(idx);
        self.positions.remove(&entry.id);
        if idx < self.heap.len() {
            self.positions.insert(self.heap[idx].id, idx);
            self.sift_down(idx);
            self.sift_up(idx);
        }
        entry
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        self.positions.insert(self.heap[i].id, i);
        self.positions.insert(self.heap[j].id, j);
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].priority_cmp(&self.heap[parent]) != Ordering::Greater {
                break;
            }
            self.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut largest = idx;
            if left < self.heap.len()
                && self.heap[left].priority_cmp(&self.heap[largest]) == Ordering::Greater
            {
                largest = left;
            }
            if right < self.heap.len()
                && self.heap[right].priority_cmp(&self.heap[largest]) == Ordering::Greater
            {
                largest = right;
            }
            if largest == idx {
                return;
            }
            self.swap(idx, largest);
            idx = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{prelude::*, rngs::StdRng};

    fn pop_sites(queue: &mut EventQueue) -> Vec<usize> {
        let mut sites = vec![];
        while let Some((_, _, event)) = queue.pop() {
            match event {
                Event::Site(idx) => sites.push(idx),
                Event::Circle { .. } => panic!("Unexpected circle event!"),
            }
        }
        sites
    }

    #[test]
    fn test_orders_by_y_then_x() {
        let mut queue = EventQueue::default();
        queue.insert(DVec2::new(0., 0.), Event::Site(0));
        queue.insert(DVec2::new(10., 0.), Event::Site(1));
        queue.insert(DVec2::new(5., 10.), Event::Site(2));
        queue.insert(DVec2::new(-5., 3.), Event::Site(3));
        assert_eq!(queue.len(), 4);

        assert_eq!(pop_sites(&mut queue), vec![2, 3, 1, 0]);
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_identical_points_pop_in_insertion_order() {
        let mut queue = EventQueue::default();
        for i in 0..5 {
            queue.insert(DVec2::new(5., -2.), Event::Site(i));
        }
        queue.insert(DVec2::new(5., -1.), Event::Site(5));
        assert_eq!(pop_sites(&mut queue), vec![5, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut queue = EventQueue::default();
        let a = queue.insert(DVec2::new(0., 3.), Event::Site(0));
        let b = queue.insert(DVec2::new(0., 2.), Event::Site(1));
        let c = queue.insert(DVec2::new(0., 1.), Event::Site(2));

        assert_eq!(queue.remove(b), Some(Event::Site(1)));
        assert!(!queue.contains(b));
        // removing twice is a no-op
        assert_eq!(queue.remove(b), None);
        assert!(queue.contains(a) && queue.contains(c));
        assert_eq!(pop_sites(&mut queue), vec![0, 2]);
        assert_eq!(queue.remove(a), None);
    }

    #[test]
    fn test_random_inserts_and_removals() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut queue = EventQueue::with_capacity(256);
        let mut expected = vec![];
        let mut ids = vec![];
        for i in 0..256 {
            // coarse coordinates to provoke ties
            let point = DVec2::new(rng.gen_range(0..8) as f64, rng.gen_range(0..8) as f64);
            ids.push(queue.insert(point, Event::Site(i)));
            expected.push((point, i));
        }
        for i in (0..256).step_by(3) {
            assert_eq!(queue.remove(ids[i]), Some(Event::Site(i)));
        }
        expected.retain(|&(_, i)| i % 3 != 0);
        expected.sort_by(|(p, i), (q, j)| {
            q.y.total_cmp(&p.y)
                .then(q.x.total_cmp(&p.x))
                .then(i.cmp(j))
        });

        let expected: Vec<usize> = expected.into_iter().map(|(_, i)| i).collect();
        assert_eq!(pop_sites(&mut queue), expected);
    }
}
