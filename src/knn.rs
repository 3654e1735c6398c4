use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::{KnnScheme, Scratch, Workload};

/// Squared euclidean distance; no sqrt, since only the ordering matters.
pub fn squared_l2(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Tally the queue's labels into `votes` and return the first argmax.
/// The row is reset first, so reusing a `Scratch` never accumulates.
fn majority_vote(queue: &[(f64, u32)], votes: &mut [u32]) -> u32 {
    votes.fill(0);
    for &(_, label) in queue {
        votes[label as usize] += 1;
    }
    let mut best = 0;
    for (class, &count) in votes.iter().enumerate() {
        if count > votes[best] {
            best = class;
        }
    }
    best as u32
}

/// Reference scheme: an insertion-sorted queue of the k best neighbors.
/// Seeds the queue with the first k training points, then scans the rest,
/// replacing the current worst and bubbling the newcomer into place.
pub struct SortedQueue;

impl KnnScheme for SortedQueue {
    fn classify(&self, input: &Workload, out: &mut Scratch) {
        let k = input.k;
        assert!(k <= input.train_size);
        for i in 0..input.test_size {
            let test = input.test_point(i);
            let queue = &mut out.neighbors[i * k..(i + 1) * k];
            for j in 0..k {
                queue[j] = (squared_l2(input.train_point(j), test), input.y_train[j]);
            }
            queue.sort_by(|a, b| a.0.total_cmp(&b.0));
            for j in k..input.train_size {
                let dist = squared_l2(input.train_point(j), test);
                if dist < queue[k - 1].0 {
                    queue[k - 1] = (dist, input.y_train[j]);
                    let mut idx = k - 1;
                    while idx > 0 && queue[idx].0 < queue[idx - 1].0 {
                        queue.swap(idx, idx - 1);
                        idx -= 1;
                    }
                }
            }
            let votes = &mut out.votes[i * input.classes..(i + 1) * input.classes];
            out.predictions[i] = majority_vote(queue, votes);
        }
    }

    fn name(&self) -> &'static str {
        "sorted_queue"
    }
}

/// Max-heap of (distance, label) capped at k: the top is the current worst
/// neighbor, so a closer candidate evicts it.
pub struct HeapSearch;

impl KnnScheme for HeapSearch {
    fn classify(&self, input: &Workload, out: &mut Scratch) {
        let k = input.k;
        assert!(k <= input.train_size);
        for i in 0..input.test_size {
            let test = input.test_point(i);
            let mut heap = BinaryHeap::with_capacity(k + 1);
            for j in 0..input.train_size {
                let dist = OrderedFloat(squared_l2(input.train_point(j), test));
                if heap.len() < k {
                    heap.push((dist, input.y_train[j]));
                } else if let Some(&(worst, _)) = heap.peek() {
                    if dist < worst {
                        heap.pop();
                        heap.push((dist, input.y_train[j]));
                    }
                }
            }
            let queue = &mut out.neighbors[i * k..(i + 1) * k];
            for (slot, (dist, label)) in queue.iter_mut().zip(heap.into_sorted_vec()) {
                *slot = (dist.0, label);
            }
            let votes = &mut out.votes[i * input.classes..(i + 1) * input.classes];
            out.predictions[i] = majority_vote(queue, votes);
        }
    }

    fn name(&self) -> &'static str {
        "heap"
    }
}

/// All schemes known to the harness; the CLI selects one by name.
pub fn schemes() -> Vec<&'static dyn KnnScheme> {
    vec![&SortedQueue, &HeapSearch]
}
