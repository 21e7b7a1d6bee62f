//! Property-based tests for the two-lane printing queue

use cyder::console::{Lane, PrintQueue};
use cyder::models::Printable;
use proptest::prelude::*;

fn lane() -> impl Strategy<Value = Lane> {
    prop_oneof![Just(Lane::Priority), Just(Lane::Regular)]
}

proptest! {
    #[test]
    fn test_priority_drains_before_regular_and_each_lane_is_fifo(
        lanes in prop::collection::vec(lane(), 0..64),
    ) {
        let queue = PrintQueue::new();
        for (i, lane) in lanes.iter().enumerate() {
            queue.push(*lane, Printable::text(i.to_string()));
        }

        let mut popped = Vec::new();
        while let Some((lane, item)) = queue.pop() {
            popped.push((lane, item.to_string()));
            queue.complete();
        }

        let expected: Vec<(Lane, String)> = lanes
            .iter()
            .enumerate()
            .filter(|(_, lane)| **lane == Lane::Priority)
            .chain(lanes.iter().enumerate().filter(|(_, lane)| **lane == Lane::Regular))
            .map(|(i, lane)| (*lane, i.to_string()))
            .collect();
        prop_assert_eq!(popped, expected);
        prop_assert!(queue.is_idle());
        prop_assert_eq!(queue.completed(), lanes.len() as u64);
    }

    #[test]
    fn test_outstanding_counts_in_flight(
        pushes in 1usize..32,
        pops in 0usize..32,
    ) {
        let queue = PrintQueue::new();
        for i in 0..pushes {
            queue.push(Lane::Regular, Printable::text(i.to_string()));
        }
        let taken = pops.min(pushes);
        for _ in 0..taken {
            prop_assert!(queue.pop().is_some());
        }
        // Popped but not completed items still count
        prop_assert_eq!(queue.outstanding(), pushes);
        prop_assert_eq!(queue.len(), pushes - taken);
    }
}
