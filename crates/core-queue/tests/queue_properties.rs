//! Property-based tests for queue ordering semantics.

use core_model::{Command, CommandKind, Percent, Priority};
use core_queue::CommandQueue;
use proptest::prelude::*;

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

fn cmd(priority: Priority, seq: usize) -> Command {
    // client_id carries the submission sequence number for the assertions
    Command::new(
        CommandKind::ShowProgress {
            percentage: Percent::new(50),
        },
        priority,
        seq as u64,
    )
}

proptest! {
    // Popping everything yields commands sorted by descending priority, and
    // stable (submission-ordered) within each priority.
    #[test]
    fn drain_order_is_priority_then_fifo(priorities in prop::collection::vec(arb_priority(), 0..40)) {
        let queue = CommandQueue::with_capacity(64);
        for (seq, priority) in priorities.iter().enumerate() {
            queue.push(cmd(*priority, seq)).unwrap();
        }

        let mut drained = Vec::new();
        while let Some(command) = queue.try_pop() {
            drained.push(command);
        }
        prop_assert_eq!(drained.len(), priorities.len());

        for pair in drained.windows(2) {
            // never ascending priority
            prop_assert!(pair[0].priority >= pair[1].priority);
            // stable within a priority
            if pair[0].priority == pair[1].priority {
                prop_assert!(pair[0].client_id < pair[1].client_id);
            }
        }
    }

    // A command never jumps ahead of a strictly higher-priority command that
    // was already queued when it arrived.
    #[test]
    fn no_priority_inversion_at_the_head(
        earlier in arb_priority(),
        later in arb_priority(),
    ) {
        let queue = CommandQueue::with_capacity(8);
        queue.push(cmd(earlier, 0)).unwrap();
        queue.push(cmd(later, 1)).unwrap();
        let first = queue.try_pop().unwrap();
        if later > earlier {
            prop_assert_eq!(first.client_id, 1);
        } else {
            prop_assert_eq!(first.client_id, 0);
        }
    }
}
