//! Property tests over randomized edit/undo/redo sequences.

use proptest::prelude::*;
use serde_json::json;

use cellscribe::history::mock::{MockActor, RecordingSync};
use cellscribe::{EditRequest, Supervisor};

use super::fast_config;

fn contexts() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((any::<i64>(), any::<i64>()), 1..6)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// N commits with arbitrary context changes in between, then N undos,
    /// land every actor back on its initial context.
    #[test]
    fn full_unwind_restores_initial_contexts(steps in contexts()) {
        runtime().block_on(async {
            let sync = RecordingSync::new();
            let mut supervisor = Supervisor::new(sync, fast_config());

            let viewport = MockActor::new("viewport", json!({"x": 0, "y": 0}));
            let frame = MockActor::new("frame", json!({"frame": 0}));
            supervisor.add_actor(viewport.clone());
            supervisor.add_actor(frame.clone());

            let initial = (viewport.context(), frame.context());

            for (index, (x, y)) in steps.iter().enumerate() {
                supervisor.edit(EditRequest::new("brush")).await.unwrap();
                viewport.set_context(json!({"x": x, "y": y}));
                frame.set_context(json!({"frame": index + 1}));
            }

            for _ in 0..steps.len() {
                assert!(supervisor.undo().await.unwrap());
            }

            assert_eq!(viewport.context(), initial.0);
            assert_eq!(frame.context(), initial.1);
            assert_eq!(supervisor.status().action, 0);
            assert_eq!(supervisor.status().num_actions, steps.len());
        });
    }

    /// k undos followed by k redos return every actor to the context it
    /// held at the most recent commit.
    #[test]
    fn undo_then_redo_is_an_inversion(steps in contexts(), depth in 1usize..6) {
        runtime().block_on(async {
            let sync = RecordingSync::new();
            let mut supervisor = Supervisor::new(sync, fast_config());

            let viewport = MockActor::new("viewport", json!({"x": 0, "y": 0}));
            supervisor.add_actor(viewport.clone());

            // Context changes land before the following commit, never after
            // the last one, so the final commit captures the live context.
            for (x, y) in &steps {
                viewport.set_context(json!({"x": x, "y": y}));
                supervisor.edit(EditRequest::new("brush")).await.unwrap();
            }
            let at_last_commit = viewport.context();

            let depth = depth.min(steps.len());
            for _ in 0..depth {
                assert!(supervisor.undo().await.unwrap());
            }
            for _ in 0..depth {
                assert!(supervisor.redo().await.unwrap());
            }

            assert_eq!(viewport.context(), at_last_commit);
            assert_eq!(supervisor.status().action, steps.len());
        });
    }

    /// A commit after any number of undos prunes the redo branch everywhere.
    #[test]
    fn commit_always_prunes_the_redo_branch(steps in contexts(), depth in 1usize..6) {
        runtime().block_on(async {
            let sync = RecordingSync::new();
            let mut supervisor = Supervisor::new(sync, fast_config());

            let viewport = MockActor::new("viewport", json!({"x": 0}));
            supervisor.add_actor(viewport.clone());

            for (x, _) in &steps {
                supervisor.edit(EditRequest::new("brush")).await.unwrap();
                viewport.set_context(json!({"x": x}));
            }

            let depth = depth.min(steps.len());
            for _ in 0..depth {
                assert!(supervisor.undo().await.unwrap());
            }

            supervisor.edit(EditRequest::new("flood")).await.unwrap();

            assert!(!supervisor.can_redo());
            assert!(!supervisor.redo().await.unwrap());
            let stats = supervisor.trackers()[0].stats().await.unwrap();
            assert_eq!(stats.future, 0);
            assert_eq!(stats.past, steps.len() + 1);
        });
    }
}
