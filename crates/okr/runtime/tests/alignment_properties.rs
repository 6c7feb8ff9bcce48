//! Property tests over random alignment forests

use okr_runtime::okr_types::{
    CommitmentLevel, KeyResult, KeyResultId, Objective, ObjectiveId, ObjectiveType, OwnerRef,
};
use okr_runtime::{children, descendants, key_result_progress, plan_deletion, EntityStore};
use okr_runtime::okr_types::{Team, TeamId};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Each objective may only align under an earlier one, so the result is
/// always a forest.
fn arb_forest() -> impl Strategy<Value = Vec<Objective>> {
    prop::collection::vec(any::<prop::sample::Index>(), 1..40).prop_flat_map(|picks| {
        let n = picks.len();
        prop::collection::vec(any::<bool>(), n).prop_map(move |is_root| {
            (0..n)
                .map(|i| {
                    let mut objective = Objective::new(
                        ObjectiveId::new(format!("o{}", i)),
                        format!("Objective {}", i),
                        OwnerRef::team("t1"),
                        ObjectiveType::Team,
                        CommitmentLevel::Committed,
                        "Q3 2024",
                    );
                    if i > 0 && !is_root[i] {
                        let parent = picks[i].index(i);
                        objective.parent_id = Some(ObjectiveId::new(format!("o{}", parent)));
                    }
                    objective
                })
                .collect()
        })
    })
}

fn store_for(forest: Vec<Objective>) -> EntityStore {
    EntityStore::from_parts(forest, vec![], vec![Team::new(TeamId::new("t1"), "Core")])
        .expect("generated forest is valid")
}

fn ids(objectives: &[Objective]) -> BTreeSet<ObjectiveId> {
    objectives.iter().map(|o| o.id.clone()).collect()
}

proptest! {
    #[test]
    fn deletion_removes_exactly_the_subtree(
        forest in arb_forest(),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = forest[pick.index(forest.len())].id.clone();
        let mut store = store_for(forest);
        let original = ids(store.objectives());

        let mut expected: BTreeSet<ObjectiveId> = descendants(&target, store.objectives())
            .unwrap()
            .into_iter()
            .map(|o| o.id.clone())
            .collect();
        expected.insert(target.clone());

        let plan = plan_deletion(&target, store.objectives()).unwrap();
        store.commit_deletion(plan).unwrap();

        let left = ids(store.objectives());
        let wanted: BTreeSet<ObjectiveId> = original.difference(&expected).cloned().collect();
        prop_assert_eq!(left, wanted);

        // Nothing left points at a removed objective
        for objective in store.objectives() {
            if let Some(parent) = &objective.parent_id {
                prop_assert!(!expected.contains(parent));
            }
        }
    }

    #[test]
    fn traversal_is_deterministic(
        forest in arb_forest(),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = forest[pick.index(forest.len())].id.clone();

        let first: Vec<ObjectiveId> = descendants(&target, &forest).unwrap().iter().map(|o| o.id.clone()).collect();
        let second: Vec<ObjectiveId> = descendants(&target, &forest).unwrap().iter().map(|o| o.id.clone()).collect();
        prop_assert_eq!(first, second);

        let a: Vec<&ObjectiveId> = children(&target, &forest).iter().map(|o| &o.id).collect();
        let b: Vec<&ObjectiveId> = children(&target, &forest).iter().map(|o| &o.id).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn descendants_never_repeat(forest in arb_forest()) {
        for objective in &forest {
            let below = descendants(&objective.id, &forest).unwrap();
            let unique: BTreeSet<&ObjectiveId> = below.iter().map(|o| &o.id).collect();
            prop_assert_eq!(unique.len(), below.len());
            prop_assert!(!unique.contains(&objective.id));
        }
    }

    #[test]
    fn zero_target_always_scores_full(current in -1.0e9f64..1.0e9) {
        let kr = KeyResult::new(KeyResultId::new("kr"), "Anything", current, 0.0, "%");
        prop_assert_eq!(key_result_progress(&kr), 100.0);
    }
}
