mod common;

use common::*;
use cs_core::WagonId;
use cs_engine::calculate;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Create(Option<u32>),
    Delete(usize),
    Clone(usize, u32),
    Reverse,
    Rotate(usize),
    BadReorder,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        proptest::option::of(0u32..10).prop_map(Action::Create),
        (0usize..10).prop_map(Action::Delete),
        ((0usize..10), (0u32..4)).prop_map(|(i, k)| Action::Clone(i, k)),
        Just(Action::Reverse),
        (0usize..10).prop_map(Action::Rotate),
        Just(Action::BadReorder),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn positions_are_always_one_to_n(actions in proptest::collection::vec(action(), 1..30)) {
        let depot = depot();
        let train = new_train(&depot, "prop");

        for action in actions {
            let before = depot.wagons().list_wagons(train).unwrap();
            let pick = |i: usize| before.get(i).map(|w| w.id);

            let accepted = match action {
                Action::Create(position) => {
                    let payload = cs_model::NewWagon { position, spec: spec(14.0, 20.0, 3.0, 19.0) };
                    depot.wagons().create_wagon(train, payload).is_ok()
                }
                Action::Delete(i) => match pick(i) {
                    Some(id) => depot.wagons().delete_wagon(train, id).is_ok(),
                    None => false,
                },
                Action::Clone(i, k) => match pick(i) {
                    Some(id) => {
                        let result = depot.wagons().clone_wagon(train, id, k);
                        if let Ok(copies) = &result {
                            prop_assert_eq!(copies.len(), k as usize);
                        }
                        result.is_ok()
                    }
                    None => false,
                },
                Action::Reverse => {
                    let mut ids = order(&before);
                    ids.reverse();
                    depot.wagons().reorder_wagons(train, &ids).is_ok()
                }
                Action::Rotate(n) => {
                    let mut ids = order(&before);
                    if !ids.is_empty() {
                        let len = ids.len();
                        ids.rotate_left(n % len);
                    }
                    depot.wagons().reorder_wagons(train, &ids).is_ok()
                }
                Action::BadReorder => {
                    let mut ids = order(&before);
                    ids.push(WagonId::new(1_000_000).unwrap());
                    depot.wagons().reorder_wagons(train, &ids).is_ok()
                }
            };

            let after = depot.wagons().list_wagons(train).unwrap();
            let expected: Vec<u32> = (1..=after.len() as u32).collect();
            prop_assert_eq!(positions(&after), expected);
            if !accepted {
                prop_assert_eq!(&after, &before);
            }
            prop_assert_eq!(depot.wagons().calculate(train).unwrap(), calculate(&after));
        }
    }
}
