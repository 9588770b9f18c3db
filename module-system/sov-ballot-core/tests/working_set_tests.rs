use sov_ballot_core::{
    MemoryStorage, Prefix, StateMap, StateValue, StateVec, Storage, WorkingSet,
};

fn commit(working_set: WorkingSet<MemoryStorage>) {
    let storage = working_set.backing().clone();
    let mut checkpoint = working_set.checkpoint();
    storage.commit(checkpoint.freeze());
}

#[test]
fn checkpoint_makes_writes_durable() {
    let storage = MemoryStorage::new();
    let value = StateValue::<u64>::new(Prefix::new(b"counter".to_vec()));

    let mut working_set = WorkingSet::new(storage.clone());
    value.set(&3, &mut working_set);
    commit(working_set);

    let mut working_set = WorkingSet::new(storage);
    assert_eq!(value.get(&mut working_set), Some(3));
}

#[test]
fn revert_drops_writes_and_events() {
    let storage = MemoryStorage::new();
    let map = StateMap::<u8, String>::new(Prefix::new(b"map/".to_vec()));
    let flag = StateValue::<bool>::new(Prefix::new(b"flag".to_vec()));

    let mut working_set = WorkingSet::new(storage.clone());
    map.set(&1, &"kept".to_owned(), &mut working_set);
    flag.set(&true, &mut working_set);
    let mut working_set = working_set.checkpoint().to_revertable();

    map.set(&2, &"dropped".to_owned(), &mut working_set);
    flag.delete(&mut working_set);
    working_set.add_event("Dropped", &2u8);
    assert_eq!(working_set.events().len(), 1);

    let mut checkpoint = working_set.revert();
    storage.commit(checkpoint.freeze());

    let mut working_set = WorkingSet::new(storage.clone());
    assert_eq!(map.get(&1, &mut working_set).as_deref(), Some("kept"));
    assert_eq!(map.get(&2, &mut working_set), None);
    assert_eq!(flag.get(&mut working_set), Some(true));
    assert!(working_set.events().is_empty());
    assert_eq!(storage.len(), 2);
}

#[test]
fn uncommitted_writes_are_invisible_to_other_readers() {
    let storage = MemoryStorage::new();
    let vec = StateVec::<u32>::new(Prefix::new(b"vec/".to_vec()));

    let mut writer = WorkingSet::new(storage.clone());
    vec.push(&10, &mut writer);

    let mut reader = WorkingSet::new(storage.clone());
    assert_eq!(vec.len(&mut reader), 0);

    commit(writer);
    let mut reader = WorkingSet::new(storage);
    assert_eq!(vec.iter(&mut reader).collect::<Vec<_>>(), vec![10]);
}

#[test]
fn events_are_decoded_back_to_their_type() {
    let mut working_set = WorkingSet::new(MemoryStorage::new());
    working_set.add_event("Pair", &(7u64, "seven".to_owned()));

    let events = working_set.take_events();
    assert!(working_set.events().is_empty());
    assert_eq!(events[0].key(), "Pair");
    let decoded: (u64, String) = events[0].decode().unwrap();
    assert_eq!(decoded, (7, "seven".to_owned()));
}

#[derive(Debug, Clone)]
enum VecOp {
    Push(u32),
    Set(u64, u32),
    Commit,
    Revert,
}

fn arb_vec_op() -> impl proptest::strategy::Strategy<Value = VecOp> {
    use proptest::prelude::*;
    prop_oneof![
        any::<u32>().prop_map(VecOp::Push),
        (0..8u64, any::<u32>()).prop_map(|(i, v)| VecOp::Set(i, v)),
        Just(VecOp::Commit),
        Just(VecOp::Revert),
    ]
}

proptest::proptest! {
    #[test]
    fn state_vec_matches_a_vec_across_commits_and_reverts(
        ops in proptest::collection::vec(arb_vec_op(), 1..64)
    ) {
        let storage = MemoryStorage::new();
        let state_vec = StateVec::<u32>::new(Prefix::new(b"model/".to_vec()));
        let mut committed: Vec<u32> = Vec::new();
        let mut pending = committed.clone();
        let mut working_set = WorkingSet::new(storage.clone());

        for op in ops {
            match op {
                VecOp::Push(v) => {
                    state_vec.push(&v, &mut working_set);
                    pending.push(v);
                }
                VecOp::Set(i, v) => {
                    let result = state_vec.set(i, &v, &mut working_set);
                    match pending.get_mut(i as usize) {
                        Some(slot) => {
                            assert!(result.is_ok());
                            *slot = v;
                        }
                        None => assert!(result.is_err()),
                    }
                }
                VecOp::Commit => {
                    commit(working_set);
                    committed = pending.clone();
                    working_set = WorkingSet::new(storage.clone());
                }
                VecOp::Revert => {
                    let mut checkpoint = working_set.revert();
                    storage.commit(checkpoint.freeze());
                    pending = committed.clone();
                    working_set = WorkingSet::new(storage.clone());
                }
            }
            assert_eq!(state_vec.iter(&mut working_set).collect::<Vec<_>>(), pending);
        }
    }
}
