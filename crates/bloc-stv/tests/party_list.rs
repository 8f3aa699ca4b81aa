use std::collections::BTreeMap;

use bloc_core::SlateId;
use bloc_stv::party_list_seats;

fn votes(entries: &[(&str, u64)]) -> BTreeMap<SlateId, u64> {
    entries
        .iter()
        .map(|(slate, count)| (SlateId::new(*slate), *count))
        .collect()
}

#[test]
fn allocation_is_idempotent_and_exact() {
    let votes = votes(&[("Democrat", 412), ("Progressive", 388), ("Republican", 200)]);
    let first = party_list_seats(&votes, 5).unwrap();
    let second = party_list_seats(&votes, 5).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.values().sum::<u64>(), 5);
    assert_eq!(first[&SlateId::new("Democrat")], 2);
    assert_eq!(first[&SlateId::new("Progressive")], 2);
    assert_eq!(first[&SlateId::new("Republican")], 1);
}

#[test]
fn slates_without_votes_keep_zero_seats() {
    let seats = party_list_seats(&votes(&[("A", 10), ("B", 0)]), 3).unwrap();
    assert_eq!(seats[&SlateId::new("A")], 3);
    assert_eq!(seats[&SlateId::new("B")], 0);
    assert!(party_list_seats(&votes(&[("A", 0)]), 3).is_err());
}
