// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use bee_message::{parent::Parents, Message, MessageId};
use bee_tangle::{visit_children_follow, AbortHandle, MessageMetadata, Tangle};

// a   b
// |\ /
// | c
// |/|
// d |
//  \|
//   e
fn diamond_tangle() -> (Tangle, [MessageId; 5]) {
    let tangle = Tangle::new();

    let a = Message::build(Parents::new(vec![MessageId::NULL]).unwrap()).finish().unwrap();
    let b = Message::build(Parents::new(vec![MessageId::from([1u8; 32])]).unwrap())
        .finish()
        .unwrap();
    let a_id = a.id();
    let b_id = b.id();

    let c = Message::build(Parents::new(vec![a_id, b_id]).unwrap()).finish().unwrap();
    let c_id = c.id();

    let d = Message::build(Parents::new(vec![a_id, c_id]).unwrap()).finish().unwrap();
    let d_id = d.id();

    let e = Message::build(Parents::new(vec![c_id, d_id]).unwrap()).finish().unwrap();
    let e_id = e.id();

    for (id, message) in [(a_id, a), (b_id, b), (c_id, c), (d_id, d), (e_id, e)] {
        tangle.insert(id, message, MessageMetadata::new(0));
    }

    (tangle, [a_id, b_id, c_id, d_id, e_id])
}

#[test]
fn future_cone_of_a_reaches_every_reconverging_descendant() {
    let (tangle, [a_id, _b_id, c_id, d_id, e_id]) = diamond_tangle();

    let mut visited = Vec::new();
    visit_children_follow(&tangle, a_id, false, &AbortHandle::new(), |_, _| true, |id, _, _| {
        visited.push(*id)
    })
    .unwrap();

    assert_eq!(visited[0], a_id);
    assert!(visited.contains(&c_id));
    assert!(visited.contains(&d_id));
    assert!(visited.contains(&e_id));
    // e is reachable through both c and d but must only be visited once when deduplicating.
    assert_eq!(visited.iter().filter(|id| **id == e_id).count(), 1);
}

#[test]
fn walk_already_discovered_revisits_reconverging_descendants() {
    let (tangle, [a_id, _b_id, _c_id, _d_id, e_id]) = diamond_tangle();

    let mut visited = Vec::new();
    visit_children_follow(&tangle, a_id, true, &AbortHandle::new(), |_, _| true, |id, _, _| {
        visited.push(*id)
    })
    .unwrap();

    // With deduplication disabled, e is reached once via c and once via d.
    assert_eq!(visited.iter().filter(|id| **id == e_id).count(), 2);
}
