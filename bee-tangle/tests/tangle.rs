// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use bee_message::{parent::Parents, Message, MessageId};
use bee_tangle::{MessageMetadata, Tangle};

#[test]
fn get_none() {
    let tangle = Tangle::new();
    assert!(tangle.get(&MessageId::NULL).is_none());
}

#[test]
fn insert_get() {
    let message = Message::build(Parents::new(vec![MessageId::NULL]).unwrap())
        .finish()
        .unwrap();
    let message_id = message.id();

    let tangle = Tangle::new();
    tangle.insert(message_id, message.clone(), MessageMetadata::new(42));

    let cached = tangle.get(&message_id).unwrap();
    assert_eq!(cached.message(), &message);
    assert_eq!(cached.metadata().arrival_timestamp(), 42);
}

#[test]
fn repeated_insert_keeps_first_metadata() {
    let message = Message::build(Parents::new(vec![MessageId::NULL]).unwrap())
        .finish()
        .unwrap();
    let message_id = message.id();

    let tangle = Tangle::new();
    tangle.insert(message_id, message.clone(), MessageMetadata::new(1));
    tangle.insert(message_id, message, MessageMetadata::new(2));

    assert_eq!(tangle.len(), 1);
    assert_eq!(tangle.get(&message_id).unwrap().metadata().arrival_timestamp(), 1);
}

#[test]
fn metadata_mutation_is_visible_through_every_handle() {
    let message = Message::build(Parents::new(vec![MessageId::NULL]).unwrap())
        .finish()
        .unwrap();
    let message_id = message.id();

    let tangle = Tangle::new();
    let first_handle = tangle.insert(message_id, message, MessageMetadata::new(0));
    let second_handle = tangle.get(&message_id).unwrap();

    first_handle.with_metadata(|metadata| metadata.solidify(100));

    assert!(second_handle.metadata().is_solid());
}
