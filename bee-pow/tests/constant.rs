// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use bee_pow::providers::{ConstantBuilder, NonceProvider, NonceProviderBuilder};

#[test]
fn constant_provide() {
    let constant = ConstantBuilder::new().with_value(42).finish();

    assert_eq!(constant.nonce(&[0u8; 8], 4000.0).unwrap(), 42);
}

#[test]
fn u64_provides_itself() {
    let nonce: u64 = 42;

    assert_eq!(nonce.nonce(&[0u8; 8], 4000.0).unwrap(), 42);
}
