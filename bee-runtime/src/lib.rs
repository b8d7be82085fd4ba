// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Runtime components and utilities for the bee framework: a typed, retain/release-tracked
//! resource handle and an event bus.

pub mod event;
pub mod node;
