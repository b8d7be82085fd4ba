// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A crate that provides common functionalities shared across multiple crates within the Bee framework, and for
//! applications built on-top.

#![warn(missing_docs)]

pub mod logger;
pub mod time;
