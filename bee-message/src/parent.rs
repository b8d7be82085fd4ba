// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The parents module defines the core data type for storing the messages directly approved by a message.

use crate::{Error, MessageId};

use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable};

use derive_more::Deref;

use core::ops::RangeInclusive;
use std::vec::Vec;

/// A [`Message`](crate::Message)'s [`Parents`] are the [`MessageId`]s of the messages it directly approves.
///
/// Parents must be:
/// * in the [`Parents::COUNT_RANGE`] range;
/// * lexicographically sorted;
/// * unique;
#[derive(Clone, Debug, Eq, PartialEq, Deref)]
#[deref(forward)]
pub struct Parents(Vec<MessageId>);

impl Parents {
    /// The range representing the valid number of parents.
    pub const COUNT_RANGE: RangeInclusive<u8> = 1..=8;

    /// Creates new [`Parents`], sorting and deduplicating the given ids.
    pub fn new(mut inner: Vec<MessageId>) -> Result<Self, Error> {
        inner.sort_unstable();
        inner.dedup();

        if inner.is_empty() {
            return Err(Error::MessageWithoutParents);
        }

        if inner.len() > *Self::COUNT_RANGE.end() as usize {
            return Err(Error::TooManyParents {
                max: *Self::COUNT_RANGE.end() as usize,
                found: inner.len(),
            });
        }

        Ok(Self(inner))
    }

    /// Creates new [`Parents`] from ids that are already sorted and deduplicated, rejecting them
    /// otherwise instead of silently fixing them up.
    pub fn from_sorted(inner: Vec<MessageId>) -> Result<Self, Error> {
        if inner.is_empty() {
            return Err(Error::MessageWithoutParents);
        }
        if inner.len() > *Self::COUNT_RANGE.end() as usize {
            return Err(Error::TooManyParents {
                max: *Self::COUNT_RANGE.end() as usize,
                found: inner.len(),
            });
        }
        for window in inner.windows(2) {
            match window[0].cmp(&window[1]) {
                core::cmp::Ordering::Less => {}
                core::cmp::Ordering::Equal => return Err(Error::DuplicateParent(window[0])),
                core::cmp::Ordering::Greater => return Err(Error::ParentsNotUniqueSorted),
            }
        }
        Ok(Self(inner))
    }

    /// Returns the number of parents.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns an iterator over the parents.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MessageId> + '_ {
        self.0.iter()
    }
}

impl Packable for Parents {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        packer.pack_bytes([self.0.len() as u8])?;
        for id in &self.0 {
            id.pack(packer)?;
        }
        Ok(())
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut count = [0u8];
        unpacker.unpack_bytes(&mut count)?;
        let count = count[0] as usize;

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(MessageId::unpack::<_, VERIFY>(unpacker, visitor)?);
        }

        if VERIFY {
            Self::from_sorted(ids).map_err(UnpackError::Packable)
        } else {
            Ok(Self(ids))
        }
    }
}
