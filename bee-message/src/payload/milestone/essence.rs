// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::{
    payload::milestone::{MerkleRoot, MilestoneIndex},
    Error, MessageId,
};

use crypto::hashes::{blake2b::Blake2b256, Digest};
use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable, PackableExt};

/// The signed part of a [`MilestonePayload`](super::MilestonePayload): the trunk/branch
/// references and the merkle root of the mutations they confirm.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MilestoneEssence {
    index: MilestoneIndex,
    timestamp: i64,
    trunk: MessageId,
    branch: MessageId,
    merkle_root: MerkleRoot,
}

impl MilestoneEssence {
    /// Creates a new [`MilestoneEssence`].
    pub fn new(
        index: MilestoneIndex,
        timestamp: i64,
        trunk: MessageId,
        branch: MessageId,
        merkle_root: MerkleRoot,
    ) -> Self {
        Self {
            index,
            timestamp,
            trunk,
            branch,
            merkle_root,
        }
    }

    /// Returns the index of this [`MilestoneEssence`].
    pub fn index(&self) -> MilestoneIndex {
        self.index
    }

    /// Returns the timestamp of this [`MilestoneEssence`], in Unix seconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the trunk reference of this [`MilestoneEssence`].
    pub fn trunk(&self) -> &MessageId {
        &self.trunk
    }

    /// Returns the branch reference of this [`MilestoneEssence`].
    pub fn branch(&self) -> &MessageId {
        &self.branch
    }

    /// Returns the merkle root of this [`MilestoneEssence`].
    pub fn merkle_root(&self) -> &MerkleRoot {
        &self.merkle_root
    }

    /// Hashes the canonical serialization of this essence, i.e. the message that gets signed.
    pub fn hash(&self) -> [u8; 32] {
        Blake2b256::digest(&self.pack_to_vec()).into()
    }
}

impl Packable for MilestoneEssence {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        packer.pack_bytes(self.index.0.to_le_bytes())?;
        packer.pack_bytes(self.timestamp.to_le_bytes())?;
        self.trunk.pack(packer)?;
        self.branch.pack(packer)?;
        self.merkle_root.pack(packer)?;

        Ok(())
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut index_bytes = [0u8; 4];
        unpacker.unpack_bytes(&mut index_bytes)?;
        let index = MilestoneIndex::new(u32::from_le_bytes(index_bytes));

        let mut timestamp_bytes = [0u8; 8];
        unpacker.unpack_bytes(&mut timestamp_bytes)?;
        let timestamp = i64::from_le_bytes(timestamp_bytes);

        let trunk = MessageId::unpack::<_, VERIFY>(unpacker, visitor)?;
        let branch = MessageId::unpack::<_, VERIFY>(unpacker, visitor)?;
        let merkle_root = MerkleRoot::unpack::<_, VERIFY>(unpacker, visitor)?;

        Ok(Self {
            index,
            timestamp,
            trunk,
            branch,
            merkle_root,
        })
    }
}
