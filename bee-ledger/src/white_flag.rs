// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The white-flag mutation engine contract.
//!
//! The coordinator core never computes a merkle mutation itself; it asks whatever implements
//! [`WhiteFlagEngine`] to walk the past cone of a milestone's two parent references and report back
//! a merkle root and the ordered list of messages that root commits to. The actual mutation
//! algorithm (balance diffs, conflict resolution, dust thresholds) is explicitly out of scope for
//! this workspace; [`ReferenceWhiteFlagEngine`] below is a minimal, uncontested-conflict
//! implementation that is enough to drive the coordinator end to end and to test against, not a
//! replacement for a production ledger.

use crate::{hash_function::HashFunction, Error};

use bee_message::MessageId;
use bee_tangle::Tangle;

use hashbrown::HashSet;

/// The result of a white-flag mutation computation: the merkle root committing to
/// `messages_referenced`, in the deterministic order the engine visited them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhiteFlagMutations {
    /// The merkle root over `messages_referenced`.
    pub merkle_root: Vec<u8>,
    /// Every message the milestone confirms, ordered past-cone-first (parents before children).
    pub messages_referenced: Vec<MessageId>,
}

/// A white-flag mutation engine: walks the past cone between a milestone's two parent references
/// and reports the merkle root it confirms.
pub trait WhiteFlagEngine {
    /// Computes the mutations a milestone referencing `(trunk, branch)` would confirm.
    ///
    /// Implementations read message bodies and solid-entry-point status from `tangle`; the spec's
    /// `meta_cache`/`msg_cache` parameters are the same cached handles the tangle itself owns, so a
    /// single `tangle` reference stands in for both here.
    fn compute_mutations(
        &self,
        tangle: &Tangle,
        hash_function: HashFunction,
        trunk: MessageId,
        branch: MessageId,
    ) -> Result<WhiteFlagMutations, Error>;
}

/// A minimal [`WhiteFlagEngine`] that walks the past cone of `(trunk, branch)` down to the nearest
/// solid entry points, without resolving any conflicts (there is nothing to conflict with: this
/// build carries no UTXO ledger). Every ancestor reachable without crossing a solid entry point is
/// referenced.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceWhiteFlagEngine;

impl WhiteFlagEngine for ReferenceWhiteFlagEngine {
    fn compute_mutations(
        &self,
        tangle: &Tangle,
        hash_function: HashFunction,
        trunk: MessageId,
        branch: MessageId,
    ) -> Result<WhiteFlagMutations, Error> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();

        visit(tangle, branch, &mut visited, &mut order)?;
        visit(tangle, trunk, &mut visited, &mut order)?;

        let merkle_root = hash_function.digest(&order);

        Ok(WhiteFlagMutations {
            merkle_root,
            messages_referenced: order,
        })
    }
}

/// Depth-first, parents-before-children visit of `id`'s past cone, stopping at solid entry points.
fn visit(tangle: &Tangle, id: MessageId, visited: &mut HashSet<MessageId>, order: &mut Vec<MessageId>) -> Result<(), Error> {
    if !visited.insert(id) {
        return Ok(());
    }

    if tangle.is_solid_entry_point(&id) {
        return Ok(());
    }

    let vertex = tangle.get(&id).ok_or_else(|| {
        log::warn!("white-flag walk hit missing ancestor {id}");
        Error::MutationComputationFailed(format!("missing ancestor {id}"))
    })?;

    let parents: Vec<MessageId> = vertex.message().parents().iter().copied().collect();
    for parent in parents {
        visit(tangle, parent, visited, order)?;
    }

    order.push(id);
    Ok(())
}
