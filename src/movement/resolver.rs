//! Movement conflict resolution.
//!
//! Decides which of a batch of simultaneous single-cell moves happen. The
//! result depends only on the *set* of proposals and the occupancy
//! snapshot, never on the order proposals are listed in:
//!
//! 1. Two or more proposals into the same cell all fail (`Contested`).
//! 2. Two movers trading cells both fail (`Swap`); entities never pass
//!    through each other.
//! 3. Every remaining proposal is a candidate. A candidate whose target is
//!    held by an entity that is not itself a candidate fails
//!    (`BlockedBy`). Repeat until nothing changes.
//!
//! What survives step 3 is the largest set of moves in which every target
//! is either empty or being vacated by another accepted move. There is no
//! pushing: a stationary occupant always blocks.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{EntityId, Position};

/// One entity's proposed unit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Proposal {
    pub entity: EntityId,
    pub from: Position,
    pub to: Position,
}

impl Proposal {
    pub const fn new(entity: EntityId, from: Position, to: Position) -> Self {
        Self { entity, from, to }
    }
}

/// Why a proposal was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Another mover wanted the same cell.
    Contested,
    /// The occupant of the target wanted this mover's cell.
    Swap(EntityId),
    /// The occupant of the target is not leaving.
    BlockedBy(EntityId),
}

/// Outcome of one resolution, both lists sorted by entity id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub accepted: Vec<Proposal>,
    pub rejected: Vec<(Proposal, Rejection)>,
}

impl Resolution {
    pub fn is_accepted(&self, entity: EntityId) -> bool {
        self.accepted.iter().any(|p| p.entity == entity)
    }

    pub fn rejection(&self, entity: EntityId) -> Option<Rejection> {
        self.rejected.iter().find(|(p, _)| p.entity == entity).map(|(_, r)| *r)
    }
}

/// Arbitrates simultaneous moves against an occupancy snapshot.
pub struct ConflictResolver;

impl ConflictResolver {
    /// Resolve a batch of proposals.
    ///
    /// `occupancy` is the cell → entity index before any move of this
    /// instant. Each entity should propose at most one move; extra
    /// proposals for the same entity are ignored.
    pub fn resolve(occupancy: &FxHashMap<Position, EntityId>, proposals: &[Proposal]) -> Resolution {
        let mut unique: Vec<Proposal> = Vec::with_capacity(proposals.len());
        let mut seen = FxHashSet::default();
        let mut sorted = proposals.to_vec();
        sorted.sort_by_key(|p| (p.entity, p.to));
        for proposal in sorted {
            if seen.insert(proposal.entity) {
                unique.push(proposal);
            } else {
                log::warn!("ignoring extra proposal for {}", proposal.entity);
            }
        }

        let mut rejected: Vec<(Proposal, Rejection)> = Vec::new();

        // 1. contested targets
        let mut demand: FxHashMap<Position, usize> = FxHashMap::default();
        for proposal in &unique {
            *demand.entry(proposal.to).or_default() += 1;
        }
        let (contested, mut candidates): (Vec<Proposal>, Vec<Proposal>) =
            unique.into_iter().partition(|p| demand[&p.to] > 1);
        rejected.extend(contested.into_iter().map(|p| (p, Rejection::Contested)));

        // 2. swaps
        let targets: FxHashMap<EntityId, Position> = candidates.iter().map(|p| (p.entity, p.to)).collect();
        candidates.retain(|p| match occupancy.get(&p.to) {
            Some(&occupant) if occupant != p.entity && targets.get(&occupant) == Some(&p.from) => {
                rejected.push((*p, Rejection::Swap(occupant)));
                false
            }
            _ => true,
        });

        // 3. greatest fixed point
        loop {
            let moving: FxHashSet<EntityId> = candidates.iter().map(|p| p.entity).collect();
            let before = candidates.len();
            candidates.retain(|p| match occupancy.get(&p.to) {
                Some(&occupant) if occupant != p.entity && !moving.contains(&occupant) => {
                    rejected.push((*p, Rejection::BlockedBy(occupant)));
                    false
                }
                _ => true,
            });
            if candidates.len() == before {
                break;
            }
        }

        rejected.sort_by_key(|(p, _)| p.entity);
        for (proposal, reason) in &rejected {
            log::trace!("{} -> {} rejected: {:?}", proposal.entity, proposal.to, reason);
        }
        Resolution {
            accepted: candidates,
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u32) -> EntityId {
        EntityId::new(n)
    }

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn occupancy(entries: &[(i32, i32, u32)]) -> FxHashMap<Position, EntityId> {
        entries.iter().map(|&(x, y, e)| (pos(x, y), id(e))).collect()
    }

    #[test]
    fn test_empty_target_accepted() {
        let occ = occupancy(&[(0, 0, 0)]);
        let res = ConflictResolver::resolve(&occ, &[Proposal::new(id(0), pos(0, 0), pos(0, 1))]);
        assert!(res.is_accepted(id(0)));
        assert!(res.rejected.is_empty());
    }

    #[test]
    fn test_stationary_occupant_blocks() {
        let occ = occupancy(&[(2, 2, 0), (3, 2, 1)]);
        let res = ConflictResolver::resolve(&occ, &[Proposal::new(id(0), pos(2, 2), pos(3, 2))]);
        assert!(res.accepted.is_empty());
        assert_eq!(res.rejection(id(0)), Some(Rejection::BlockedBy(id(1))));
    }

    #[test]
    fn test_follow_the_leader() {
        // 0 -> 1 -> 2 -> empty: the whole line advances
        let occ = occupancy(&[(0, 0, 0), (1, 0, 1), (2, 0, 2)]);
        let proposals = [
            Proposal::new(id(0), pos(0, 0), pos(1, 0)),
            Proposal::new(id(1), pos(1, 0), pos(2, 0)),
            Proposal::new(id(2), pos(2, 0), pos(3, 0)),
        ];
        let res = ConflictResolver::resolve(&occ, &proposals);
        assert_eq!(res.accepted.len(), 3);
    }

    #[test]
    fn test_blocked_leader_blocks_chain() {
        // leader runs into a stationary robot; everyone behind stays put
        let occ = occupancy(&[(0, 0, 0), (1, 0, 1), (2, 0, 2), (3, 0, 9)]);
        let proposals = [
            Proposal::new(id(0), pos(0, 0), pos(1, 0)),
            Proposal::new(id(1), pos(1, 0), pos(2, 0)),
            Proposal::new(id(2), pos(2, 0), pos(3, 0)),
        ];
        let res = ConflictResolver::resolve(&occ, &proposals);
        assert!(res.accepted.is_empty());
        assert_eq!(res.rejection(id(2)), Some(Rejection::BlockedBy(id(9))));
        assert_eq!(res.rejection(id(1)), Some(Rejection::BlockedBy(id(2))));
        assert_eq!(res.rejection(id(0)), Some(Rejection::BlockedBy(id(1))));
    }

    #[test]
    fn test_contested_cell() {
        let occ = occupancy(&[(0, 1, 0), (2, 1, 1)]);
        let proposals = [
            Proposal::new(id(0), pos(0, 1), pos(1, 1)),
            Proposal::new(id(1), pos(2, 1), pos(1, 1)),
        ];
        let res = ConflictResolver::resolve(&occ, &proposals);
        assert!(res.accepted.is_empty());
        assert_eq!(res.rejection(id(0)), Some(Rejection::Contested));
        assert_eq!(res.rejection(id(1)), Some(Rejection::Contested));
    }

    #[test]
    fn test_swap_rejected() {
        let occ = occupancy(&[(0, 0, 0), (1, 0, 1)]);
        let proposals = [
            Proposal::new(id(0), pos(0, 0), pos(1, 0)),
            Proposal::new(id(1), pos(1, 0), pos(0, 0)),
        ];
        let res = ConflictResolver::resolve(&occ, &proposals);
        assert!(res.accepted.is_empty());
        assert_eq!(res.rejection(id(0)), Some(Rejection::Swap(id(1))));
    }

    #[test]
    fn test_rotation_cycle_moves() {
        // four robots going round a 2x2 square
        let occ = occupancy(&[(0, 0, 0), (1, 0, 1), (1, 1, 2), (0, 1, 3)]);
        let proposals = [
            Proposal::new(id(0), pos(0, 0), pos(1, 0)),
            Proposal::new(id(1), pos(1, 0), pos(1, 1)),
            Proposal::new(id(2), pos(1, 1), pos(0, 1)),
            Proposal::new(id(3), pos(0, 1), pos(0, 0)),
        ];
        let res = ConflictResolver::resolve(&occ, &proposals);
        assert_eq!(res.accepted.len(), 4);
    }

    #[test]
    fn test_contested_mover_still_blocks_follower() {
        // 0 and 1 fight over (1,1); 2 wanted 0's cell and stays too
        let occ = occupancy(&[(0, 1, 0), (2, 1, 1), (0, 0, 2)]);
        let proposals = [
            Proposal::new(id(0), pos(0, 1), pos(1, 1)),
            Proposal::new(id(1), pos(2, 1), pos(1, 1)),
            Proposal::new(id(2), pos(0, 0), pos(0, 1)),
        ];
        let res = ConflictResolver::resolve(&occ, &proposals);
        assert!(res.accepted.is_empty());
        assert_eq!(res.rejection(id(2)), Some(Rejection::BlockedBy(id(0))));
    }

    // === Properties ===

    /// Robots on a 4x4 grid, each proposing one unit step.
    fn scenario() -> impl Strategy<Value = (FxHashMap<Position, EntityId>, Vec<Proposal>, Vec<usize>)> {
        let cells: Vec<Position> = (0..4).flat_map(|x| (0..4).map(move |y| pos(x, y))).collect();
        prop::sample::subsequence(cells, 1..10).prop_flat_map(|occupied| {
            let n = occupied.len();
            (
                Just(occupied),
                prop::collection::vec((any::<bool>(), 0usize..4), n),
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
            )
                .prop_map(|(occupied, moves, order)| {
                    let occ: FxHashMap<Position, EntityId> = occupied
                        .iter()
                        .enumerate()
                        .map(|(i, p)| (*p, id(i as u32)))
                        .collect();
                    let proposals: Vec<Proposal> = occupied
                        .iter()
                        .enumerate()
                        .zip(moves)
                        .filter(|(_, (moving, _))| *moving)
                        .map(|((i, from), (_, dir))| {
                            let direction = crate::core::Direction::ALL[dir];
                            Proposal::new(id(i as u32), *from, from.step(direction))
                        })
                        .collect();
                    (occ, proposals, order)
                })
        })
    }

    proptest! {
        #[test]
        fn order_does_not_matter((occ, proposals, order) in scenario()) {
            let mut shuffled: Vec<Proposal> = order
                .iter()
                .filter_map(|i| proposals.get(*i).copied())
                .collect();
            shuffled.reverse();

            prop_assert_eq!(
                ConflictResolver::resolve(&occ, &proposals),
                ConflictResolver::resolve(&occ, &shuffled)
            );
        }

        #[test]
        fn accepted_moves_never_collide((occ, proposals, _) in scenario()) {
            let res = ConflictResolver::resolve(&occ, &proposals);
            let moving: FxHashSet<EntityId> = res.accepted.iter().map(|p| p.entity).collect();

            let mut targets = FxHashSet::default();
            for p in &res.accepted {
                prop_assert!(targets.insert(p.to), "two accepted moves into {}", p.to);
                if let Some(occupant) = occ.get(&p.to) {
                    prop_assert!(moving.contains(occupant), "moved onto stationary {}", occupant);
                }
            }
            prop_assert_eq!(res.accepted.len() + res.rejected.len(), proposals.len());
        }
    }
}
