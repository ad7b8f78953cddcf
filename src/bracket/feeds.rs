use crate::bracket::stage::{parity_feed, Slot, Stage, LOSERS_BRANCH_ROUNDS, WINNERS_ROUNDS};

/// a downstream seat that a decided match feeds a player into
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Feed {
    pub stage: Stage,
    pub match_number: i32,
    pub slot: Slot,
}

impl Feed {
    fn new(stage: Stage, match_number: i32, slot: Slot) -> Self {
        Self {
            stage,
            match_number,
            slot,
        }
    }
}

/// Where the winner of `(stage, match_number)` goes. `None` only for the
/// grand final. The cross-stage seats are fixed by the SABO convention:
/// winners finals seed the semifinals' player 1 seats, the two losers branch
/// finals seed the semifinals' player 2 seats, and the semifinals seed the
/// grand final.
pub fn winner_feed(stage: Stage, match_number: i32) -> Option<Feed> {
    match stage {
        Stage::WinnersRound(WINNERS_ROUNDS) => {
            Some(Feed::new(Stage::Semifinals, match_number, Slot::Player1))
        }
        Stage::WinnersRound(n) => {
            let (target, slot) = parity_feed(match_number);
            Some(Feed::new(Stage::WinnersRound(n + 1), target, slot))
        }
        Stage::LosersBranchA(LOSERS_BRANCH_ROUNDS) => {
            Some(Feed::new(Stage::Semifinals, 1, Slot::Player2))
        }
        Stage::LosersBranchA(2) => {
            let slot = if match_number == 1 {
                Slot::Player1
            } else {
                Slot::Player2
            };
            Some(Feed::new(Stage::LosersBranchA(3), 1, slot))
        }
        Stage::LosersBranchA(_) => {
            let (target, slot) = parity_feed(match_number);
            Some(Feed::new(Stage::LosersBranchA(2), target, slot))
        }
        Stage::LosersBranchB(LOSERS_BRANCH_ROUNDS) => {
            Some(Feed::new(Stage::Semifinals, 2, Slot::Player2))
        }
        Stage::LosersBranchB(2) => {
            let slot = if match_number == 1 {
                Slot::Player1
            } else {
                Slot::Player2
            };
            Some(Feed::new(Stage::LosersBranchB(3), 1, slot))
        }
        // branch B round 1 winners keep their match number; the round 2
        // player 2 seats are reserved for the winners finals losers
        Stage::LosersBranchB(_) => {
            Some(Feed::new(Stage::LosersBranchB(2), match_number, Slot::Player1))
        }
        Stage::Semifinals => {
            let slot = if match_number == 1 {
                Slot::Player1
            } else {
                Slot::Player2
            };
            Some(Feed::new(Stage::GrandFinal, 1, slot))
        }
        Stage::GrandFinal => None,
    }
}

/// Where the loser of `(stage, match_number)` drops to. Winners round 1
/// losers seed branch A, round 2 losers seed branch B, and the winners
/// finals losers get their second chance in branch B round 2. Losing
/// anywhere else is elimination.
pub fn loser_feed(stage: Stage, match_number: i32) -> Option<Feed> {
    match stage {
        Stage::WinnersRound(1) => {
            let (target, slot) = parity_feed(match_number);
            Some(Feed::new(Stage::LosersBranchA(1), target, slot))
        }
        Stage::WinnersRound(2) => {
            let (target, slot) = parity_feed(match_number);
            Some(Feed::new(Stage::LosersBranchB(1), target, slot))
        }
        Stage::WinnersRound(WINNERS_ROUNDS) => {
            Some(Feed::new(Stage::LosersBranchB(2), match_number, Slot::Player2))
        }
        _ => None,
    }
}
