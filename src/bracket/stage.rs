use std::fmt::{Display, Formatter};

/// One stage of a SABO bracket. The persisted `round_number` column encodes
/// these by a fixed numeric convention (winners rounds count from 1, branch A
/// from 101, branch B from 201, semifinals are 250, the grand final is 300);
/// everything outside this module should be working with `Stage` instead of
/// raw round numbers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Stage {
    /// rounds 1-3; round 3 is the two winners finals
    WinnersRound(i32),
    /// rounds 101-103, seeded by winners round 1 losers; 103 is the branch final
    LosersBranchA(i32),
    /// rounds 201-203, seeded by winners round 2 & 3 losers; 203 is the branch final
    LosersBranchB(i32),
    Semifinals,
    GrandFinal,
}

pub const WINNERS_ROUNDS: i32 = 3;
pub const LOSERS_BRANCH_ROUNDS: i32 = 3;

const LOSERS_A_BASE: i32 = 100;
const LOSERS_B_BASE: i32 = 200;
const SEMIFINALS_ROUND: i32 = 250;
const GRAND_FINAL_ROUND: i32 = 300;

/// which side of a match a player is advanced into
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Slot {
    Player1,
    Player2,
}

impl Slot {
    pub fn other(&self) -> Slot {
        match self {
            Slot::Player1 => Slot::Player2,
            Slot::Player2 => Slot::Player1,
        }
    }
}

/// `matches 1..=k` in a round pair off so that matches `2n-1` and `2n` feed
/// match `n` of the next round; the odd seat is player 1.
pub fn parity_feed(match_number: i32) -> (i32, Slot) {
    let target = (match_number + 1) / 2;
    let slot = if match_number % 2 == 1 {
        Slot::Player1
    } else {
        Slot::Player2
    };
    (target, slot)
}

impl Stage {
    pub fn round_number(&self) -> i32 {
        match self {
            Stage::WinnersRound(n) => *n,
            Stage::LosersBranchA(n) => LOSERS_A_BASE + n,
            Stage::LosersBranchB(n) => LOSERS_B_BASE + n,
            Stage::Semifinals => SEMIFINALS_ROUND,
            Stage::GrandFinal => GRAND_FINAL_ROUND,
        }
    }

    pub fn from_round_number(round_number: i32) -> Option<Self> {
        match round_number {
            n @ 1..=WINNERS_ROUNDS => Some(Stage::WinnersRound(n)),
            SEMIFINALS_ROUND => Some(Stage::Semifinals),
            GRAND_FINAL_ROUND => Some(Stage::GrandFinal),
            n if n > LOSERS_A_BASE && n <= LOSERS_A_BASE + LOSERS_BRANCH_ROUNDS => {
                Some(Stage::LosersBranchA(n - LOSERS_A_BASE))
            }
            n if n > LOSERS_B_BASE && n <= LOSERS_B_BASE + LOSERS_BRANCH_ROUNDS => {
                Some(Stage::LosersBranchB(n - LOSERS_B_BASE))
            }
            _ => None,
        }
    }

    /// how many matches this stage holds in a full 16-player bracket
    pub fn match_count(&self) -> i32 {
        match self {
            Stage::WinnersRound(1) => 8,
            Stage::WinnersRound(2) => 4,
            Stage::WinnersRound(_) => 2,
            Stage::LosersBranchA(1) => 4,
            Stage::LosersBranchA(2) => 2,
            Stage::LosersBranchA(_) => 1,
            Stage::LosersBranchB(3) => 1,
            Stage::LosersBranchB(_) => 2,
            Stage::Semifinals => 2,
            Stage::GrandFinal => 1,
        }
    }

    pub fn is_winners_bracket(&self) -> bool {
        matches!(self, Stage::WinnersRound(_))
    }

    /// every stage of a full bracket, in generation/display order
    pub fn all() -> Vec<Stage> {
        let mut stages = vec![];
        for n in 1..=WINNERS_ROUNDS {
            stages.push(Stage::WinnersRound(n));
        }
        for n in 1..=LOSERS_BRANCH_ROUNDS {
            stages.push(Stage::LosersBranchA(n));
        }
        for n in 1..=LOSERS_BRANCH_ROUNDS {
            stages.push(Stage::LosersBranchB(n));
        }
        stages.push(Stage::Semifinals);
        stages.push(Stage::GrandFinal);
        stages
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::WinnersRound(WINNERS_ROUNDS) => write!(f, "Winners Finals"),
            Stage::WinnersRound(n) => write!(f, "Winners Round {}", n),
            Stage::LosersBranchA(LOSERS_BRANCH_ROUNDS) => write!(f, "Losers Branch A Final"),
            Stage::LosersBranchA(n) => write!(f, "Losers Branch A Round {}", n),
            Stage::LosersBranchB(LOSERS_BRANCH_ROUNDS) => write!(f, "Losers Branch B Final"),
            Stage::LosersBranchB(n) => write!(f, "Losers Branch B Round {}", n),
            Stage::Semifinals => write!(f, "Semifinals"),
            Stage::GrandFinal => write!(f, "Grand Final"),
        }
    }
}
