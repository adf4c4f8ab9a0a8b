use arrayvec::ArrayVec;

use crate::roster::HeroIndex;

/// Number of heroes fielded in a team.
pub const TEAM_SIZE: usize = 5;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TeamError {
    #[display("team must have exactly {TEAM_SIZE} members, got {count}")]
    WrongSize { count: usize },
    #[display("hero {index} appears more than once in the team")]
    Duplicate { index: HeroIndex },
}

/// Exactly [`TEAM_SIZE`] distinct heroes, the anchor first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    members: ArrayVec<HeroIndex, TEAM_SIZE>,
}

impl Team {
    /// Builds a team from the anchor and the other members, in draw order.
    pub fn new<I>(anchor: HeroIndex, others: I) -> Result<Self, TeamError>
    where
        I: IntoIterator<Item = HeroIndex>,
    {
        let mut members = ArrayVec::new();
        members.push(anchor);
        let mut count = 1;
        for index in others {
            count += 1;
            if members.contains(&index) {
                return Err(TeamError::Duplicate { index });
            }
            if !members.is_full() {
                members.push(index);
            }
        }
        if count != TEAM_SIZE {
            return Err(TeamError::WrongSize { count });
        }
        Ok(Self { members })
    }

    #[must_use]
    pub fn anchor(&self) -> HeroIndex {
        self.members[0]
    }

    #[must_use]
    pub fn members(&self) -> &[HeroIndex] {
        &self.members
    }

    #[must_use]
    pub fn contains(&self, index: HeroIndex) -> bool {
        self.members.contains(&index)
    }

    /// Order-independent identity of the team.
    #[must_use]
    pub fn key(&self) -> TeamKey {
        let mut sorted = [self.members[0]; TEAM_SIZE];
        sorted.copy_from_slice(&self.members);
        sorted.sort_unstable();
        TeamKey(sorted)
    }
}

/// Sorted member indices; two teams with the same members share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeamKey([HeroIndex; TEAM_SIZE]);

impl TeamKey {
    #[must_use]
    pub fn members(&self) -> &[HeroIndex; TEAM_SIZE] {
        &self.0
    }
}
