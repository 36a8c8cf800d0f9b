use crate::model::player::PlayerId;
use crate::model::trick::TrickOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: PlayerId,
    /// Points carried by the tricks this player won.
    pub taken: u32,
    /// Points added to the player's cumulative score.
    pub awarded: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    pub entries: Vec<ScoreEntry>,
    pub moon_shooter: Option<PlayerId>,
}

impl RoundScore {
    /// Scores a finished round. A player who won every point-bearing trick shoots
    /// the moon: they take nothing and everyone else takes `point_pool`. A round
    /// without any point-bearing trick awards nothing.
    pub fn tally(seating: &[PlayerId], tricks: &[TrickOutcome], point_pool: u32) -> Self {
        let mut entries: Vec<ScoreEntry> = seating
            .iter()
            .map(|&player| ScoreEntry {
                player,
                taken: 0,
                awarded: 0,
            })
            .collect();

        for trick in tricks {
            if let Some(entry) = entries.iter_mut().find(|e| e.player == trick.winner) {
                entry.taken += trick.points;
            }
        }

        let pointed = || tricks.iter().filter(|trick| trick.points > 0);
        let moon_shooter = pointed()
            .next()
            .map(|first| first.winner)
            .filter(|&shooter| pointed().all(|trick| trick.winner == shooter));

        for entry in &mut entries {
            entry.awarded = match moon_shooter {
                Some(shooter) if shooter == entry.player => 0,
                Some(_) => point_pool,
                None => entry.taken,
            };
        }

        Self {
            entries,
            moon_shooter,
        }
    }

    pub fn entry(&self, player: PlayerId) -> Option<&ScoreEntry> {
        self.entries.iter().find(|entry| entry.player == player)
    }

    pub fn taken_by(&self, player: PlayerId) -> u32 {
        self.entry(player).map_or(0, |entry| entry.taken)
    }

    pub fn awarded_to(&self, player: PlayerId) -> u32 {
        self.entry(player).map_or(0, |entry| entry.awarded)
    }

    pub fn total_taken(&self) -> u32 {
        self.entries.iter().map(|entry| entry.taken).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::RoundScore;
    use crate::model::card::STANDARD_POINT_POOL;
    use crate::model::player::PlayerId;
    use crate::model::trick::TrickOutcome;

    fn seating() -> Vec<PlayerId> {
        (1..=4).map(PlayerId::new).collect()
    }

    fn won(raw: u32, points: u32) -> TrickOutcome {
        TrickOutcome {
            winner: PlayerId::new(raw),
            points,
        }
    }

    #[test]
    fn points_go_to_trick_winners() {
        let tricks = [won(1, 1), won(2, 5), won(4, 13), won(4, 7), won(3, 0)];
        let score = RoundScore::tally(&seating(), &tricks, STANDARD_POINT_POOL);
        assert_eq!(score.moon_shooter, None);
        assert_eq!(score.awarded_to(PlayerId::new(1)), 1);
        assert_eq!(score.awarded_to(PlayerId::new(2)), 5);
        assert_eq!(score.awarded_to(PlayerId::new(3)), 0);
        assert_eq!(score.awarded_to(PlayerId::new(4)), 20);
        assert_eq!(score.total_taken(), STANDARD_POINT_POOL);
    }

    #[test]
    fn shoot_the_moon_awards_opponents() {
        let tricks = [won(2, 13), won(1, 0), won(2, 4), won(2, 9)];
        let score = RoundScore::tally(&seating(), &tricks, STANDARD_POINT_POOL);
        assert_eq!(score.moon_shooter, Some(PlayerId::new(2)));
        assert_eq!(score.taken_by(PlayerId::new(2)), 26);
        assert_eq!(score.awarded_to(PlayerId::new(2)), 0);
        for raw in [1, 3, 4] {
            assert_eq!(score.awarded_to(PlayerId::new(raw)), 26);
        }
    }

    #[test]
    fn round_without_points_awards_nothing() {
        let tricks = [won(1, 0), won(3, 0), won(3, 0)];
        let score = RoundScore::tally(&seating(), &tricks, 0);
        assert_eq!(score.moon_shooter, None);
        assert!(score.entries.iter().all(|entry| entry.awarded == 0));
    }

    #[test]
    fn unknown_player_has_zero_entry() {
        let score = RoundScore::tally(&seating(), &[], STANDARD_POINT_POOL);
        assert!(score.entry(PlayerId::new(9)).is_none());
        assert_eq!(score.awarded_to(PlayerId::new(9)), 0);
    }
}
