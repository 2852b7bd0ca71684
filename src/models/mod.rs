pub mod fixture;
pub mod league;
pub mod lenient;
pub mod live_score;

pub use fixture::{
    FeatureFlag, Fixture, Goals, ManualCorners, MatchStatus, Outcomes, ParseFlagError, Prediction,
    ShowFlags, Team,
};
pub use league::{League, LeagueFixtures, PageInfo};
pub use live_score::{index_scores, LiveScore, LiveScoreSnapshot};
