pub mod game;
pub mod images;
pub mod suggestion;

pub use game::{GameRecord, PlayStatus};
pub use images::ImageSet;
pub use suggestion::{collect_candidates, Candidate, CandidateKind, Suggestion};
