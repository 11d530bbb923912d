pub mod movie;
pub mod credits;
pub mod person;
pub mod paged;
pub mod search;
pub mod watchlist;

pub use movie::{Genre, MovieDetails, MovieSummary};
pub use credits::{CastMember, Credits, CrewMember};
pub use person::{KnownFor, PersonCredit, PersonDetails, PersonMovieCredits, PersonSummary};
pub use paged::Paged;
pub use search::{NavState, SearchMode, SearchRestoreState};
pub use watchlist::{WatchlistEntry, release_year};
