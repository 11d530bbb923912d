//! Terminal-independent page models: state plus the operations a screen performs.

pub mod details;
pub mod home;
pub mod search;
pub mod watchlist;

pub use details::{DetailsPage, DetailsTicket, MovieDetailsView, load_details};
pub use home::HomePage;
pub use search::{SearchPage, top_person_movies};
pub use watchlist::{WatchFilter, WatchSort, WatchlistPage, WatchlistStats};
