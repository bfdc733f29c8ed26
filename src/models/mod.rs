pub mod episode;

pub use episode::{Episode, EpisodeLookup, EpisodePage, HomeData};
