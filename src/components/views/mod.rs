mod browse;
mod legal;
mod search;
mod watch;

pub use browse::Browse;
pub use legal::Legal;
pub use search::SearchResults;
pub use watch::Watch;
