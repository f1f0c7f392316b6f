//! Local-search strategies.
//!
//! A local search takes a graph whose removed set is a starting solution,
//! moves it by swapping one removed node for one present node per step, and
//! reports the best removed set seen before a run of idle steps ends it.
//! The strategy is a closed [`SearchStrategy`] enum; [`LocalSearch::run`] is
//! the single dispatch point.

mod bcls;
mod cbns;
mod chns;
mod config;
mod dlas;
mod runner;
mod types;

pub use config::SearchConfig;
pub use runner::LocalSearch;
pub use types::{SearchResult, SearchStrategy};
