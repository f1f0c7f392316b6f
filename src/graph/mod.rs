//! Problem instances and the graphs the search operates on.
//!
//! [`ProblemData`] is the raw undirected graph. Choosing an objective and
//! a budget turns it into a [`Graph`]: either a [`CnpGraph`] (pairwise
//! connectivity over connected components) or a [`DcnpGraph`] (pairs
//! within a hop limit).
//!
//! # References
//!
//! - Arulselvan, A. et al. (2009). "Detecting critical nodes in sparse
//!   graphs", *Computers & Operations Research* 36(7), 2193-2200.
//! - Veremyev, A., Prokopyev, O. & Pasiliao, E. (2015). "Critical nodes for
//!   distance-based connectivity and related problems in graphs",
//!   *Networks* 66(3), 170-195.

mod cnp;
mod dcnp;
mod instance;
mod problem_data;
mod read;
mod types;

pub use cnp::CnpGraph;
pub use dcnp::DcnpGraph;
pub use instance::Graph;
pub use problem_data::{ProblemData, DEFAULT_HOP_DISTANCE};
pub use read::{parse_adjacency_list, parse_edge_list, read, read_adjacency_list, read_edge_list};
pub use types::{jaccard, Node, ProblemType, Solution};
