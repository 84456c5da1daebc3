//! Exact all-terminal reliability of undirected random graphs.
//!
//! Given an undirected graph where each edge survives independently with a
//! known probability, all-terminal reliability (ATR) is the probability
//! that every vertex remains mutually reachable. Computing it exactly is
//! #P-hard in general; this crate computes it anyway, by recursively
//! factoring the graph with Moskowitz's identity
//! (`ATR(G) = p * ATR(G/e) + (1 - p) * ATR(G-e)`) while aggressively
//! reducing the graph first — pruning hanging vertices, splicing out
//! degree-2 chains, splitting at bridges, and falling back to closed-form
//! polynomials once the graph is small enough.
//!
//! # Example
//! ```
//! use atr_reliability::{AdjacencyMatrix, calculate_atr};
//!
//! // a 4-cycle, each edge independently surviving with probability 0.9
//! let mut matrix = AdjacencyMatrix::<f64>::new(4);
//! matrix.add_edge(0, 1, 0.9);
//! matrix.add_edge(1, 2, 0.9);
//! matrix.add_edge(2, 3, 0.9);
//! matrix.add_edge(3, 0, 0.9);
//!
//! let reliability = calculate_atr(&matrix);
//! assert!(reliability > 0.9 && reliability < 1.0);
//! ```
//!
//! # Loading a graph from disk
//! ```no_run
//! use atr_reliability::{tgf, calculate_atr};
//!
//! let matrix = tgf::parse_file("graph.tgf").expect("malformed TGF input");
//! println!("ATR: {}", calculate_atr(&matrix));
//! ```
#![deny(missing_docs)]
#![deny(warnings)]

pub mod atr;
pub mod atr_forms;
pub mod chain;
pub mod degrees;
pub mod graph;
pub mod matrix;
pub mod tgf;

pub use atr::calculate_atr;
pub use chain::Chain;
pub use degrees::DegreesVector;
pub use graph::{RollbackHandle, UndirectedRandomGraph};
pub use matrix::{AdjacencyMatrix, Edge, EdgeNode};
pub use tgf::TgfError;
