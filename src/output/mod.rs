mod knn_writer;
pub mod naming;
mod out_writer;
mod stat_writer;

pub use knn_writer::{write_neighbours, write_neighbours_file};
pub use out_writer::{write_out, write_out_file};
pub use stat_writer::{PhaseTimings, StatReport};
