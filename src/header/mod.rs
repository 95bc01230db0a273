pub mod coverage_reader;

pub use coverage_reader::CoverageReader;
