pub mod graph_tests;
pub mod pipeline_tests;
