pub mod event_log;
pub mod force_graph;
