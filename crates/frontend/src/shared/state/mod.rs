pub mod query_state;
