pub mod composer;
pub mod grader;
pub mod ingest;
