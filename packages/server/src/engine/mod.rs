pub mod gate;
pub mod rank;
pub mod rollback;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;
