pub mod kafka;
pub mod recommendation;
pub mod serving;
pub mod training;
pub mod vector_db;
