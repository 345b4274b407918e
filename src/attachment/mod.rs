//! File attachments stored as data URLs and referenced from tasks by id.

pub mod domain;
pub mod services;
