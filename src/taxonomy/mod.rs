//! Task classification: per-workspace statuses and priorities, and global
//! tags.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
