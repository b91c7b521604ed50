//! Live config reload manager.
//!
//! Combines the file watcher with config loading so tuning changes on
//! disk reach the running avatar.

mod manager;


pub use manager::ReloadManager;
