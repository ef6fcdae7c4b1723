//! amisite: navigation menu tree and block page content for the AMI site
//!
//! Layers, innermost first:
//! - `domain`: menu tree and content model, no I/O
//! - `application`: services guarded by an access policy
//! - `infrastructure`: JSON file store and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
