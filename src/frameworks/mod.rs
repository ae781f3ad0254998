// Framework bootstrap: configuration, logging and the command-line front end.

pub mod app;
pub mod cli;
pub mod config;
