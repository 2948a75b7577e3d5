//! Command implementations for trackport

pub mod checkpoint;
pub mod detect;
pub mod diff;
pub mod dispatch;
pub mod export;
pub mod import;
pub mod init;
pub mod pages;

use std::fs;
use std::io::{self, Read};

use trackport_core::error::Result;

/// Read a command input: a file path, or `-` for stdin
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}
