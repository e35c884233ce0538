//! Version command implementation

use crate::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    println!("stackforge {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
