//! Subcommand implementations, one `run` function per subcommand.

pub mod decode;
pub mod encode;
pub mod io;
pub mod random;
pub mod sort;
