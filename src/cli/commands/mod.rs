mod init;
mod recent;
mod search;

pub use init::cmd_init;
pub use recent::cmd_recent;
pub use search::cmd_search;
