pub mod admin_cmds;
pub mod match_cmds;
