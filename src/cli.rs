pub mod chemotaxis_help;
pub mod cli_chemotaxis;
pub mod cli_main;
