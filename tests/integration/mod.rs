//! Integration tests for the ecsdeploy command line

mod parse_cli;
