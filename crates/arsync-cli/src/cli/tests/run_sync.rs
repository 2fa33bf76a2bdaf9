//! Tests for run, crawl and sync.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_run_defaults() {
    match parse(&["arsync", "run"]) {
        CliCommand::Run { users, skip_crawl } => {
            assert!(users.is_none());
            assert!(!skip_crawl);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_with_users_and_skip_crawl() {
    match parse(&["arsync", "run", "--users", "/etc/arsync/users.txt", "--skip-crawl"]) {
        CliCommand::Run { users, skip_crawl } => {
            assert_eq!(users, Some(PathBuf::from("/etc/arsync/users.txt")));
            assert!(skip_crawl);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_crawl() {
    match parse(&["arsync", "crawl"]) {
        CliCommand::Crawl => {}
        _ => panic!("expected Crawl"),
    }
}

#[test]
fn cli_parse_sync_users() {
    match parse(&["arsync", "sync", "--users", "list.txt"]) {
        CliCommand::Sync { users } => assert_eq!(users, Some(PathBuf::from("list.txt"))),
        _ => panic!("expected Sync"),
    }
}

#[test]
fn cli_parse_global_config_after_subcommand() {
    let cli = Cli::try_parse_from(["arsync", "sync", "--config", "/tmp/arsync.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/arsync.toml")));
    assert!(matches!(cli.command, CliCommand::Sync { users: None }));
}

#[test]
fn cli_parse_global_config_before_subcommand() {
    let cli = Cli::try_parse_from(["arsync", "--config", "a.toml", "crawl"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
}

#[test]
fn cli_rejects_missing_subcommand() {
    assert!(Cli::try_parse_from(["arsync"]).is_err());
}
