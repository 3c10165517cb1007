use clap::Parser;

use super::Cli;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("lwyi").chain(args.iter().copied()))
}

#[test]
fn defaults_are_empty() {
    let cli = parse(&[]).unwrap();
    assert!(!cli.help);
    assert!(cli.binary_dir.is_none());
    assert!(cli.targets.is_empty());
    assert_eq!(cli.parallel, 0);
    assert!(cli.tool.is_empty());
}

#[test]
fn short_and_long_spellings_agree() {
    for spelling in ["-d", "--binary_dir"] {
        let cli = parse(&[spelling, "/build"]).unwrap();
        assert_eq!(cli.binary_dir.as_deref(), Some(std::path::Path::new("/build")));
    }
    for spelling in ["-t", "--targets"] {
        let cli = parse(&[spelling, "liba"]).unwrap();
        assert_eq!(cli.targets, ["liba"]);
    }
    for spelling in ["-j", "--parallel"] {
        let cli = parse(&[spelling, "4"]).unwrap();
        assert_eq!(cli.parallel, 4);
    }
    for spelling in ["-h", "--help"] {
        assert!(parse(&[spelling]).unwrap().help);
    }
}

#[test]
fn targets_take_multiple_values() {
    let cli = parse(&["-t", "liba", "libb", "libc"]).unwrap();
    assert_eq!(cli.targets, ["liba", "libb", "libc"]);
}

#[test]
fn targets_stop_at_the_next_flag() {
    let cli = parse(&["-t", "liba", "libb", "-j", "2"]).unwrap();
    assert_eq!(cli.targets, ["liba", "libb"]);
    assert_eq!(cli.parallel, 2);
}

#[test]
fn value_flags_reject_a_following_dash_token() {
    assert!(parse(&["-d", "--tool"]).is_err());
    assert!(parse(&["-j"]).is_err());
    assert!(parse(&["-t", "--parallel", "2"]).is_err());
}

#[test]
fn tool_captures_everything_after_it_verbatim() {
    let cli = parse(&["--tool", "graph", "-o", "out.dot", "--strange", "-x"]).unwrap();
    assert_eq!(cli.tool, ["graph", "-o", "out.dot", "--strange", "-x"]);
}

#[test]
fn tool_captures_other_known_flags_too() {
    let cli = parse(&["-j", "2", "--tool", "tidy", "-c", "tidy.json", "--help"]).unwrap();
    assert_eq!(cli.parallel, 2);
    assert_eq!(cli.tool, ["tidy", "-c", "tidy.json", "--help"]);
    assert!(!cli.help);
}

#[test]
fn unknown_flags_yield_an_error() {
    let err = parse(&["--frobnicate"]).unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn non_numeric_parallel_is_rejected() {
    assert!(parse(&["-j", "many"]).is_err());
}
