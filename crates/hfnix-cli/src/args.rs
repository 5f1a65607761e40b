//! Command line reordering
//!
//! helmfile-nix options are accepted anywhere, as in `helmfile-nix diff -e
//! prod`. Those found after the helmfile command are moved in front of it, so
//! clap reads them and they are not forwarded a second time. Everything after
//! `--` is left alone.

/// Options that take a value
const VALUE_OPTIONS: &[&str] = &[
    "-f",
    "--file",
    "-e",
    "--environment",
    "--state-values-set",
    "--nix-bin",
    "--helmfile-bin",
];

/// Options without a value
const SWITCHES: &[&str] = &["--show-trace", "--debug"];

enum Kind {
    /// Our switch, or our option with its value attached
    Standalone,
    /// Our option, value in the next argument
    WithValue,
    Foreign,
}

fn classify(arg: &str) -> Kind {
    if SWITCHES.contains(&arg) {
        return Kind::Standalone;
    }
    if VALUE_OPTIONS.contains(&arg) {
        return Kind::WithValue;
    }
    if let Some((name, _)) = arg.split_once('=') {
        if name.starts_with("--") && VALUE_OPTIONS.contains(&name) {
            return Kind::Standalone;
        }
    }
    // -eprod, -f./deploy
    if !arg.starts_with("--") && arg.len() > 2 && (arg.starts_with("-e") || arg.starts_with("-f")) {
        return Kind::Standalone;
    }
    Kind::Foreign
}

/// Move our options that follow the helmfile command in front of it
pub fn hoist_own_options<I>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = argv.into_iter();
    let mut leading: Vec<String> = iter.next().into_iter().collect();
    let mut hoisted = Vec::new();
    let mut rest = Vec::new();

    // Up to and including the command
    while let Some(arg) = iter.next() {
        if arg == "--" || !arg.starts_with('-') {
            rest.push(arg);
            break;
        }
        let with_value = matches!(classify(&arg), Kind::WithValue);
        leading.push(arg);
        if with_value {
            leading.extend(iter.next());
        }
    }

    let mut passthrough = rest.first().is_some_and(|arg| arg == "--");
    while let Some(arg) = iter.next() {
        if passthrough {
            rest.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            rest.push(arg);
            continue;
        }
        match classify(&arg) {
            Kind::Standalone => hoisted.push(arg),
            Kind::WithValue => {
                hoisted.push(arg);
                hoisted.extend(iter.next());
            }
            Kind::Foreign => rest.push(arg),
        }
    }

    leading.extend(hoisted);
    leading.extend(rest);
    leading
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoist(args: &[&str]) -> Vec<String> {
        hoist_own_options(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_options_after_command_move_forward() {
        assert_eq!(
            hoist(&["helmfile-nix", "diff", "-e", "prod", "--context", "3"]),
            vec!["helmfile-nix", "-e", "prod", "diff", "--context", "3"]
        );
    }

    #[test]
    fn test_leading_options_stay_in_place() {
        assert_eq!(
            hoist(&["helmfile-nix", "-f", "deploy", "--debug", "sync"]),
            vec!["helmfile-nix", "-f", "deploy", "--debug", "sync"]
        );
    }

    #[test]
    fn test_attached_values_and_switches() {
        assert_eq!(
            hoist(&[
                "helmfile-nix",
                "template",
                "--environment=prod",
                "-fdeploy",
                "--show-trace",
                "--skip-deps",
                "--state-values-set",
                "a=1",
            ]),
            vec![
                "helmfile-nix",
                "--environment=prod",
                "-fdeploy",
                "--show-trace",
                "--state-values-set",
                "a=1",
                "template",
                "--skip-deps",
            ]
        );
    }

    #[test]
    fn test_double_dash_stops_hoisting() {
        assert_eq!(
            hoist(&["helmfile-nix", "apply", "--", "-e", "x"]),
            vec!["helmfile-nix", "apply", "--", "-e", "x"]
        );
        assert_eq!(
            hoist(&["helmfile-nix", "--", "apply", "-e", "x"]),
            vec!["helmfile-nix", "--", "apply", "-e", "x"]
        );
    }

    #[test]
    fn test_no_command() {
        assert_eq!(
            hoist(&["helmfile-nix", "-e", "prod", "--help"]),
            vec!["helmfile-nix", "-e", "prod", "--help"]
        );
    }
}
