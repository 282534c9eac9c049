use std::fs;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::Shell;

#[path = "src/cli.rs"]
mod cli;

const BIN: &str = "lineup";

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        panic!("OUT_DIR is set by cargo for build scripts");
    };
    let out_dir = Path::new(&out_dir);

    let man_dir = out_dir.join("man");
    let completion_dir = out_dir.join("completions");
    for dir in [&man_dir, &completion_dir] {
        fs::create_dir_all(dir).unwrap_or_else(|e| panic!("creating {}: {e}", dir.display()));
    }

    let mut cmd = cli::Cli::command();
    write_manpages(&cmd, &man_dir);

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        clap_complete::generate_to(shell, &mut cmd, BIN, &completion_dir)
            .unwrap_or_else(|e| panic!("generating {shell} completions: {e}"));
    }
}

/// One page per visible command, named `lineup-queue-move.1` and so on.
fn write_manpages(cmd: &clap::Command, dir: &Path) {
    let page = cmd.get_name().to_owned();
    let mut rendered = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut rendered)
        .unwrap_or_else(|e| panic!("rendering man page {page}: {e}"));

    let target = dir.join(format!("{page}.1"));
    fs::write(&target, rendered).unwrap_or_else(|e| panic!("writing {}: {e}", target.display()));

    cmd.get_subcommands()
        .filter(|sub| !sub.is_hide_set())
        .for_each(|sub| {
            let named = sub.clone().name(format!("{page}-{}", sub.get_name()));
            write_manpages(&named, dir);
        });
}
