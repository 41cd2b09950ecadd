#![forbid(unsafe_code)]

use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;
use tree2dir::cli::Args;

fn main() -> anyhow::Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "dist".to_string()));
    let completions_dir = out_dir.join("completions");
    let man_dir = out_dir.join("man");

    fs::create_dir_all(&completions_dir)?;
    fs::create_dir_all(&man_dir)?;

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        let mut cmd = Args::command();
        generate_to(shell, &mut cmd, "tree2dir", &completions_dir)?;
    }

    // One page for the top-level command and one per subcommand.
    let cmd = Args::command();
    let mut pages = vec![("tree2dir".to_string(), cmd.clone())];
    for sub in cmd.get_subcommands() {
        pages.push((format!("tree2dir-{}", sub.get_name()), sub.clone()));
    }
    for (name, page) in pages {
        let mut buffer = Vec::new();
        Man::new(page).render(&mut buffer)?;
        fs::write(man_dir.join(format!("{name}.1")), buffer)?;
    }

    eprintln!(
        "generated shell completions and man pages under {}",
        out_dir.display()
    );
    Ok(())
}
