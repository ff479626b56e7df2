//! wsctl - Keep ~/.ssh/config in sync with your remote workspaces

use console::style;

fn main() {
    if let Err(e) = wsctl::run() {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
