use anyhow::Result;
use jobsh::input::{Editor, PlainReader};
use jobsh::{Args, Interpreter, ShellConfig};
use std::io::{self, IsTerminal};

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    jobsh::logging::init();

    let config = ShellConfig::from_args(&args);
    tracing::debug!(?config, "starting shell");
    let mut shell = Interpreter::new(config.clone());

    if io::stdin().is_terminal() {
        let mut editor = Editor::new(config.history)?;
        shell.repl(&mut editor)?;
    } else {
        let mut lines = PlainReader::new(io::stdin().lock(), io::stderr());
        shell.repl(&mut lines)?;
    }
    Ok(())
}
