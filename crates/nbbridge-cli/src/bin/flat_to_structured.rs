//! Convert a Databricks source notebook into a Jupyter notebook

use anyhow::Result;
use clap::Parser;
use nbbridge_cli::{init_logging, report_failure, report_usage, ConvertArgs};
use nbbridge_notebook::{source_to_ipynb, Converted};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "flat_to_structured",
    about = "Convert a Databricks source notebook (.py) to a Jupyter notebook (.ipynb)",
    long_about = "Convert a Databricks source notebook (.py) to a Jupyter notebook (.ipynb).\n\
                  \n\
                  Markdown cells (# MAGIC %md) become markdown cells, SQL cells\n\
                  (# MAGIC %sql) become %%sql code cells, everything else becomes\n\
                  code. Without OUTPUT the notebook JSON is printed to stdout.",
    version
)]
struct Args {
    #[command(flatten)]
    convert: ConvertArgs,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => return report_usage(&e),
    };
    init_logging(args.convert.verbosity());

    match run(&args.convert) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e),
    }
}

fn run(args: &ConvertArgs) -> Result<()> {
    let options = args.load_config()?.convert_options();
    log::info!("converting {} to ipynb", args.input.display());

    match source_to_ipynb(&args.input, args.output.as_deref(), &options)? {
        Converted::Written(path) => args.verbosity().confirm_saved(&path),
        Converted::InMemory(notebook) => println!("{}", notebook.to_json(options.indent)?),
    }
    Ok(())
}
