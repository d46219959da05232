//! Convert a Jupyter notebook into a Databricks source notebook

use anyhow::Result;
use clap::Parser;
use nbbridge_cli::{init_logging, report_failure, report_usage, ConvertArgs};
use nbbridge_notebook::{ipynb_to_source, Converted};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "structured_to_flat",
    about = "Convert a Jupyter notebook (.ipynb) to a Databricks source notebook (.py)",
    long_about = "Convert a Jupyter notebook (.ipynb) to a Databricks source notebook (.py).\n\
                  \n\
                  Markdown cells are written behind # MAGIC %md, code cells verbatim.\n\
                  Outputs and execution counts are dropped. Without OUTPUT the source\n\
                  is printed to stdout.",
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
    log::info!("converting {} to source notebook", args.input.display());

    match ipynb_to_source(&args.input, args.output.as_deref(), &options)? {
        Converted::Written(path) => args.verbosity().confirm_saved(&path),
        Converted::InMemory(text) => println!("{text}"),
    }
    Ok(())
}
