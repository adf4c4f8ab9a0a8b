use std::path::PathBuf;

use squadsmith_tagging::tag::TagVocabulary;

use crate::{config::Config, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InitConfigArg {
    /// Output file path of the configuration
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the default tag vocabulary to this file
    #[arg(long)]
    vocabulary_output: Option<PathBuf>,
}

pub(crate) fn run(arg: &InitConfigArg) -> anyhow::Result<()> {
    let InitConfigArg {
        output,
        vocabulary_output,
    } = arg;

    Output::save_json(&Config::default(), output.clone())?;
    if let Some(path) = vocabulary_output {
        Output::save_json(&TagVocabulary::default(), Some(path.clone()))?;
    }
    Ok(())
}
