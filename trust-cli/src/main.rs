// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#[macro_use]
extern crate tracing;

mod commands;
mod input;
mod opt;

use clap::Parser;
use color_eyre::Result;
use opt::Opt;
use trust_logging::{Level, LogBuilder, ReloadHandle, WorkerGuard};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let opt = Opt::parse();
    let _log_guards = init_logging(&opt)?;

    info!("\"{}\"", std::env::args().collect::<Vec<_>>().join(" "));
    info!("mybit-trust version {}", env!("CARGO_PKG_VERSION"));

    commands::handle_subcommand(opt).await?;

    Ok(())
}

fn init_logging(opt: &Opt) -> Result<(ReloadHandle, Option<WorkerGuard>)> {
    let logging_targets = vec![
        ("mybit_trust".to_string(), Level::TRACE),
        ("trust_logging".to_string(), Level::TRACE),
        ("trustlib".to_string(), Level::DEBUG),
    ];
    let log_builder = LogBuilder::new(logging_targets)
        .output_dest(opt.log_output_dest.clone())
        .format(opt.log_format.unwrap_or_default())
        .file_limits(opt.log_file_limits())
        .quiet();
    let guards = log_builder.initialize()?;
    Ok(guards)
}
