// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::commands::SubCmd;
use clap::{Args, Parser};
use std::time::Duration;
use trust_logging::{FileLimits, LogFormat, LogOutputDest};
use trustlib::common::Url;
use trustlib::{BurnerSelection, Config};

// Please do not remove the blank lines in these doc comments.
// They are used for inserting line breaks when the help menu is rendered in the UI.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Opt {
    /// Specify the logging output destination.
    ///
    /// Valid values are "stdout", "stderr", "data-dir", or a custom path.
    ///
    /// `data-dir` is the default value.
    ///
    /// The data directory location is platform specific:
    ///  - Linux: $HOME/.local/share/mybit-trust/logs
    ///  - macOS: $HOME/Library/Application Support/mybit-trust/logs
    ///  - Windows: C:\Users\<username>\AppData\Roaming\mybit-trust\logs
    #[allow(rustdoc::invalid_html_tags)]
    #[clap(long, verbatim_doc_comment, default_value = "data-dir")]
    pub log_output_dest: LogOutputDest,

    /// Specify the logging format.
    ///
    /// Valid values are "default" or "json".
    ///
    /// If the argument is not used, the default format will be applied.
    #[clap(long, verbatim_doc_comment)]
    pub log_format: Option<LogFormat>,

    /// Specify the maximum number of uncompressed log files to keep.
    ///
    /// Only applies when logging to a directory.
    ///
    /// Older files are compressed once this limit is reached.
    #[clap(long, verbatim_doc_comment)]
    pub log_max_files: Option<usize>,

    /// Specify the maximum number of compressed log files to keep.
    ///
    /// Only applies when logging to a directory.
    ///
    /// The oldest compressed files are deleted once this limit is reached.
    #[clap(long, verbatim_doc_comment)]
    pub log_max_archived_files: Option<usize>,

    #[command(flatten)]
    pub network: NetworkOpt,

    /// Available sub commands.
    #[clap(subcommand)]
    pub command: SubCmd,
}

impl Opt {
    pub fn log_file_limits(&self) -> FileLimits {
        FileLimits {
            uncompressed: self.log_max_files,
            archived: self.log_max_archived_files,
        }
    }
}

/// Overrides for the values read from the environment.
#[derive(Args, Debug, Default)]
pub(crate) struct NetworkOpt {
    /// The network to use: "private", "ropsten" or "mainnet".
    ///
    /// Falls back to the TRUST_NETWORK env variable, then to "private".
    #[clap(long, global = true, verbatim_doc_comment)]
    pub network: Option<String>,

    /// JSON-RPC endpoint of the chain node.
    #[clap(long, global = true)]
    pub rpc_url: Option<Url>,

    /// Endpoint answering transaction receipt status requests.
    #[clap(long, global = true)]
    pub status_api_url: Option<Url>,

    #[clap(long, global = true)]
    pub etherscan_api_key: Option<String>,

    /// How the burner approvals are granted to is chosen: "profile" or "legacy".
    #[clap(long, global = true)]
    pub burner_selection: Option<BurnerSelection>,

    /// Milliseconds between two status requests.
    #[clap(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Give up after this many status requests.
    #[clap(long, global = true)]
    pub poll_max_attempts: Option<u32>,

    /// Give up after this many seconds. 0 waits forever.
    #[clap(long, global = true)]
    pub poll_timeout_secs: Option<u64>,
}

impl NetworkOpt {
    pub fn apply(self, config: &mut Config) {
        if let Some(network) = self.network {
            config.network = Some(network);
        }
        if let Some(rpc_url) = self.rpc_url {
            config.rpc_url = Some(rpc_url);
        }
        if let Some(status_api_url) = self.status_api_url {
            config.status_api_url = Some(status_api_url);
        }
        if let Some(api_key) = self.etherscan_api_key {
            config.etherscan_api_key = Some(api_key);
        }
        if let Some(burner_selection) = self.burner_selection {
            config.burner_selection = burner_selection;
        }
        if let Some(interval) = self.poll_interval_ms {
            config.poll.interval = Duration::from_millis(interval);
        }
        if let Some(max_attempts) = self.poll_max_attempts {
            config.poll.max_attempts = Some(max_attempts);
        }
        if let Some(secs) = self.poll_timeout_secs {
            config.poll.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
    }
}
