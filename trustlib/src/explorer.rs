// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Etherscan-style receipt status endpoint.

use crate::common::TxHash;
use crate::poller::{Error, StatusResponse, StatusSource, TxStatus};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

/// Timeout of a single status request.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// [`StatusSource`] backed by an explorer API answering
/// `GET <api>?module=transaction&action=gettxreceiptstatus&txhash=<hash>`.
#[derive(Clone, Debug)]
pub struct EtherscanEndpoint {
    api_url: Url,
    api_key: Option<String>,
    request_client: Client,
}

impl EtherscanEndpoint {
    pub fn new(api_url: Url, api_key: Option<String>) -> Result<Self, Error> {
        let request_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_url,
            api_key,
            request_client,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn status_url(&self, tx_hash: TxHash) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("module", "transaction")
                .append_pair("action", "gettxreceiptstatus")
                .append_pair("txhash", &tx_hash.to_string());
            if let Some(api_key) = &self.api_key {
                query.append_pair("apikey", api_key);
            }
        }
        url
    }
}

#[async_trait]
impl StatusSource for EtherscanEndpoint {
    async fn fetch_status(&self, tx_hash: TxHash) -> Result<TxStatus, Error> {
        let url = self.status_url(tx_hash);
        debug!("Fetching receipt status of {tx_hash} from {}", self.api_url);

        let body = self
            .request_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: StatusResponse = serde_json::from_str(&body).map_err(|err| {
            error!("Unparsable status response for {tx_hash}: {err}");
            Error::MalformedResponse(err.to_string())
        })?;
        trace!("Status of {tx_hash}: {:?}", response.status);
        Ok(response.tx_status())
    }
}
