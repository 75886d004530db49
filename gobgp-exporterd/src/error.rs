// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use dropshot::HttpError;
use http::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("scrape task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("exposition error: {0}")]
    Exposition(#[from] gobgp_exporter::Error),

    #[error("bad response header: {0}")]
    Response(#[from] http::Error),
}

impl From<Error> for HttpError {
    fn from(value: Error) -> Self {
        match value {
            Error::Join(ref e) if e.is_cancelled() => {
                Self::for_unavail(None, value.to_string())
            }
            Error::Join(_) | Error::Exposition(_) | Error::Response(_) => {
                Self::for_internal_error(value.to_string())
            }
        }
    }
}
