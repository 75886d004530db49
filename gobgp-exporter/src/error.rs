// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("prometheus: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("exposition is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
