// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;
use tonic::Code;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("rpc status {code:?}: {message}")]
    Status { code: Code, message: String },

    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("decode: {0}")]
    Decode(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl From<tonic::Status> for Error {
    fn from(value: tonic::Status) -> Self {
        Error::Status {
            code: value.code(),
            message: value.message().to_string(),
        }
    }
}

impl Error {
    /// A malformed record inside an otherwise healthy stream. The stream can
    /// keep being drained after one of these.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// The session to the daemon is unusable until it is re-established.
    pub fn is_disconnect(&self) -> bool {
        match self {
            Error::Io(_) | Error::Timeout(_) => true,
            Error::Status { code, .. } => *code == Code::Unavailable,
            Error::Decode(_) | Error::Endpoint(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn error_classes() {
        let decode = Error::Decode("unknown afi 3".into());
        assert!(decode.is_recoverable());
        assert!(!decode.is_disconnect());

        let io = Error::from(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(!io.is_recoverable());
        assert!(io.is_disconnect());

        let timeout = Error::Timeout(Duration::from_secs(5));
        assert!(!timeout.is_recoverable());
        assert!(timeout.is_disconnect());

        let status = Error::from(tonic::Status::not_found("no such table"));
        assert!(!status.is_recoverable());
        assert!(!status.is_disconnect());
    }

    #[test]
    fn unavailable_is_a_disconnect() {
        let e = Error::from(tonic::Status::unavailable("connection refused"));
        assert!(e.is_disconnect());
        assert_eq!(e.to_string(), "rpc status Unavailable: connection refused");
    }
}
