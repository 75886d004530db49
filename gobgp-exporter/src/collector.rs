// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::log::collector_log;
use crate::metrics::MetricSample;
use gobgp_api::{Error, Stream};
use slog::Logger;
use std::sync::atomic::{AtomicBool, Ordering};

const UNIT: &str = "stream";

/// Outcome of one collector run. Collection never fails as a whole: calls
/// that went wrong show up in `errors` and their samples are absent.
#[derive(Debug, Default)]
pub struct Collection {
    pub samples: Vec<MetricSample>,
    pub errors: u64,
}

impl Collection {
    pub fn failed() -> Self {
        Self {
            samples: Vec::new(),
            errors: 1,
        }
    }
}

/// Result of draining a stream to its end.
#[derive(Debug)]
pub(crate) struct Drained {
    pub records: usize,
    /// Malformed records that were logged and skipped.
    pub skipped: u64,
    /// Error that cut the stream short, if any.
    pub error: Option<Error>,
}

impl Drained {
    pub fn errors(&self) -> u64 {
        self.skipped + u64::from(self.error.is_some())
    }
}

/// Pull every record out of `stream`, handing each to `f`.
///
/// A malformed record is logged and skipped and draining goes on. Any other
/// error ends the drain.
pub(crate) fn drain<T, F>(
    stream: Stream<'_, T>,
    log: &Logger,
    what: &str,
    mut f: F,
) -> Drained
where
    F: FnMut(T),
{
    let mut drained = Drained {
        records: 0,
        skipped: 0,
        error: None,
    };
    for item in stream {
        match item {
            Ok(record) => {
                drained.records += 1;
                f(record);
            }
            Err(e) if e.is_recoverable() => {
                collector_log!(log, warn,
                    "skipping malformed {} record: {}", what, e;
                    "error" => format!("{e}")
                );
                drained.skipped += 1;
            }
            Err(e) => {
                drained.error = Some(e);
                break;
            }
        }
    }
    drained
}

/// Clear the connectivity flag if `error` means the session is gone.
pub(crate) fn note_disconnect(connected: &AtomicBool, error: &Error) {
    if error.is_disconnect() {
        connected.store(false, Ordering::Relaxed);
    }
}
