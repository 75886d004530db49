// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::Result;

/// Pull based response stream of a server-streaming call.
///
/// Yields `Some(Ok(_))` per record and `None` at end-of-data. A recoverable
/// error (see [`crate::Error::is_recoverable`]) stands in for a single
/// malformed record; any other error is the last item the stream produces.
pub struct Stream<'a, T> {
    inner: Box<dyn Iterator<Item = Result<T>> + 'a>,
}

impl<'a, T> Stream<'a, T> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: 'a,
    {
        Self {
            inner: Box::new(items.into_iter()),
        }
    }
}

impl<T> Iterator for Stream<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
