// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Callers define `UNIT` in the invoking module.
macro_rules! collector_log {
    (
        $log:expr, $level:ident, $msg:expr, $($args:expr),*;
        $($key:expr => $value:expr),*
    ) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_EXPORTER,
            "module" => crate::MOD_COLLECTOR,
            "unit" => UNIT,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_EXPORTER,
            "module" => crate::MOD_COLLECTOR,
            "unit" => UNIT,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_EXPORTER,
            "module" => crate::MOD_COLLECTOR,
            "unit" => UNIT
        )
    };
    ($log:expr, $level:ident, $msg:expr, $($args:expr),*) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_EXPORTER,
            "module" => crate::MOD_COLLECTOR,
            "unit" => UNIT,
        )
    };
}

macro_rules! node_log {
    (
        $log:expr, $level:ident, $msg:expr, $($args:expr),*;
        $($key:expr => $value:expr),*
    ) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_EXPORTER,
            "module" => crate::MOD_NODE,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_EXPORTER,
            "module" => crate::MOD_NODE,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_EXPORTER,
            "module" => crate::MOD_NODE
        )
    };
}

pub(crate) use collector_log;
pub(crate) use node_log;
