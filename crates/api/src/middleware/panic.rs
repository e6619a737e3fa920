//! Post-mortem handling of panics.
//!
//! A panic is the fatal failure class: it cannot be returned as a value, only
//! observed after unwinding. A process-wide panic hook records the most
//! recent panic on the current thread. [`post_mortem`], installed through
//! `CatchPanicLayer::custom`, runs on the same thread right after the panic
//! is caught, takes that record and answers with a fatal [`FaultRecord`].
//!
//! Responses are fully buffered before they leave the handler, so a caught
//! panic always precedes the response and exactly one response is produced.

use std::any::Any;
use std::cell::RefCell;
use std::sync::Once;

use axum::response::{IntoResponse, Response};

use crate::error::{FaultRecord, Severity};

/// What the panic hook saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicRecord {
    pub message: String,
    pub file: String,
    pub line: u32,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicRecord>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// Install the recording panic hook. Later calls are no-ops.
///
/// The previously installed hook still runs after recording.
pub fn install_panic_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let record = PanicRecord {
                message: payload_message(info.payload()),
                file: info
                    .location()
                    .map(|l| l.file().to_string())
                    .unwrap_or_default(),
                line: info.location().map(|l| l.line()).unwrap_or_default(),
            };
            LAST_PANIC.with(|last| *last.borrow_mut() = Some(record));
            previous(info);
        }));
    });
}

/// Take the last recorded panic on this thread, clearing it.
pub fn take_last_panic() -> Option<PanicRecord> {
    LAST_PANIC.with(|last| last.borrow_mut().take())
}

/// `CatchPanicLayer` handler producing the fatal fault response.
pub fn post_mortem(payload: Box<dyn Any + Send + 'static>) -> Response {
    let record = take_last_panic().unwrap_or_else(|| PanicRecord {
        message: payload_message(payload.as_ref()),
        file: String::new(),
        line: 0,
    });

    FaultRecord {
        kind: "Panic",
        message: record.message,
        file: record.file,
        line: record.line,
        stack_trace: String::new(),
        severity: Severity::Fatal,
        reportable: true,
    }
    .into_response()
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn hook_records_panic_location() {
        install_panic_hook();

        let result = std::panic::catch_unwind(|| panic!("exploded on purpose"));
        assert!(result.is_err());

        let record = take_last_panic().expect("panic should be recorded");
        assert_eq!(record.message, "exploded on purpose");
        assert!(record.file.ends_with("panic.rs"));
        assert!(record.line > 0);
        assert!(take_last_panic().is_none());
    }

    #[test]
    fn post_mortem_without_record_uses_payload() {
        let _ = take_last_panic();
        let response = post_mortem(Box::new(String::from("formatted panic 7")));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let fault = response.extensions().get::<FaultRecord>().unwrap();
        assert_eq!(fault.kind, "Panic");
        assert_eq!(fault.severity, Severity::Fatal);
        assert_eq!(fault.message, "formatted panic 7");
    }

    #[test]
    fn unknown_payload() {
        assert_eq!(payload_message(&42_u8), "Unknown panic");
    }
}
